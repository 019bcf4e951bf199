// ============================================================
// Layer 4 - Batch Assembler
// ============================================================
// Drives a RecordReader through the PairEncoder and groups the
// encoded examples into PaddedBatches.
//
// Each pull returns one Emission:
//
//   Batch(..)      batch_size examples, or fewer for the final
//                  remainder of a pass
//   EndOfPass(..)  the reader is exhausted, with pass totals
//
// After EndOfPass:
//   repeat = true   the next pull opens a fresh reader and the
//                   data is streamed again, forever
//   repeat = false  the iterator ends (None)
//
// Example, 5 records, batch_size 2, repeat = true:
//   Batch(2) Batch(2) Batch(1) EndOfPass
//   Batch(2) Batch(2) Batch(1) EndOfPass
//   ...
//
// Any error (open, read, decode, tokenise) is yielded once and
// then the iterator ends. There is no skip-and-continue.
//
// Reference: Rust Book §13 (Implementing the Iterator Trait)

use serde::{Deserialize, Serialize};

use crate::data::collate::PaddedBatch;
use crate::data::encoder::PairEncoder;
use crate::data::reader::RecordReader;
use crate::domain::collection::DatasetLocation;
use crate::domain::example::EncodedExample;
use crate::domain::traits::TextTokenizer;
use crate::error::{FeedError, FeedResult};

/// Totals for one full pass over the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// 1-based pass number
    pub pass:               usize,
    pub batches:            usize,
    pub examples:           usize,
    pub longest_sequence:   usize,
    pub truncated_examples: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    Batch(PaddedBatch),
    EndOfPass(PassSummary),
}

pub struct BatchAssembler<T> {
    location:   DatasetLocation,
    encoder:    PairEncoder<T>,
    batch_size: usize,
    repeat:     bool,

    reader:  Option<RecordReader>,
    pending: Vec<EncodedExample>,
    summary: PassSummary,
    done:    bool,
}

impl<T: TextTokenizer> BatchAssembler<T> {
    /// # Errors
    /// `FeedError::Configuration` if `batch_size` is zero.
    pub fn new(
        location:   DatasetLocation,
        encoder:    PairEncoder<T>,
        batch_size: usize,
        repeat:     bool,
    ) -> FeedResult<Self> {
        if batch_size == 0 {
            return Err(FeedError::configuration("batch_size must be at least 1"));
        }
        Ok(Self {
            location,
            encoder,
            batch_size,
            repeat,
            reader:  None,
            pending: Vec::new(),
            summary: PassSummary { pass: 1, ..PassSummary::default() },
            done:    false,
        })
    }

    fn flush(&mut self) -> PaddedBatch {
        let batch = PaddedBatch::collate(&self.pending);
        self.pending.clear();
        self.summary.batches += 1;
        batch
    }

    fn end_pass(&mut self) -> PassSummary {
        let finished = self.summary;
        self.reader  = None;
        self.summary = PassSummary { pass: finished.pass + 1, ..PassSummary::default() };
        if !self.repeat {
            self.done = true;
        }
        tracing::info!(
            "Pass {} finished: {} batches, {} examples ({} truncated), longest sequence {}",
            finished.pass,
            finished.batches,
            finished.examples,
            finished.truncated_examples,
            finished.longest_sequence,
        );
        finished
    }

    fn fail(&mut self, err: FeedError) -> Option<FeedResult<Emission>> {
        self.done   = true;
        self.reader = None;
        tracing::warn!("Stopping batch stream: {err}");
        Some(Err(err))
    }
}

impl<T: TextTokenizer> Iterator for BatchAssembler<T> {
    type Item = FeedResult<Emission>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            // ── Open a fresh reader at the start of every pass ────────────────
            if self.reader.is_none() {
                match RecordReader::open(&self.location) {
                    Ok(reader) => {
                        tracing::debug!("Starting pass {}", self.summary.pass);
                        self.reader = Some(reader);
                    }
                    Err(e) => return self.fail(e),
                }
            }

            let next = match self.reader.as_mut() {
                Some(reader) => reader.next_record(),
                None         => Ok(None),
            };

            match next {
                Err(e) => return self.fail(e),

                // ── Encode and accumulate ─────────────────────────────────────
                Ok(Some(record)) => {
                    let example = match self.encoder.encode(&record) {
                        Ok(example) => example,
                        Err(e)      => return self.fail(e),
                    };

                    self.summary.examples += 1;
                    self.summary.longest_sequence = self.summary.longest_sequence.max(example.len());
                    if example.truncated {
                        self.summary.truncated_examples += 1;
                    }
                    self.pending.push(example);

                    if self.pending.len() >= self.batch_size {
                        return Some(Ok(Emission::Batch(self.flush())));
                    }
                }

                // ── Source exhausted ──────────────────────────────────────────
                // The reader stays exhausted, so the pull after a partial
                // batch lands here again with nothing pending.
                Ok(None) => {
                    if !self.pending.is_empty() {
                        return Some(Ok(Emission::Batch(self.flush())));
                    }
                    return Some(Ok(Emission::EndOfPass(self.end_pass())));
                }
            }
        }
    }
}
