// ============================================================
// Layer 4 - Record Reader
// ============================================================
// Opens the file(s) behind a DatasetLocation and hands out one
// PairRecord per call until the data runs out.
//
//   ShortSequence   a.toks ─┐
//                   b.toks ─┼─ read one line from each, in lockstep
//                   sim.txt ┤  stop as soon as ANY file runs out
//                   id.txt ─┘
//
//   QuestionAnswer  one .csv, one row per call
//   Delimited       one .csv, one row per call
//
// End of data is Ok(None), and stays Ok(None) on every later
// call. File handles live as long as the reader and are closed
// when it is dropped.
//
// Reference: Rust Book §12 (Reading a File)
//            std::io::BufRead::lines

use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::{Path, PathBuf},
};

use crate::domain::collection::{CollectionKind, DatasetLocation};
use crate::domain::record::PairRecord;
use crate::error::{FeedError, FeedResult};

/// One newline-delimited file, read line by line.
/// Remembers its path so read errors can name the file.
struct LineStream {
    path:  PathBuf,
    lines: Lines<BufReader<File>>,
}

impl LineStream {
    fn open(path: &Path) -> FeedResult<Self> {
        let file = File::open(path).map_err(|e| FeedError::io(path, e))?;
        Ok(Self {
            path:  path.to_path_buf(),
            lines: BufReader::new(file).lines(),
        })
    }

    /// Next line without its trailing "\n" / "\r\n", or None at EOF.
    fn next_line(&mut self) -> FeedResult<Option<String>> {
        match self.lines.next() {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e))   => Err(FeedError::io(&self.path, e)),
            None           => Ok(None),
        }
    }
}

enum Source {
    Paired {
        text_a: LineStream,
        text_b: LineStream,
        label:  LineStream,
        id:     LineStream,
    },
    Rows {
        kind: CollectionKind,
        rows: LineStream,
    },
}

/// Pull-based reader over one pass of a collection split.
pub struct RecordReader {
    source:    Source,
    /// 1-based number of the line most recently read
    line:      usize,
    exhausted: bool,
}

impl RecordReader {
    /// Open every file the location's layout needs.
    ///
    /// # Errors
    /// `FeedError::Io` naming the first file that cannot be opened.
    pub fn open(location: &DatasetLocation) -> FeedResult<Self> {
        let source = match location.kind() {
            CollectionKind::ShortSequence => {
                let [a, b, sim, id] = location.paired_paths();
                Source::Paired {
                    text_a: LineStream::open(&a)?,
                    text_b: LineStream::open(&b)?,
                    label:  LineStream::open(&sim)?,
                    id:     LineStream::open(&id)?,
                }
            }
            kind => Source::Rows {
                kind,
                rows: LineStream::open(&location.delimited_path())?,
            },
        };

        tracing::debug!(
            "Opened {:?} reader for '{}' split '{}'",
            location.kind(),
            location.collection(),
            location.split()
        );

        Ok(Self { source, line: 0, exhausted: false })
    }

    /// Read and decode the next record.
    ///
    /// Returns Ok(None) once the data is exhausted. A malformed
    /// line is returned as an error; the caller decides whether
    /// to keep pulling (the assembler does not).
    pub fn next_record(&mut self) -> FeedResult<Option<PairRecord>> {
        if self.exhausted {
            return Ok(None);
        }
        self.line += 1;
        let line = self.line;

        let record = match &mut self.source {
            Source::Paired { text_a, text_b, label, id } => {
                let step = (
                    text_a.next_line()?,
                    text_b.next_line()?,
                    label.next_line()?,
                    id.next_line()?,
                );
                match step {
                    (Some(a), Some(b), Some(l), Some(c)) => {
                        Some(PairRecord::from_paired_lines(line, &a, &b, &l, &c)?)
                    }
                    // Any stream running out ends the pass
                    _ => None,
                }
            }
            Source::Rows { kind, rows } => match rows.next_line()? {
                Some(row) => Some(PairRecord::from_row(*kind, line, &row)?),
                None      => None,
            },
        };

        if record.is_none() {
            self.exhausted = true;
            tracing::debug!("Reader exhausted after {} records", line - 1);
        }
        Ok(record)
    }

    /// Drain the reader, returning text_a and text_b of every record.
    /// Used to build a vocabulary when no tokenizer exists yet.
    pub fn corpus_texts(&mut self) -> FeedResult<Vec<String>> {
        let mut texts = Vec::new();
        while let Some(record) = self.next_record()? {
            texts.push(record.text_a().to_string());
            texts.push(record.text_b().to_string());
        }
        Ok(texts)
    }
}

impl Iterator for RecordReader {
    type Item = FeedResult<PairRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
