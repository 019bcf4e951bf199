// ============================================================
// Layer 4 - Pair Encoder
// ============================================================
// Turns one PairRecord into an EncodedExample:
//
//   text_a  →  "[CLS] " + text_a + " [SEP]"  →  a_ids (≤ max_seq_len)
//   text_b  →  text_b + " [SEP]"             →  b_ids (≤ max_seq_len)
//
//   token_ids   = a_ids ++ b_ids
//   segment_ids = [0; |a_ids|] ++ [1; |b_ids|]
//
// Two truncation policies:
//   PerSegment          each side capped on its own, the pair may
//                       be up to 2 × max_seq_len long (streaming)
//   PerSegmentThenPair  as above, then the pair is capped again
//                       at max_seq_len (evaluation)
//
// Over-length input is always truncated, never rejected.
//
// Reference: Devlin et al. (2019) BERT - sentence pair inputs

use serde::{Deserialize, Serialize};

use crate::domain::example::EncodedExample;
use crate::domain::record::PairRecord;
use crate::domain::traits::TextTokenizer;
use crate::error::{FeedError, FeedResult};

/// Default cap on ids per side, and per pair under PerSegmentThenPair
pub const MAX_SEQ_LEN: usize = 512;

pub const CLS_MARKER: &str = "[CLS]";
pub const SEP_MARKER: &str = "[SEP]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    PerSegment,
    PerSegmentThenPair,
}

pub struct PairEncoder<T> {
    tokenizer:   T,
    max_seq_len: usize,
    policy:      TruncationPolicy,
}

impl<T: TextTokenizer> PairEncoder<T> {
    /// # Errors
    /// `FeedError::Configuration` if `max_seq_len` is zero.
    pub fn new(tokenizer: T, max_seq_len: usize, policy: TruncationPolicy) -> FeedResult<Self> {
        if max_seq_len == 0 {
            return Err(FeedError::configuration("max_seq_len must be at least 1"));
        }
        Ok(Self { tokenizer, max_seq_len, policy })
    }

    pub fn encode(&self, record: &PairRecord) -> FeedResult<EncodedExample> {
        let a_text = format!("{CLS_MARKER} {} {SEP_MARKER}", record.text_a());
        let b_text = format!("{} {SEP_MARKER}", record.text_b());

        let (a_ids, a_cut) = self.side_ids(&a_text)?;
        let (b_ids, b_cut) = self.side_ids(&b_text)?;

        let mut segment_ids = vec![0u32; a_ids.len()];
        segment_ids.resize(a_ids.len() + b_ids.len(), 1);

        let mut token_ids = a_ids;
        token_ids.extend(b_ids);

        let mut truncated = a_cut || b_cut;
        if self.policy == TruncationPolicy::PerSegmentThenPair
            && token_ids.len() > self.max_seq_len
        {
            token_ids.truncate(self.max_seq_len);
            segment_ids.truncate(self.max_seq_len);
            truncated = true;
        }

        Ok(EncodedExample {
            token_ids,
            segment_ids,
            label:    record.label(),
            query_id: record.query_id(),
            doc_id:   record.doc_id(),
            truncated,
        })
    }

    /// Tokenise one side and cap it. Returns the ids and whether
    /// anything was cut off.
    fn side_ids(&self, text: &str) -> FeedResult<(Vec<u32>, bool)> {
        let mut ids = self.tokenizer.token_ids(text)?;
        let cut     = ids.len() > self.max_seq_len;
        ids.truncate(self.max_seq_len);
        Ok((ids, cut))
    }
}
