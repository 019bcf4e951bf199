use serde::{Deserialize, Serialize};

/// One tokenised text pair, unpadded.
/// Sequence format: [CLS] text_a [SEP] text_b [SEP]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub token_ids:   Vec<u32>,
    /// 0 for every text_a token, 1 for every text_b token
    pub segment_ids: Vec<u32>,
    pub label:       i64,
    pub query_id:    i64,
    pub doc_id:      i64,
    /// True if any ids were cut off to respect the length cap
    pub truncated:   bool,
}

impl EncodedExample {
    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }

    /// Number of leading segment-0 (text_a) tokens.
    pub fn text_a_len(&self) -> usize {
        self.segment_ids.iter().take_while(|&&s| s == 0).count()
    }
}
