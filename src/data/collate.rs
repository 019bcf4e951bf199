// ============================================================
// Layer 4 - Collator (dynamic padding)
// ============================================================
// Stacks a group of unpadded EncodedExamples into one
// rectangular batch.
//
// Padding is per batch: every row is right-padded with 0 up to
// the LONGEST sequence in this batch, not to a global maximum.
//
//   example 1:  [101, 7, 9, 102, 5, 102]      len 6
//   example 2:  [101, 8, 102, 4, 102]         len 5
//
//   token_ids       segment_ids     attention_mask
//   101 7 9 102 5 102   0 0 0 0 1 1     1 1 1 1 1 1
//   101 8 102 4 102 0   0 0 0 1 1 0     1 1 1 1 1 0
//
// The attention mask is 1 on real tokens and 0 on padding.
//
// Reference: Rust Book §8 (Vectors)

use serde::{Deserialize, Serialize};

use crate::domain::example::EncodedExample;

/// Id written into padded positions of every matrix
pub const PAD_ID: u32 = 0;

/// One padded batch in plain Rust collections.
/// All matrices are [rows, seq_len].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddedBatch {
    pub token_ids:      Vec<Vec<u32>>,
    pub segment_ids:    Vec<Vec<u32>>,
    pub attention_mask: Vec<Vec<u32>>,
    pub labels:         Vec<i64>,
    pub query_ids:      Vec<i64>,
    pub doc_ids:        Vec<i64>,
    /// Column count shared by all three matrices
    pub seq_len:        usize,
}

impl PaddedBatch {
    /// Pad and stack `examples` in order.
    pub fn collate(examples: &[EncodedExample]) -> Self {
        let seq_len = examples.iter().map(EncodedExample::len).max().unwrap_or(0);
        let rows    = examples.len();

        let mut token_ids      = vec![vec![PAD_ID; seq_len]; rows];
        let mut segment_ids    = vec![vec![PAD_ID; seq_len]; rows];
        let mut attention_mask = vec![vec![0u32;   seq_len]; rows];

        for (i, ex) in examples.iter().enumerate() {
            let len = ex.len();
            token_ids[i][..len].copy_from_slice(&ex.token_ids);
            segment_ids[i][..len].copy_from_slice(&ex.segment_ids);
            attention_mask[i][..len].fill(1);
        }

        Self {
            token_ids,
            segment_ids,
            attention_mask,
            labels:    examples.iter().map(|e| e.label).collect(),
            query_ids: examples.iter().map(|e| e.query_id).collect(),
            doc_ids:   examples.iter().map(|e| e.doc_id).collect(),
            seq_len,
        }
    }

    /// Number of examples in the batch
    pub fn rows(&self) -> usize {
        self.labels.len()
    }

    /// Unpadded length of row `i`, read back from the mask.
    pub fn row_len(&self, i: usize) -> usize {
        self.attention_mask[i].iter().filter(|&&m| m == 1).count()
    }
}
