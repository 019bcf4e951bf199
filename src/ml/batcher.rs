// ============================================================
// Layer 5 - Pair Batcher
// ============================================================
// Moves a PaddedBatch onto a burn device as integer tensors.
//
//   PaddedBatch (Vec<Vec<u32>>, [rows, seq_len])
//       │  flatten row by row
//       ▼
//   Vec<i64>  →  TensorData [rows, seq_len]  →  Tensor<B, 2, Int>
//
// Query and doc ids stay as plain Vecs: they are bookkeeping
// for scoring runs, the model never sees them.
//
// PairBatcher also implements burn's Batcher trait, so the same
// collation can back a burn DataLoader over EncodedExamples.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    tensor::{backend::Backend, Int, Tensor, TensorData},
};

use crate::data::collate::PaddedBatch;
use crate::domain::example::EncodedExample;

// ─── PairBatch ────────────────────────────────────────────────────────────────
/// A padded text-pair batch on device B.
#[derive(Debug, Clone)]
pub struct PairBatch<B: Backend> {
    /// [batch_size, seq_len]
    pub token_ids: Tensor<B, 2, Int>,

    /// [batch_size, seq_len], 0 = text_a or padding, 1 = text_b
    pub segment_ids: Tensor<B, 2, Int>,

    /// [batch_size, seq_len], 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// [batch_size]
    pub labels: Tensor<B, 1, Int>,

    pub query_ids: Vec<i64>,
    pub doc_ids:   Vec<i64>,
}

// ─── PairBatcher ──────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct PairBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PairBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Build tensors for `batch` on this batcher's device.
    pub fn tensors(&self, batch: &PaddedBatch) -> PairBatch<B> {
        to_tensors(batch, &self.device)
    }
}

impl<B: Backend> Batcher<B, EncodedExample, PairBatch<B>> for PairBatcher<B> {
    fn batch(&self, items: Vec<EncodedExample>, device: &B::Device) -> PairBatch<B> {
        to_tensors(&PaddedBatch::collate(&items), device)
    }
}

fn to_tensors<B: Backend>(batch: &PaddedBatch, device: &B::Device) -> PairBatch<B> {
    let rows    = batch.rows();
    let seq_len = batch.seq_len;

    // Values stay i64 until the backend's own int element takes over
    let labels = Tensor::<B, 1, Int>::from_data(
        TensorData::new(batch.labels.clone(), [rows]).convert::<B::IntElem>(),
        device,
    );

    PairBatch {
        token_ids:      matrix::<B>(&batch.token_ids,      rows, seq_len, device),
        segment_ids:    matrix::<B>(&batch.segment_ids,    rows, seq_len, device),
        attention_mask: matrix::<B>(&batch.attention_mask, rows, seq_len, device),
        labels,
        query_ids: batch.query_ids.clone(),
        doc_ids:   batch.doc_ids.clone(),
    }
}

/// Flatten a [rows, cols] matrix and reshape it as an Int tensor.
fn matrix<B: Backend>(
    values: &[Vec<u32>],
    rows:   usize,
    cols:   usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = values
        .iter()
        .flat_map(|row| row.iter().map(|&x| i64::from(x)))
        .collect();

    Tensor::<B, 2, Int>::from_data(
        TensorData::new(flat, [rows, cols]).convert::<B::IntElem>(),
        device,
    )
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn example(ids: &[u32], split: usize, label: i64) -> EncodedExample {
        EncodedExample {
            token_ids:   ids.to_vec(),
            segment_ids: (0..ids.len()).map(|i| u32::from(i >= split)).collect(),
            label,
            query_id:  label + 1,
            doc_id:    label + 2,
            truncated: false,
        }
    }

    fn values(t: Tensor<TestBackend, 2, Int>) -> Vec<i64> {
        t.into_data().convert::<i64>().to_vec::<i64>().unwrap()
    }

    #[test]
    fn test_tensor_shapes_follow_the_padded_batch() {
        let padded = PaddedBatch::collate(&[
            example(&[101, 5, 102, 6, 102], 3, 1),
            example(&[101, 7, 102], 3, 0),
        ]);
        let batcher = PairBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.tensors(&padded);

        assert_eq!(batch.token_ids.dims(),      [2, 5]);
        assert_eq!(batch.segment_ids.dims(),    [2, 5]);
        assert_eq!(batch.attention_mask.dims(), [2, 5]);
        assert_eq!(batch.labels.dims(),         [2]);
        assert_eq!(batch.query_ids, vec![2, 1]);
        assert_eq!(batch.doc_ids,   vec![3, 2]);
    }

    #[test]
    fn test_tensor_values_are_right_padded() {
        let padded = PaddedBatch::collate(&[
            example(&[101, 5, 102, 6, 102], 3, 1),
            example(&[101, 7, 102], 3, 0),
        ]);
        let batch = PairBatcher::<TestBackend>::new(Default::default()).tensors(&padded);

        assert_eq!(
            values(batch.token_ids),
            vec![101, 5, 102, 6, 102, 101, 7, 102, 0, 0]
        );
        assert_eq!(values(batch.segment_ids),    vec![0, 0, 0, 1, 1, 0, 0, 0, 0, 0]);
        assert_eq!(values(batch.attention_mask), vec![1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_burn_batcher_trait_collates_items() {
        let device  = Default::default();
        let batcher = PairBatcher::<TestBackend>::new(device);
        let batch   = batcher.batch(
            vec![example(&[101, 102], 2, 1), example(&[101, 9, 9, 102], 4, 0)],
            &batcher.device,
        );

        assert_eq!(batch.token_ids.dims(), [2, 4]);
        let labels = batch.labels.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn test_wide_labels_and_ids_are_not_wrapped() {
        let wide  = example(&[101, u32::MAX, 102], 3, 4_294_967_297);
        let batch = PairBatcher::<TestBackend>::new(Default::default())
            .tensors(&PaddedBatch::collate(&[wide]));

        let labels = batch.labels.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(labels, vec![4_294_967_297]);
        assert_eq!(values(batch.token_ids), vec![101, i64::from(u32::MAX), 102]);
    }
}
