// ============================================================
// Layer 5 - ML / Tensor Layer (Burn)
// ============================================================
// The only layer that builds burn tensors. The data layer hands
// over plain padded matrices and this layer puts them on a
// device.
//
//   batcher.rs - PaddedBatch → PairBatch<B> (Int tensors),
//                plus burn's Batcher trait for DataLoader use
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Converts padded batches into burn tensors
pub mod batcher;
