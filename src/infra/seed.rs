use burn::tensor::backend::Backend;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 12345;

/// Seed the backend's random number generator.
///
/// Call once from the process entry point before any tensors are
/// created. Nothing in the crate seeds implicitly.
pub fn seed_backend<B: Backend>(seed: u64) {
    B::seed(seed);
    tracing::debug!("Seeded {} with {}", std::any::type_name::<B>(), seed);
}
