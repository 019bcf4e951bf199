// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the application layer:
//
//   tokenizer_store.rs - loads tokenizer.json, or builds a
//                        word-level one from the collection
//   metrics.rs         - per-pass CSV log and config snapshot
//   seed.rs            - explicit backend seeding
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Tokenizer loading and building
pub mod tokenizer_store;

/// Pass metrics CSV logger
pub mod metrics;

/// Backend RNG seeding
pub mod seed;
