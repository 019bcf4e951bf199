// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// pipeline moves around. No burn types and no file I/O here:
// paths are computed but never opened.
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

/// Collection kinds and where their files live
pub mod collection;

/// Raw labelled text pairs, one decoder per collection kind
pub mod record;

/// Tokenised, unpadded text pairs
pub mod example;

/// The tokenizer seam
pub mod traits;
