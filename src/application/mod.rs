// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Wires the other layers together for one goal at a time.
// No tokenisation, padding or tensor code lives here, only
// workflow coordination.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Streaming and evaluation batch feeds
pub mod feed_use_case;

// Building a tokenizer vocabulary from a collection
pub mod vocab_use_case;
