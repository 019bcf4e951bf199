// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The tokenizer is an external collaborator. The data layer
// only needs "text in, vocabulary ids out", so that is all
// this trait asks for.
//
// Implementations:
//   - tokenizers::Tokenizer  → infra/tokenizer_store.rs
//   - small fixed-vocab tokenizers in the unit tests
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::error::FeedResult;

// ─── TextTokenizer ────────────────────────────────────────────────────────────
/// Anything that can split text into subword tokens and map
/// them to vocabulary ids.
pub trait TextTokenizer {
    /// Tokenise `text` and return the vocabulary id of every token,
    /// in order. No special tokens are added: markers such as
    /// [CLS] and [SEP] are expected to already be in the text.
    fn token_ids(&self, text: &str) -> FeedResult<Vec<u32>>;
}

/// Shared references tokenise the same way as the owner.
impl<T: TextTokenizer + ?Sized> TextTokenizer for &T {
    fn token_ids(&self, text: &str) -> FeedResult<Vec<u32>> {
        (**self).token_ids(text)
    }
}
