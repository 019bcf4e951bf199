// ============================================================
// Layer 6 - Tokenizer Store
// ============================================================
// Keeps a tokenizer.json in a directory.
//
//   tokenizer.json exists  → load it (any HuggingFace tokenizer,
//                            e.g. a pretrained BERT WordPiece)
//   missing                → build a word-level vocabulary from
//                            the collection's texts, write it in
//                            HuggingFace JSON format, load it back
//
// Built vocabularies reserve the BERT special ids so [CLS] and
// [SEP] in the pair text map to 101 and 102 either way.
//
// Reference: tokenizers crate documentation

use anyhow::{Context, Result};
use std::{collections::HashMap, path::PathBuf};
use tokenizers::{
    pre_tokenizers::whitespace::Whitespace, OffsetReferential, OffsetType, PreTokenizedString,
    PreTokenizer, Tokenizer,
};

use crate::domain::traits::TextTokenizer;
use crate::error::{FeedError, FeedResult};

pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Number of special tokens written into every built vocabulary
const SPECIAL_TOKENS: usize = 5;

/// First id handed to a corpus word, right after [MASK] = 103
const FIRST_WORD_ID: usize = 104;

// ─── tokenizers::Tokenizer as a TextTokenizer ────────────────────────────────
impl TextTokenizer for Tokenizer {
    fn token_ids(&self, text: &str) -> FeedResult<Vec<u32>> {
        let enc = self
            .encode(text, false)
            .map_err(|e| FeedError::Tokenizer(e.to_string()))?;
        Ok(enc.get_ids().to_vec())
    }
}

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Load the stored tokenizer, or build one from the texts that
    /// `corpus` returns. `corpus` is only called when building.
    pub fn load_or_build<F>(&self, vocab_size: usize, corpus: F) -> Result<Tokenizer>
    where
        F: FnOnce() -> Result<Vec<String>>,
    {
        if self.exists() {
            tracing::info!("Loading tokenizer from '{}'", self.path().display());
            self.load()
        } else {
            tracing::info!("No tokenizer found, building one (vocab_size={})", vocab_size);
            let texts = corpus()?;
            self.build_and_save(&texts, vocab_size)
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))
    }

    /// Build a word-level vocabulary from `texts`, write it as
    /// tokenizer.json and load it back.
    pub fn build_and_save(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // ── Step 1: Count word frequencies ────────────────────────────────────
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in pre_tokenize(text)? {
                // Markers are added tokens, never vocabulary words
                if word != "cls" && word != "sep" {
                    *freq.entry(word).or_insert(0) += 1;
                }
            }
        }

        // Most frequent first, ties broken alphabetically so builds
        // are reproducible
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(SPECIAL_TOKENS));

        // ── Step 2: Vocabulary with BERT special ids ──────────────────────────
        let mut vocab = serde_json::json!({
            "[PAD]":  0,
            "[UNK]":  1,
            "[CLS]":  101,
            "[SEP]":  102,
            "[MASK]": 103,
        });
        for (offset, (word, _)) in words.iter().enumerate() {
            vocab[word.as_str()] = serde_json::json!(FIRST_WORD_ID + offset);
        }

        // ── Step 3: HuggingFace tokenizer.json ────────────────────────────────
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.path();
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write '{}'", tok_path.display()))?;

        tracing::info!(
            "Tokenizer built with {} words, saved to '{}'",
            words.len(),
            tok_path.display()
        );

        self.load()
    }
}

/// Lowercase `text` and split it with the same `Whitespace` pre-tokenizer
/// the saved tokenizer.json uses (`\w+|[^\w\s]+`).
fn pre_tokenize(text: &str) -> Result<Vec<String>> {
    let lowered = text.to_lowercase();
    let mut pts = PreTokenizedString::from(lowered.as_str());
    Whitespace::default()
        .pre_tokenize(&mut pts)
        .map_err(|e| anyhow::anyhow!("Cannot pre-tokenize corpus text: {}", e))?;

    let pieces: Vec<String> = pts
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(piece, _, _)| piece.to_string())
        .collect();
    Ok(pieces)
}
