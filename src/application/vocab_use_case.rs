// ============================================================
// Layer 2 - VocabUseCase
// ============================================================
// Reads every record of a collection split and builds a fresh
// word-level tokenizer.json from their texts, replacing any
// tokenizer already in the directory.
//
//   Step 1: Resolve the dataset location   (Layer 3 - domain)
//   Step 2: Read text_a / text_b           (Layer 4 - data)
//   Step 3: Build and save the tokenizer   (Layer 6 - infra)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::reader::RecordReader;
use crate::domain::collection::{CollectionKind, DatasetLocation};
use crate::infra::tokenizer_store::TokenizerStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabConfig {
    pub data_path:     String,
    pub collection:    String,
    pub split:         String,
    pub layout:        Option<CollectionKind>,
    pub tokenizer_dir: String,
    pub vocab_size:    usize,
}

pub struct VocabUseCase {
    config: VocabConfig,
}

impl VocabUseCase {
    pub fn new(config: VocabConfig) -> Self {
        Self { config }
    }

    /// Build the tokenizer and return the path it was saved to.
    pub fn execute(&self) -> Result<PathBuf> {
        let cfg = &self.config;

        let location = DatasetLocation::resolve(
            &cfg.data_path, &cfg.collection, &cfg.split, cfg.layout,
        )?;
        let texts = corpus_texts(&location)?;
        tracing::info!("Read {} texts from '{}'", texts.len(), cfg.collection);

        let store = TokenizerStore::new(&cfg.tokenizer_dir);
        store.build_and_save(&texts, cfg.vocab_size)?;
        Ok(store.path())
    }
}

/// Every text_a and text_b of one pass over `location`.
pub(crate) fn corpus_texts(location: &DatasetLocation) -> Result<Vec<String>> {
    let mut reader = RecordReader::open(location)?;
    reader
        .corpus_texts()
        .with_context(|| format!("Cannot read corpus of '{}'", location.collection()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::write_rows;
    use crate::domain::traits::TextTokenizer;
    use tempfile::TempDir;

    #[test]
    fn test_builds_tokenizer_from_collection() {
        let tmp = TempDir::new().unwrap();
        write_rows(
            &tmp.path().join("wikiqa").join("train.csv"),
            "1\t1\t1\twhat is rust\trust is a language\n",
        );

        let config = VocabConfig {
            data_path:     tmp.path().display().to_string(),
            collection:    "wikiqa".to_string(),
            split:         "train".to_string(),
            layout:        None,
            tokenizer_dir: tmp.path().join("tok").display().to_string(),
            vocab_size:    100,
        };
        let path = VocabUseCase::new(config).execute().unwrap();
        assert!(path.ends_with("tok/tokenizer.json"));

        let tok = TokenizerStore::new(tmp.path().join("tok")).load().unwrap();
        // "is" and "rust" appear twice, "is" sorts first
        assert_eq!(tok.token_ids("is rust").unwrap(), vec![104, 105]);
    }
}
