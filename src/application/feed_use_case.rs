// ============================================================
// Layer 2 - FeedUseCase
// ============================================================
// Streams a collection as tensor batches, in order:
//
//   Step 1: Seed the backend                (Layer 6 - infra)
//   Step 2: Resolve the dataset location    (Layer 3 - domain)
//   Step 3: Load the tokenizer (stream may build it)  (Layer 6 - infra)
//   Step 4: Open the metrics log            (Layer 6 - infra)
//   Step 5: Build encoder + assembler       (Layer 4 - data)
//   Step 6: Pull batches onto the device    (Layer 5 - ml)
//
// Streaming mode (repeat = true) runs until max_passes is
// reached, or forever when max_passes is None. Evaluation mode
// (repeat = false) stops after one pass.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};

use crate::application::vocab_use_case::corpus_texts;
use crate::data::{
    assembler::{BatchAssembler, Emission, PassSummary},
    encoder::{PairEncoder, TruncationPolicy, MAX_SEQ_LEN},
};
use crate::domain::collection::{CollectionKind, DatasetLocation};
use crate::infra::{
    metrics::MetricsLogger,
    seed::{seed_backend, DEFAULT_SEED},
    tokenizer_store::TokenizerStore,
};
use crate::ml::batcher::PairBatcher;

/// Where batches are materialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeTarget {
    /// burn NdArray backend
    Cpu,
    /// burn Wgpu backend (needs the `wgpu` feature)
    Gpu,
}

// ─── Feed Configuration ──────────────────────────────────────────────────────
// Everything one run needs. Saved as JSON in metrics_dir at
// the start of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub data_path:     String,
    pub collection:    String,
    pub split:         String,
    /// Overrides the kind detected from the collection name
    pub layout:        Option<CollectionKind>,
    pub batch_size:    usize,
    pub max_seq_len:   usize,
    pub truncation:    TruncationPolicy,
    pub repeat:        bool,
    /// Stop after this many passes; None streams forever
    pub max_passes:    Option<usize>,
    pub device:        ComputeTarget,
    pub seed:          u64,
    pub tokenizer_dir: String,
    pub vocab_size:    usize,
    pub metrics_dir:   String,
}

impl FeedConfig {
    /// Repeating train-split stream with per-side truncation.
    pub fn streaming(collection: impl Into<String>) -> Self {
        Self {
            data_path:     "data".to_string(),
            collection:    collection.into(),
            split:         "train".to_string(),
            layout:        None,
            batch_size:    8,
            max_seq_len:   MAX_SEQ_LEN,
            truncation:    TruncationPolicy::PerSegment,
            repeat:        true,
            max_passes:    None,
            device:        ComputeTarget::Gpu,
            seed:          DEFAULT_SEED,
            tokenizer_dir: "tokenizer".to_string(),
            vocab_size:    30522,
            metrics_dir:   "runs".to_string(),
        }
    }

    /// Single test-split pass with the pair re-capped after concatenation.
    pub fn evaluation(collection: impl Into<String>) -> Self {
        Self {
            split:      "test".to_string(),
            truncation: TruncationPolicy::PerSegmentThenPair,
            repeat:     false,
            device:     ComputeTarget::Cpu,
            ..Self::streaming(collection)
        }
    }
}

pub struct FeedUseCase {
    config: FeedConfig,
}

impl FeedUseCase {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Run the feed and return the summary of every finished pass.
    pub fn execute(&self) -> Result<Vec<PassSummary>> {
        match self.config.device {
            ComputeTarget::Cpu => {
                let device = burn::backend::ndarray::NdArrayDevice::Cpu;
                tracing::info!("Using NdArray device: {:?}", device);
                self.run::<burn::backend::NdArray>(device)
            }
            ComputeTarget::Gpu => self.run_gpu(),
        }
    }

    #[cfg(feature = "wgpu")]
    fn run_gpu(&self) -> Result<Vec<PassSummary>> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);
        self.run::<burn::backend::Wgpu>(device)
    }

    #[cfg(not(feature = "wgpu"))]
    fn run_gpu(&self) -> Result<Vec<PassSummary>> {
        Err(crate::error::FeedError::configuration(
            "gpu target requested but this build has no `wgpu` feature; use --device cpu",
        )
        .into())
    }

    fn run<B: Backend>(&self, device: B::Device) -> Result<Vec<PassSummary>> {
        let cfg = &self.config;

        // ── Step 1: Seed once, before any tensor exists ───────────────────────
        seed_backend::<B>(cfg.seed);

        // ── Step 2: Resolve collection → file layout ──────────────────────────
        let location = DatasetLocation::resolve(
            &cfg.data_path, &cfg.collection, &cfg.split, cfg.layout,
        )?;
        tracing::info!(
            "Feeding '{}' split '{}' as {:?} (batch_size={}, repeat={})",
            cfg.collection,
            cfg.split,
            location.kind(),
            cfg.batch_size,
            cfg.repeat,
        );

        // ── Step 3: Tokenizer ─────────────────────────────────────────────────
        // A single pass never builds: it loads the training vocabulary
        let tok_store = TokenizerStore::new(&cfg.tokenizer_dir);
        let tokenizer = if cfg.repeat {
            tok_store.load_or_build(cfg.vocab_size, || corpus_texts(&location))?
        } else {
            if !tok_store.exists() {
                anyhow::bail!(
                    "No tokenizer at '{}'; run `build-vocab` on the training split first",
                    tok_store.path().display(),
                );
            }
            tok_store.load().context("Cannot load tokenizer for a single pass")?
        };

        // ── Step 4: Metrics ───────────────────────────────────────────────────
        let metrics = MetricsLogger::new(&cfg.metrics_dir)?;
        metrics.save_config(cfg)?;

        // ── Step 5: Encoder and assembler ─────────────────────────────────────
        let encoder   = PairEncoder::new(tokenizer, cfg.max_seq_len, cfg.truncation)?;
        let assembler = BatchAssembler::new(location, encoder, cfg.batch_size, cfg.repeat)?;
        let batcher   = PairBatcher::<B>::new(device);

        // ── Step 6: Pull until the stream ends or max_passes is hit ───────────
        let mut passes = Vec::new();
        for emission in assembler {
            match emission.context("Batch stream failed")? {
                Emission::Batch(padded) => {
                    let batch = batcher.tensors(&padded);
                    tracing::debug!(
                        "Batch of {} on device: tokens {:?}, labels {:?}",
                        batch.query_ids.len(),
                        batch.token_ids.dims(),
                        batch.labels.dims(),
                    );
                }
                Emission::EndOfPass(summary) => {
                    metrics.log(&summary)?;
                    passes.push(summary);
                    if cfg.max_passes.is_some_and(|max| passes.len() >= max) {
                        tracing::info!("Reached max_passes={}, stopping", passes.len());
                        break;
                    }
                }
            }
        }

        Ok(passes)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{write_paired, write_rows};
    use crate::error::FeedError;
    use tempfile::TempDir;

    fn config_in(tmp: &TempDir, base: FeedConfig) -> FeedConfig {
        FeedConfig {
            data_path:     tmp.path().display().to_string(),
            tokenizer_dir: tmp.path().join("tok").display().to_string(),
            metrics_dir:   tmp.path().join("runs").display().to_string(),
            device:        ComputeTarget::Cpu,
            ..base
        }
    }

    #[test]
    fn test_evaluation_runs_exactly_one_pass() {
        let tmp = TempDir::new().unwrap();
        write_rows(
            &tmp.path().join("qa").join("test.csv"),
            "1\t10\t20\thello world\tgoodbye\n0\t11\t21\tsecond query\tsecond doc\n1\t12\t22\tthird\tone\n",
        );

        TokenizerStore::new(tmp.path().join("tok"))
            .build_and_save(&["hello world goodbye".to_string()], 50)
            .unwrap();

        let cfg = FeedConfig { batch_size: 2, ..config_in(&tmp, FeedConfig::evaluation("qa")) };
        let passes = FeedUseCase::new(cfg).execute().unwrap();

        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].batches,  2);
        assert_eq!(passes[0].examples, 3);
        assert!(tmp.path().join("runs").join("feed_config.json").exists());
    }

    #[test]
    fn test_evaluation_without_tokenizer_fails_and_builds_nothing() {
        let tmp = TempDir::new().unwrap();
        write_rows(&tmp.path().join("qa").join("test.csv"), "1\t10\t20\thello\tworld\n");

        let cfg = config_in(&tmp, FeedConfig::evaluation("qa"));
        let err = FeedUseCase::new(cfg).execute().unwrap_err();

        assert!(err.to_string().contains("build-vocab"));
        assert!(!tmp.path().join("tok").join("tokenizer.json").exists());
    }

    #[test]
    fn test_streaming_builds_missing_tokenizer_from_its_split() {
        let tmp = TempDir::new().unwrap();
        write_rows(&tmp.path().join("qa").join("train.csv"), "1\t10\t20\thello\tworld\n");

        let cfg = FeedConfig { max_passes: Some(1), ..config_in(&tmp, FeedConfig::streaming("qa")) };
        FeedUseCase::new(cfg).execute().unwrap();

        assert!(tmp.path().join("tok").join("tokenizer.json").exists());
    }

    #[test]
    fn test_streaming_repeats_until_max_passes() {
        let tmp = TempDir::new().unwrap();
        write_paired(
            &tmp.path().join("mb").join("train"),
            &["a", "b", "c", "d", "e"],
            &["v", "w", "x", "y", "z"],
            &["1", "0", "1", "0", "1"],
            &[
                "1 Q0 1 1 0 r", "2 Q0 2 1 0 r", "3 Q0 3 1 0 r", "4 Q0 4 1 0 r", "5 Q0 5 1 0 r",
            ],
        );

        let cfg = FeedConfig {
            batch_size: 2,
            max_passes: Some(3),
            ..config_in(&tmp, FeedConfig::streaming("mb"))
        };
        let passes = FeedUseCase::new(cfg).execute().unwrap();

        assert_eq!(passes.len(), 3);
        assert!(passes.iter().all(|p| p.batches == 3 && p.examples == 5));
        assert_eq!(passes.iter().map(|p| p.pass).collect::<Vec<_>>(), vec![1, 2, 3]);

        let csv = std::fs::read_to_string(tmp.path().join("runs").join("passes.csv")).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_bad_collection_name_is_a_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_in(&tmp, FeedConfig::evaluation("../qa"));
        let err = FeedUseCase::new(cfg).execute().unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FeedError>(),
            Some(FeedError::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_row_fails_the_run() {
        let tmp = TempDir::new().unwrap();
        write_rows(&tmp.path().join("qa").join("test.csv"), "1\t10\t20\tonly four\n");

        // Prebuild the tokenizer so the corpus read doesn't hit the row first
        TokenizerStore::new(tmp.path().join("tok"))
            .build_and_save(&["only four".to_string()], 50)
            .unwrap();

        let cfg = config_in(&tmp, FeedConfig::evaluation("qa"));
        let err = FeedUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FeedError>(),
            Some(FeedError::MalformedRow { expected: 5, found: 4, .. })
        ));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg  = FeedConfig::evaluation("robust04");
        let json = serde_json::to_string(&cfg).unwrap();
        let back: FeedConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.truncation, TruncationPolicy::PerSegmentThenPair);
        assert_eq!(back.device,     ComputeTarget::Cpu);
        assert!(!back.repeat);
        assert!(json.contains("\"per_segment_then_pair\""));
    }
}
