// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes to a use case.
//
//   `stream`       repeating train-split batch stream
//   `eval`         one pass over the test split
//   `build-vocab`  tokenizer.json from a collection
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvalArgs, StreamArgs, VocabArgs};

#[derive(Parser, Debug)]
#[command(
    name = "pair-feed",
    version,
    about = "Stream labelled text-pair datasets as padded transformer batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Stream(args)     => run_stream(args),
            Commands::Eval(args)       => run_eval(args),
            Commands::BuildVocab(args) => run_build_vocab(args),
        }
    }
}

fn run_stream(args: StreamArgs) -> Result<()> {
    use crate::application::feed_use_case::FeedUseCase;

    tracing::info!("Streaming collection '{}'", args.dataset.collection);
    let passes = FeedUseCase::new(args.into()).execute()?;
    println!("Streamed {} passes.", passes.len());
    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    use crate::application::feed_use_case::FeedUseCase;

    tracing::info!("Evaluating collection '{}'", args.dataset.collection);
    let passes = FeedUseCase::new(args.into()).execute()?;
    for p in &passes {
        println!(
            "Evaluation pass: {} batches, {} examples, {} truncated, longest sequence {}",
            p.batches, p.examples, p.truncated_examples, p.longest_sequence,
        );
    }
    Ok(())
}

fn run_build_vocab(args: VocabArgs) -> Result<()> {
    use crate::application::vocab_use_case::VocabUseCase;

    let path = VocabUseCase::new(args.into()).execute()?;
    println!("Tokenizer saved to {}", path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::feed_use_case::{ComputeTarget, FeedConfig};
    use crate::data::encoder::TruncationPolicy;
    use crate::domain::collection::CollectionKind;

    fn feed_config(argv: &[&str]) -> FeedConfig {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Stream(a) => a.into(),
            Commands::Eval(a)   => a.into(),
            other => panic!("not a feed command: {other:?}"),
        }
    }

    #[test]
    fn test_stream_defaults() {
        let cfg = feed_config(&["pair-feed", "stream", "--collection", "mb"]);
        assert_eq!(cfg.split,      "train");
        assert_eq!(cfg.device,     ComputeTarget::Gpu);
        assert_eq!(cfg.truncation, TruncationPolicy::PerSegment);
        assert!(cfg.repeat);
        assert_eq!(cfg.max_passes, None);
        assert_eq!(cfg.max_seq_len, 512);
    }

    #[test]
    fn test_eval_defaults() {
        let cfg = feed_config(&["pair-feed", "eval", "--collection", "robust04"]);
        assert_eq!(cfg.split,      "test");
        assert_eq!(cfg.device,     ComputeTarget::Cpu);
        assert_eq!(cfg.truncation, TruncationPolicy::PerSegmentThenPair);
        assert!(!cfg.repeat);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cfg = feed_config(&[
            "pair-feed", "stream",
            "--collection", "robust04",
            "--layout", "question-answer",
            "--batch-size", "32",
            "--device", "cpu",
            "--max-passes", "2",
            "--split", "dev",
        ]);
        assert_eq!(cfg.layout,     Some(CollectionKind::QuestionAnswer));
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.device,     ComputeTarget::Cpu);
        assert_eq!(cfg.max_passes, Some(2));
        assert_eq!(cfg.split,      "dev");
    }

    #[test]
    fn test_collection_is_required() {
        assert!(Cli::try_parse_from(["pair-feed", "eval"]).is_err());
    }
}
