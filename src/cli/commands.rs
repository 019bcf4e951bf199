// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Three subcommands: `stream`, `eval` and `build-vocab`.
//
// `stream` and `eval` share the dataset flags but differ in
// their defaults (split, device, truncation, repeat).
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::feed_use_case::{ComputeTarget, FeedConfig};
use crate::application::vocab_use_case::VocabConfig;
use crate::domain::collection::CollectionKind;
use crate::infra::seed::DEFAULT_SEED;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream training batches, restarting the data after every pass
    Stream(StreamArgs),

    /// Run one evaluation pass over a split
    Eval(EvalArgs),

    /// Build a word-level tokenizer from a collection split
    BuildVocab(VocabArgs),
}

/// File layout override; without it the layout follows the collection name
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LayoutArg {
    /// a.toks / b.toks / sim.txt / id.txt
    ShortSequence,
    /// <collection>/<split>.csv, 5 columns
    QuestionAnswer,
    /// datasets/<collection>.csv, 8 columns
    Delimited,
}

impl From<LayoutArg> for CollectionKind {
    fn from(a: LayoutArg) -> Self {
        match a {
            LayoutArg::ShortSequence  => CollectionKind::ShortSequence,
            LayoutArg::QuestionAnswer => CollectionKind::QuestionAnswer,
            LayoutArg::Delimited      => CollectionKind::Delimited,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DeviceArg {
    Cpu,
    Gpu,
}

impl From<DeviceArg> for ComputeTarget {
    fn from(a: DeviceArg) -> Self {
        match a {
            DeviceArg::Cpu => ComputeTarget::Cpu,
            DeviceArg::Gpu => ComputeTarget::Gpu,
        }
    }
}

/// Flags shared by `stream` and `eval`
#[derive(Args, Debug)]
pub struct DatasetArgs {
    /// Collection name; "mb" / "qa" in the name select the file layout
    #[arg(long)]
    pub collection: String,

    /// Root directory holding the collections
    #[arg(long, default_value = "data")]
    pub data_path: String,

    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Examples per batch (the last batch of a pass may be smaller)
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Cap on token ids per side of the pair
    #[arg(long, default_value_t = 512)]
    pub max_seq_len: usize,

    /// Directory with tokenizer.json (`stream` builds it if missing, `eval` requires it)
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_dir: String,

    /// Vocabulary size used when a tokenizer has to be built
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Where passes.csv and feed_config.json are written
    #[arg(long, default_value = "runs")]
    pub metrics_dir: String,
}

impl DatasetArgs {
    /// Apply these flags on top of a mode's defaults.
    fn apply(self, base: FeedConfig) -> FeedConfig {
        FeedConfig {
            data_path:     self.data_path,
            layout:        self.layout.map(Into::into),
            batch_size:    self.batch_size,
            max_seq_len:   self.max_seq_len,
            tokenizer_dir: self.tokenizer_dir,
            vocab_size:    self.vocab_size,
            seed:          self.seed,
            metrics_dir:   self.metrics_dir,
            ..base
        }
    }
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[arg(long, default_value = "train")]
    pub split: String,

    #[arg(long, value_enum, default_value = "gpu")]
    pub device: DeviceArg,

    /// Stop after this many passes (default: stream until killed)
    #[arg(long)]
    pub max_passes: Option<usize>,
}

impl From<StreamArgs> for FeedConfig {
    fn from(a: StreamArgs) -> Self {
        let base = FeedConfig {
            split:      a.split,
            device:     a.device.into(),
            max_passes: a.max_passes,
            ..FeedConfig::streaming(a.dataset.collection.clone())
        };
        a.dataset.apply(base)
    }
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[arg(long, default_value = "test")]
    pub split: String,

    #[arg(long, value_enum, default_value = "cpu")]
    pub device: DeviceArg,
}

impl From<EvalArgs> for FeedConfig {
    fn from(a: EvalArgs) -> Self {
        let base = FeedConfig {
            split:  a.split,
            device: a.device.into(),
            ..FeedConfig::evaluation(a.dataset.collection.clone())
        };
        a.dataset.apply(base)
    }
}

#[derive(Args, Debug)]
pub struct VocabArgs {
    #[arg(long)]
    pub collection: String,

    #[arg(long, default_value = "data")]
    pub data_path: String,

    #[arg(long, default_value = "train")]
    pub split: String,

    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Output directory; an existing tokenizer.json is replaced
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_dir: String,

    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,
}

impl From<VocabArgs> for VocabConfig {
    fn from(a: VocabArgs) -> Self {
        VocabConfig {
            data_path:     a.data_path,
            collection:    a.collection,
            split:         a.split,
            layout:        a.layout.map(Into::into),
            tokenizer_dir: a.tokenizer_dir,
            vocab_size:    a.vocab_size,
        }
    }
}
