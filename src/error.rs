// ============================================================
// Feed Errors
// ============================================================
// Every failure the data pipeline can report.
//
// The data and domain layers return FeedError so callers can
// match on the kind of failure (e.g. a bad collection name vs.
// a malformed row). The application and CLI layers wrap these
// in anyhow with extra context.
//
// Reference: Rust Book §9 (Error Handling)
//            thiserror crate documentation

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the domain and data layers.
pub type FeedResult<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The caller asked for something the pipeline cannot serve:
    /// an unusable collection name, a zero batch size, etc.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot read '{}': {}", .path.display(), .source)]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimited row did not split into the expected number of fields.
    #[error("line {line}: expected {expected} tab-separated fields, found {found}")]
    MalformedRow {
        line:     usize,
        expected: usize,
        found:    usize,
    },

    /// A composite id did not have the six whitespace-separated fields.
    #[error("line {line}: malformed composite id '{value}'")]
    MalformedCompositeId { line: usize, value: String },

    #[error("line {line}: field '{field}' is not an integer: '{value}'")]
    InvalidInteger {
        line:  usize,
        field: &'static str,
        value: String,
    },

    #[error("tokenizer error: {0}")]
    Tokenizer(String),
}

impl FeedError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        FeedError::Configuration(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FeedError::Io { path: path.into(), source }
    }
}
