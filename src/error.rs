//! Crate error types.
//!
//! All errors carry enough context (paths, parameter names, shapes) that a
//! failing notebook cell can be diagnosed without re-running with a debugger.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for trazar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the analysis helpers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("failed to read summary table {path}: {message}")]
    SummaryParse { path: PathBuf, message: String },

    #[error("checkpoint not found: {path}")]
    CheckpointNotFound { path: PathBuf },

    #[error("malformed checkpoint {path}: {message}")]
    CheckpointParse { path: PathBuf, message: String },

    #[error("parameter '{name}' shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("missing parameter '{0}' in checkpoint state")]
    MissingParameter(String),

    #[error("unknown model architecture: {0}")]
    UnknownArchitecture(String),

    #[error("invalid model config: {0}")]
    ModelConfig(String),

    #[error("malformed hit graph {path}: {message}")]
    MalformedGraph { path: PathBuf, message: String },

    #[error("requested {requested} examples from a dataset of length {len}")]
    DatasetBounds { requested: usize, len: usize },

    #[error("degenerate metric input: {0}")]
    DegenerateInput(String),
}
