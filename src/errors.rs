//! Error types for rapid_summarizer
//!
//! Every fatal condition surfaces as a [`SummarizeError`]. Degraded but
//! successful runs are reported through
//! [`SummaryWarning`](crate::types::SummaryWarning) instead.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SummarizeError>;

/// Errors produced while loading, segmenting or ranking a document
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The input could not be turned into text.
    #[error("invalid input: {0}")]
    Input(String),

    /// A text file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A parameter is outside its domain (weighting, norm, threshold, language, ...).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The term matrix does not carry enough independent rows to decompose.
    #[error("insufficient rank to decompose: {distinct_term_sets} distinct term set(s)")]
    Rank { distinct_term_sets: usize },

    /// An iterative kernel hit its iteration cap before converging.
    #[error("{stage} failed to converge after {iterations} iterations (delta {delta:e})")]
    Convergence {
        stage: &'static str,
        iterations: usize,
        delta: f64,
    },

    /// The per-call time limit expired.
    #[error("time limit of {limit:?} exceeded during {stage}")]
    DeadlineExceeded {
        stage: &'static str,
        limit: Duration,
    },
}

impl SummarizeError {
    /// Build an input error
    pub fn input(msg: impl Into<String>) -> Self {
        SummarizeError::Input(msg.into())
    }

    /// Build a configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        SummarizeError::Config(msg.into())
    }

    /// Wrap an I/O error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SummarizeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from the input rather than the configuration or ranking
    pub fn is_input_error(&self) -> bool {
        matches!(self, SummarizeError::Input(_) | SummarizeError::Io { .. })
    }

    /// Whether the error is an out-of-domain parameter
    pub fn is_config_error(&self) -> bool {
        matches!(self, SummarizeError::Config(_))
    }
}
