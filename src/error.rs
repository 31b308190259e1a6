//! Error types for drbench
//!
//! Every failure aborts the whole benchmark run. Nothing here is retried or
//! skipped, so a partial result matrix never reaches the reporters.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// drbench error types
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid experiment field
    #[error("Configuration error: {0}")]
    Config(String),

    /// Algorithm key not present in the reducer registry
    #[error("Unknown reduction algorithm: '{0}'")]
    UnknownAlgorithm(String),

    /// Target dimension exceeds the number of available features
    #[error("{algorithm}: target dimension {requested} exceeds available features ({available})")]
    DimensionTooLarge {
        /// Algorithm that was asked to reduce
        algorithm: String,
        /// Requested output dimension
        requested: usize,
        /// Feature count of the input matrix
        available: usize,
    },

    /// Data rows and labels disagree
    #[error("Shape mismatch after {stage}: {rows} data rows vs {labels} labels")]
    ShapeMismatch {
        /// Pipeline stage that produced the mismatch
        stage: String,
        /// Row count of the data matrix
        rows: usize,
        /// Length of the label vector
        labels: usize,
    },

    /// An external routine (reducer, classifier, cross-validation) failed
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// A metric series does not cover every target dimension
    #[error("Incomplete results for {algorithm}/{metric}: expected {expected} values, found {found}")]
    IncompleteResults {
        /// Algorithm identifier
        algorithm: String,
        /// Metric name
        metric: String,
        /// Number of target dimensions
        expected: usize,
        /// Number of recorded values
        found: usize,
    },

    /// Figure rendering failed
    #[error("Plot error: {0}")]
    Plot(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Experiment config could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn shape(stage: &str, rows: usize, labels: usize) -> Self {
        Self::ShapeMismatch {
            stage: stage.to_string(),
            rows,
            labels,
        }
    }
}
