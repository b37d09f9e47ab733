//! Error type shared by every problem set.
//!
//! Numerical non-convergence is not represented here: solvers report it
//! through a flag on their result. These variants cover bad input, failed
//! I/O and degenerate linear algebra.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for compecon.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Column is not numeric: {0}")]
    NonNumericColumn(String),

    #[error("No data: {0}")]
    EmptyData(String),

    #[error("Cannot fit a line: {0}")]
    DegenerateFit(String),

    #[error("Dimension mismatch: expected {expected}, got {actual} ({what})")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Singular Jacobian at column {0}")]
    SingularJacobian(usize),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("Invalid cache file {path}: {reason}")]
    CacheFormat { path: PathBuf, reason: String },
}

impl Error {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
