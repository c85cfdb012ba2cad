//! Error handling for the mortality dashboard.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;

/// Specialized error type for loading, filtering and aggregating dashboard tables
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Error opening or reading a file
    #[error("IO error{}: {source}", display_path(.path))]
    Io {
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    /// Error raised by an Arrow reader or compute kernel
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error decoding JSON (the boundary document)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A table is missing a required column or has an unusable layout
    #[error("Schema error: {0}")]
    Schema(String),

    /// Error evaluating a filter expression
    #[error("Filter error: {0}")]
    Filter(String),

    /// Error grouping or summing a table
    #[error("Aggregation error: {0}")]
    Aggregate(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

impl DashboardError {
    /// Wrap an IO error together with the path it concerns
    pub fn io(source: io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a filter error
    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    /// Create an aggregation error
    pub fn aggregate(message: impl Into<String>) -> Self {
        Self::Aggregate(message.into())
    }
}

impl From<io::Error> for DashboardError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
