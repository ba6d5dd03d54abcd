//! Explorer Error Types

use polars::prelude::PolarsError;
use record_set::RecordSetError;
use thiserror::Error;

/// Errors raised while preparing tracks or building insights
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplorerError {
    /// Dataset lacks a column the chart needs
    #[error("Dataset has no `{0}` column")]
    MissingColumn(&'static str),

    /// Insight key not in the catalog
    #[error("Unknown insight: {0}")]
    UnknownInsight(String),

    /// Session id not registered
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Frame operation failed
    #[error("Frame error: {0}")]
    Frame(String),
}

impl From<PolarsError> for ExplorerError {
    fn from(e: PolarsError) -> Self {
        ExplorerError::Frame(e.to_string())
    }
}

impl From<RecordSetError> for ExplorerError {
    fn from(e: RecordSetError) -> Self {
        ExplorerError::Frame(e.to_string())
    }
}
