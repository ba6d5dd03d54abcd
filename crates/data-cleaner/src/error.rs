//! Cleaning Error Types

use polars::prelude::PolarsError;
use record_set::RecordSetError;
use thiserror::Error;

/// Errors in cleaning configuration or in the frame operations of a run
///
/// Malformed cells never raise: they become the missing marker or are
/// filtered out. A run only fails when the table itself cannot be
/// transformed.
#[derive(Debug, Error)]
pub enum CleaningError {
    /// Range bounds are inverted or not finite
    #[error("{field} range [{min}, {max}] is invalid")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// Upper limit is not a usable number
    #[error("{field} limit {value} is invalid")]
    InvalidLimit { field: &'static str, value: f64 },

    /// Two headers normalize to the same column name
    #[error("More than one column normalizes to `{0}`")]
    DuplicateHeader(String),

    /// Frame operation failed
    #[error("Frame error: {0}")]
    Frame(#[from] PolarsError),

    /// Column access failed
    #[error(transparent)]
    Record(#[from] RecordSetError),
}
