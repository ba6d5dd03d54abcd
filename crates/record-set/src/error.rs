//! Record Set Error Types

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while loading, inspecting, or exporting a record set
#[derive(Debug, Error)]
pub enum RecordSetError {
    /// Error surfaced by the dataframe engine (parse, cast, or write)
    #[error("{0}")]
    Frame(#[from] PolarsError),

    /// Upload bytes are not valid UTF-8 and lossy decoding was not requested
    #[error("Invalid UTF-8 at byte {}", .0.valid_up_to())]
    Encoding(#[from] std::str::Utf8Error),

    /// Input has no header row
    #[error("Input contains no header row")]
    Empty,
}
