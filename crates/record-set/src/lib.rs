//! Tabular Record Sets
//!
//! Wraps a polars [`DataFrame`](polars::prelude::DataFrame) as the table every
//! tool works on, with CSV and Parquet loading, CSV export, and conversion of
//! cells into serializable [`Value`]s for previews.

mod error;
mod io;
mod table;
mod value;

pub use error::RecordSetError;
pub use io::{from_bytes, from_parquet, load, to_bytes, FileFormat, ReadOptions};
pub use table::RecordSet;
pub use value::Value;
