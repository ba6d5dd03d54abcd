//! Data Cleaning Pipeline
//!
//! Turns a raw real-estate sales table into a cleaned table plus an ordered
//! log of the steps that had an effect. Tables are polars frames and every
//! stage is expressed as frame operations. Malformed cells never abort a run:
//! they become missing or are filtered out.

mod config;
mod error;
mod filter;
mod normalizer;
mod pipeline;
mod report;
mod stages;
mod validator;

pub use config::CleaningConfig;
pub use error::CleaningError;
pub use filter::{retain_within, Bound};
pub use normalizer::{normalize_header, title_case};
pub use pipeline::{clean, CleaningLog, CleaningOutcome, Pipeline, CLEANED_FILE_NAME};
pub use report::{compare_distributions, ColumnComparison, DistributionReport, YEAR_HISTOGRAM_BINS};
pub use stages::{columns, standard_stages, Stage, StageOutput};
pub use validator::{parse_sale_date, price_expr, validate_year};
