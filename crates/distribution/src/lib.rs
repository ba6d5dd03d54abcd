//! Column Distributions
//!
//! Provides the descriptive views used before and after cleaning and by the
//! explorer: box summaries over polars columns, equal-width histograms, and
//! Gaussian kernel density curves.

mod histogram;
mod kde;
mod statistics;

pub use histogram::Histogram;
pub use kde::{kde, KDE_GRID_POINTS};
pub use statistics::BoxSummary;
