//! Before/After Distribution Report
//!
//! Summarises how cleaning changed the price, acreage, and construction-year
//! distributions. The raw side is located by normalized header name.

use crate::config::CleaningConfig;
use crate::error::CleaningError;
use crate::normalizer::normalize_header;
use crate::stages::columns::{ACREAGE, SALE_PRICE, YEAR_BUILT};
use crate::validator::price_expr;
use distribution::{BoxSummary, Histogram};
use polars::prelude::*;
use record_set::RecordSet;
use serde::Serialize;

/// Number of bins in the construction-year histograms
pub const YEAR_HISTOGRAM_BINS: usize = 50;

/// One column before and after cleaning
#[derive(Debug, Clone, Serialize)]
pub struct ColumnComparison<T> {
    pub column: &'static str,
    pub before: T,
    pub after: T,
}

/// Distribution summaries for the columns the cleaning tool charts
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributionReport {
    pub sale_price: Option<ColumnComparison<Option<BoxSummary>>>,
    pub acreage: Option<ColumnComparison<Option<BoxSummary>>>,
    pub year_built: Option<ColumnComparison<Histogram>>,
}

/// Compare raw and cleaned tables; a column pair is present only when both
/// tables have the column
pub fn compare_distributions(
    raw: &RecordSet,
    cleaned: &RecordSet,
    config: &CleaningConfig,
) -> Result<DistributionReport, CleaningError> {
    let sale_price = match raw_name(raw, cleaned, SALE_PRICE) {
        Some(before) => Some(ColumnComparison {
            column: SALE_PRICE,
            before: BoxSummary::compute(&raw_prices(raw, &before)?)?,
            after: BoxSummary::compute(&cleaned.coerced(SALE_PRICE)?)?,
        }),
        None => None,
    };

    let acreage = match raw_name(raw, cleaned, ACREAGE) {
        Some(before) => Some(ColumnComparison {
            column: ACREAGE,
            before: BoxSummary::compute(&raw.coerced(&before)?)?,
            after: BoxSummary::compute(&cleaned.coerced(ACREAGE)?)?,
        }),
        None => None,
    };

    let (min_year, max_year) = config.year_range();
    let in_range = |y: &f64| *y >= min_year && *y <= max_year;
    let year_built = match raw_name(raw, cleaned, YEAR_BUILT) {
        Some(before) => {
            let mut years_before = raw.numbers(&before)?;
            years_before.retain(in_range);
            let mut years_after = cleaned.numbers(YEAR_BUILT)?;
            years_after.retain(in_range);
            Some(ColumnComparison {
                column: YEAR_BUILT,
                before: Histogram::compute(&years_before, YEAR_HISTOGRAM_BINS),
                after: Histogram::compute(&years_after, YEAR_HISTOGRAM_BINS),
            })
        }
        None => None,
    };

    Ok(DistributionReport {
        sale_price,
        acreage,
        year_built,
    })
}

/// Raw header that normalizes to `column`, when the cleaned table kept it
fn raw_name(raw: &RecordSet, cleaned: &RecordSet, column: &str) -> Option<String> {
    if !cleaned.has_column(column) {
        return None;
    }
    raw.headers().into_iter().find(|h| normalize_header(h) == column)
}

/// Raw price text converted the same way the cleaning stage converts it
fn raw_prices(raw: &RecordSet, name: &str) -> Result<Float64Chunked, CleaningError> {
    let frame = raw
        .frame()
        .clone()
        .lazy()
        .select([price_expr(name).alias("price")])
        .collect()?;
    Ok(frame.column("price")?.as_materialized_series().f64()?.clone())
}
