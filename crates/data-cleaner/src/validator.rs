//! Cell Coercion for Dates, Years, and Prices

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Calendar layouts accepted for sale dates, month-first when ambiguous
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Timestamp layouts whose date part is kept
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Currency symbol and thousands separator
const CURRENCY_PATTERN: &str = "[$,]";

/// Parse text as a calendar date; anything unparsable yields `None`
pub fn parse_sale_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Expression converting a price column to floats after stripping `$` and
/// thousands separators; unparsable cells become null
pub fn price_expr(column: &str) -> Expr {
    col(column)
        .cast(DataType::String)
        .str()
        .replace_all(lit(CURRENCY_PATTERN), lit(""), false)
        .cast(DataType::Float64)
}

/// Validate a coerced construction year, nulling implausible values
///
/// A year below `min_year` or after the sale year (when known) becomes
/// missing.
pub fn validate_year(year: Option<f64>, min_year: f64, sale_year: Option<i32>) -> Option<f64> {
    let year = year.filter(|y| y.is_finite())?;
    if year < min_year {
        return None;
    }
    if sale_year.is_some_and(|sold| year > sold as f64) {
        return None;
    }
    Some(year)
}
