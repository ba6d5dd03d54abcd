//! Cleaning Stages
//!
//! Each stage reads the previous table and returns a new one plus the log
//! lines it contributes. Stages that target a column are only run when that
//! column exists after header normalization.

use crate::config::CleaningConfig;
use crate::error::CleaningError;
use crate::filter::{retain_within, Bound};
use crate::normalizer::{normalize_header, title_case};
use crate::validator::{parse_sale_date, price_expr, validate_year};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use record_set::RecordSet;
use std::collections::HashSet;
use tracing::debug;

/// Normalized column names the stages look for
pub mod columns {
    pub const SALE_DATE: &str = "sale_date";
    pub const YEAR_BUILT: &str = "year_built";
    pub const SALE_PRICE: &str = "sale_price";
    pub const LAND_USE: &str = "land_use";
    pub const ACREAGE: &str = "acreage";
}

use columns::{ACREAGE, LAND_USE, SALE_DATE, SALE_PRICE, YEAR_BUILT};

/// Result of running one stage
#[derive(Debug, Clone)]
pub struct StageOutput {
    /// Table handed to the next stage
    pub table: RecordSet,
    /// Log lines contributed, possibly none
    pub log: Vec<String>,
}

impl StageOutput {
    fn new(table: RecordSet, log: Vec<String>) -> Self {
        Self { table, log }
    }
}

/// One discrete transformation of the pipeline
pub trait Stage: Send + Sync {
    /// Short identifier used in tracing output
    fn name(&self) -> &'static str;

    /// Normalized column this stage needs, if any
    fn target(&self) -> Option<&'static str> {
        None
    }

    /// Transform the table
    fn apply(&self, input: &RecordSet, config: &CleaningConfig) -> Result<StageOutput, CleaningError>;
}

/// The stage table in execution order
pub fn standard_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(NormalizeHeaders),
        Box::new(ParseSaleDates),
        Box::new(ValidateYearBuilt),
        Box::new(DropDuplicates),
        Box::new(ImputeMissing),
        Box::new(NormalizeSalePrice),
        Box::new(TitleCaseLandUse),
        Box::new(FilterYearBuilt),
        Box::new(FilterAcreage),
    ]
}

/// Replace (or append) one column of a table
fn replace_column(input: &RecordSet, column: impl IntoColumn) -> Result<RecordSet, CleaningError> {
    let mut frame = input.frame().clone();
    frame.with_column(column)?;
    Ok(RecordSet::new(frame))
}

fn numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Lowercase, trimmed, underscore-separated headers
pub struct NormalizeHeaders;

impl Stage for NormalizeHeaders {
    fn name(&self) -> &'static str {
        "normalize_headers"
    }

    fn apply(&self, input: &RecordSet, _config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let names: Vec<String> = input.headers().iter().map(|h| normalize_header(h)).collect();
        let mut seen = HashSet::with_capacity(names.len());
        if let Some(clash) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(CleaningError::DuplicateHeader(clash.clone()));
        }
        let mut frame = input.frame().clone();
        frame.set_column_names(names)?;

        Ok(StageOutput::new(
            RecordSet::new(frame),
            vec!["Standardized column names (lowercase, underscores).".to_string()],
        ))
    }
}

/// Sale dates parsed to calendar dates; failures become missing
pub struct ParseSaleDates;

impl Stage for ParseSaleDates {
    fn name(&self) -> &'static str {
        "parse_sale_dates"
    }

    fn target(&self) -> Option<&'static str> {
        Some(SALE_DATE)
    }

    fn apply(&self, input: &RecordSet, _config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let column = input.frame().column(SALE_DATE)?;
        let table = match column.dtype() {
            DataType::Date => input.clone(),
            DataType::Datetime(..) => replace_column(input, column.cast(&DataType::Date)?)?,
            DataType::String => {
                let parsed: Vec<Option<NaiveDate>> = column
                    .as_materialized_series()
                    .str()?
                    .into_iter()
                    .map(|cell| cell.and_then(parse_sale_date))
                    .collect();
                replace_column(input, Series::new(SALE_DATE.into(), parsed))?
            }
            // numbers are not calendar dates
            _ => replace_column(
                input,
                Series::new(SALE_DATE.into(), vec![None::<NaiveDate>; input.len()]),
            )?,
        };

        debug!(
            "Parsed sale dates, {} missing",
            table.frame().column(SALE_DATE)?.null_count()
        );
        Ok(StageOutput::new(
            table,
            vec!["Converted `sale_date` to datetime format.".to_string()],
        ))
    }
}

/// Construction years coerced to numbers; implausible or post-sale years
/// become missing. Never imputed.
pub struct ValidateYearBuilt;

impl Stage for ValidateYearBuilt {
    fn name(&self) -> &'static str {
        "validate_year_built"
    }

    fn target(&self) -> Option<&'static str> {
        Some(YEAR_BUILT)
    }

    fn apply(&self, input: &RecordSet, config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let (min_year, _) = config.year_range();
        let years = input.coerced(YEAR_BUILT)?;
        let sale_years: Vec<Option<i32>> = if input.has_column(SALE_DATE) {
            input
                .dates(SALE_DATE)?
                .into_iter()
                .map(|d| d.map(|d| d.year()))
                .collect()
        } else {
            vec![None; input.len()]
        };

        let validated: Vec<Option<f64>> = years
            .into_iter()
            .zip(sale_years)
            .map(|(year, sold)| validate_year(year, min_year, sold))
            .collect();
        let table = replace_column(input, Series::new(YEAR_BUILT.into(), validated))?;
        debug!(
            "Validated year_built, {} values now missing",
            table.frame().column(YEAR_BUILT)?.null_count()
        );

        Ok(StageOutput::new(
            table,
            vec![
                "Cleaned `year_built` (coerced to numeric, removed impossible/future years)."
                    .to_string(),
            ],
        ))
    }
}

/// Exact duplicate rows removed, first occurrence kept; missing cells compare
/// equal to each other
pub struct DropDuplicates;

impl Stage for DropDuplicates {
    fn name(&self) -> &'static str {
        "drop_duplicates"
    }

    fn apply(&self, input: &RecordSet, _config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let unique = input
            .frame()
            .unique_stable(None, UniqueKeepStrategy::First, None)?;

        let removed = input.len() - unique.height();
        let mut log = Vec::new();
        if removed > 0 {
            log.push(format!("Removed {} duplicate rows.", removed));
        }
        Ok(StageOutput::new(RecordSet::new(unique), log))
    }
}

/// Median fill for numeric columns (except `year_built`), mode fill for text
pub struct ImputeMissing;

impl ImputeMissing {
    /// Fill expression for one column, `None` when it is left alone
    fn fill_expr(column: &Column) -> Option<Expr> {
        let name = column.name().as_str();
        let nulls = column.null_count();
        if name == YEAR_BUILT || nulls == 0 || nulls == column.len() {
            return None;
        }
        let fill = match column.dtype() {
            dtype if numeric_dtype(dtype) => col(name).median(),
            // ties between modes go to the smallest value
            DataType::String => col(name)
                .drop_nulls()
                .mode()
                .sort(SortOptions::default())
                .first(),
            _ => return None,
        };
        Some(col(name).fill_null(fill))
    }
}

impl Stage for ImputeMissing {
    fn name(&self) -> &'static str {
        "impute_missing"
    }

    fn apply(&self, input: &RecordSet, _config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let fills: Vec<Expr> = input
            .frame()
            .get_columns()
            .iter()
            .filter_map(Self::fill_expr)
            .collect();
        if fills.is_empty() {
            return Ok(StageOutput::new(input.clone(), Vec::new()));
        }

        let table = RecordSet::new(input.frame().clone().lazy().with_columns(fills).collect()?);
        let filled = input.missing_count() - table.missing_count();
        let mut log = Vec::new();
        if filled > 0 {
            log.push(format!(
                "Filled {} missing values (median/mode), excluding `year_built`.",
                filled
            ));
        }
        Ok(StageOutput::new(table, log))
    }
}

/// Sale prices stripped of `$` and `,`, parsed, then range filtered
pub struct NormalizeSalePrice;

impl Stage for NormalizeSalePrice {
    fn name(&self) -> &'static str {
        "normalize_sale_price"
    }

    fn target(&self) -> Option<&'static str> {
        Some(SALE_PRICE)
    }

    fn apply(&self, input: &RecordSet, config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let converted = input
            .frame()
            .clone()
            .lazy()
            .with_column(price_expr(SALE_PRICE))
            .collect()?;
        let (min, max) = config.sale_price_range;
        let (table, removed) =
            retain_within(&RecordSet::new(converted), SALE_PRICE, Bound::Between(min, max))?;

        Ok(StageOutput::new(
            table,
            vec![
                "Converted `sale_price` to numeric (removed $ and commas).".to_string(),
                format!("Filtered extreme sale_price values. Removed {} rows.", removed),
            ],
        ))
    }
}

/// Land-use categories rewritten in title case
pub struct TitleCaseLandUse;

impl Stage for TitleCaseLandUse {
    fn name(&self) -> &'static str {
        "title_case_land_use"
    }

    fn target(&self) -> Option<&'static str> {
        Some(LAND_USE)
    }

    fn apply(&self, input: &RecordSet, _config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let column = input.frame().column(LAND_USE)?;
        let table = if matches!(column.dtype(), DataType::String) {
            let cased: StringChunked = column
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|cell| cell.map(title_case))
                .collect();
            replace_column(input, cased.with_name(LAND_USE.into()).into_series())?
        } else {
            input.clone()
        };

        Ok(StageOutput::new(
            table,
            vec!["Standardized text casing in `land_use` column.".to_string()],
        ))
    }
}

/// Second year pass: re-coerce, then drop rows outside the year range
pub struct FilterYearBuilt;

impl Stage for FilterYearBuilt {
    fn name(&self) -> &'static str {
        "filter_year_built"
    }

    fn target(&self) -> Option<&'static str> {
        Some(YEAR_BUILT)
    }

    fn apply(&self, input: &RecordSet, config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let coerced = replace_column(input, input.coerced(YEAR_BUILT)?.into_series())?;
        let (min, max) = config.year_range();
        let (table, removed) = retain_within(&coerced, YEAR_BUILT, Bound::Between(min, max))?;

        Ok(StageOutput::new(
            table,
            vec![format!(
                "Filtered invalid `year_built` values (kept between {}–{}). Removed {} rows.",
                config.min_year_built, config.max_year_built, removed
            )],
        ))
    }
}

/// Rows with acreage at or above the limit dropped
pub struct FilterAcreage;

impl Stage for FilterAcreage {
    fn name(&self) -> &'static str {
        "filter_acreage"
    }

    fn target(&self) -> Option<&'static str> {
        Some(ACREAGE)
    }

    fn apply(&self, input: &RecordSet, config: &CleaningConfig) -> Result<StageOutput, CleaningError> {
        let (table, removed) = retain_within(input, ACREAGE, Bound::Below(config.acreage_limit))?;

        Ok(StageOutput::new(
            table,
            vec![format!(
                "Removed extreme `acreage` values. Removed {} rows.",
                removed
            )],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_set::Value;

    fn run(stage: &dyn Stage, input: &RecordSet) -> StageOutput {
        stage.apply(input, &CleaningConfig::default()).unwrap()
    }

    fn cells(set: &RecordSet, column: &str) -> Vec<Value> {
        let idx = set.headers().iter().position(|h| h == column).unwrap();
        set.head_rows(set.len())
            .unwrap()
            .into_iter()
            .map(|row| row[idx].clone())
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_headers_always_logged() {
        let input = RecordSet::new(df!(" Sale Date" => [1i64], "Land Use " => ["x"]).unwrap());
        let out = run(&NormalizeHeaders, &input);
        assert_eq!(out.table.headers(), vec!["sale_date", "land_use"]);
        assert_eq!(out.log.len(), 1);
    }

    #[test]
    fn test_colliding_headers_fail_the_stage() {
        let input = RecordSet::new(df!("Sale Date" => [1i64], "sale date" => [2i64]).unwrap());
        let err = NormalizeHeaders
            .apply(&input, &CleaningConfig::default())
            .unwrap_err();
        assert!(matches!(err, CleaningError::DuplicateHeader(name) if name == "sale_date"));
    }

    #[test]
    fn test_unparsable_dates_become_missing() {
        let input = RecordSet::new(df!("sale_date" => [Some("2005-03-01"), Some("soon"), None]).unwrap());
        let out = run(&ParseSaleDates, &input);
        assert_eq!(
            out.table.dates(SALE_DATE).unwrap(),
            vec![Some(date(2005, 3, 1)), None, None]
        );
    }

    #[test]
    fn test_numeric_sale_dates_become_missing() {
        let input = RecordSet::new(df!("sale_date" => [20050301i64]).unwrap());
        let out = run(&ParseSaleDates, &input);
        assert_eq!(out.table.dates(SALE_DATE).unwrap(), vec![None]);
    }

    #[test]
    fn test_year_after_sale_nulled() {
        let sold = Some(date(2005, 3, 1));
        let input = RecordSet::new(
            df!(
                "sale_date" => [sold, sold, None, sold],
                "year_built" => ["2050", "1890", "2050", "1200"],
            )
            .unwrap(),
        );
        let out = run(&ValidateYearBuilt, &input);
        assert_eq!(
            cells(&out.table, YEAR_BUILT),
            vec![
                Value::Missing,
                Value::Number(1890.0),
                Value::Number(2050.0),
                Value::Missing
            ]
        );
    }

    #[test]
    fn test_duplicates_logged_only_when_found() {
        let input = RecordSet::new(
            df!(
                "a" => [1.0, 1.0, 2.0],
                "b" => [None::<&str>, None, None],
            )
            .unwrap(),
        );
        let out = run(&DropDuplicates, &input);
        assert_eq!(out.table.len(), 2);
        assert_eq!(out.log, vec!["Removed 1 duplicate rows."]);

        let again = run(&DropDuplicates, &out.table);
        assert_eq!(again.table.len(), 2);
        assert!(again.log.is_empty());
    }

    #[test]
    fn test_duplicates_keep_first_in_order() {
        let input = RecordSet::new(df!("a" => [3i64, 1, 3, 2, 1]).unwrap());
        let out = run(&DropDuplicates, &input);
        assert_eq!(out.table.numbers("a").unwrap(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_imputation_skips_year_built_and_dates() {
        let input = RecordSet::new(
            df!(
                "year_built" => [None, Some(1900.0), Some(1950.0)],
                "acreage" => [Some(1.0), None, Some(4.0)],
                "land_use" => [Some("b"), None, Some("a")],
                "sale_date" => [None::<NaiveDate>, Some(date(2005, 3, 1)), None],
            )
            .unwrap(),
        );
        let out = run(&ImputeMissing, &input);
        assert!(cells(&out.table, YEAR_BUILT)[0].is_missing());
        assert_eq!(cells(&out.table, ACREAGE)[1], Value::Number(2.5));
        assert_eq!(cells(&out.table, LAND_USE)[1], Value::from("a"));
        assert!(cells(&out.table, SALE_DATE)[0].is_missing());
        assert_eq!(
            out.log,
            vec!["Filled 2 missing values (median/mode), excluding `year_built`."]
        );
    }

    #[test]
    fn test_mode_fill_prefers_most_frequent() {
        let input = RecordSet::new(
            df!("land_use" => [Some("z"), Some("z"), Some("a"), None]).unwrap(),
        );
        let out = run(&ImputeMissing, &input);
        assert_eq!(cells(&out.table, LAND_USE)[3], Value::from("z"));
    }

    #[test]
    fn test_nothing_to_impute_logs_nothing() {
        let input = RecordSet::new(df!("a" => [1.0]).unwrap());
        assert!(run(&ImputeMissing, &input).log.is_empty());
    }

    #[test]
    fn test_price_conversion_and_filter() {
        let input = RecordSet::new(
            df!("sale_price" => ["$250,000", "abc", "$500", "$5,000,000"]).unwrap(),
        );
        let out = run(&NormalizeSalePrice, &input);
        assert_eq!(out.table.len(), 2);
        assert_eq!(
            cells(&out.table, SALE_PRICE),
            vec![Value::Number(250_000.0), Value::Number(5_000_000.0)]
        );
        assert_eq!(out.log[1], "Filtered extreme sale_price values. Removed 2 rows.");
    }

    #[test]
    fn test_land_use_title_cased() {
        let input = RecordSet::new(df!("land_use" => [Some("SINGLE FAMILY"), None]).unwrap());
        let out = run(&TitleCaseLandUse, &input);
        assert_eq!(
            cells(&out.table, LAND_USE),
            vec![Value::from("Single Family"), Value::Missing]
        );
    }

    #[test]
    fn test_year_filter_logs_zero() {
        let input = RecordSet::new(df!("year_built" => [1990.0]).unwrap());
        let out = run(&FilterYearBuilt, &input);
        assert_eq!(out.table.len(), 1);
        assert_eq!(
            out.log,
            vec!["Filtered invalid `year_built` values (kept between 1800–2023). Removed 0 rows."]
        );
    }

    #[test]
    fn test_year_filter_drops_missing_and_future() {
        let input = RecordSet::new(df!("year_built" => [None, Some("2024"), Some("1999")]).unwrap());
        let out = run(&FilterYearBuilt, &input);
        assert_eq!(cells(&out.table, YEAR_BUILT), vec![Value::Number(1999.0)]);
    }

    #[test]
    fn test_acreage_filter_is_strict() {
        let input = RecordSet::new(df!("acreage" => [Some(49.99), Some(50.0), None]).unwrap());
        let out = run(&FilterAcreage, &input);
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.log, vec!["Removed extreme `acreage` values. Removed 2 rows."]);
    }

    #[test]
    fn test_stage_table_order() {
        let names: Vec<&str> = standard_stages().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "normalize_headers",
                "parse_sale_dates",
                "validate_year_built",
                "drop_duplicates",
                "impute_missing",
                "normalize_sale_price",
                "title_case_land_use",
                "filter_year_built",
                "filter_acreage",
            ]
        );
    }
}
