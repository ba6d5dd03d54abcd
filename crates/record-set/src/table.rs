//! Record Set Implementation

use crate::error::RecordSetError;
use crate::value::{date_from_epoch_days, Value};
use chrono::NaiveDate;
use polars::prelude::*;

/// A loaded table: a polars frame plus the helpers every tool reads it through
///
/// Transformations build new frames; a set is never mutated once built.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    frame: DataFrame,
}

impl RecordSet {
    /// Wrap a frame
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Underlying frame
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Unwrap the frame
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Column names in order
    pub fn headers(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Whether a column with this exact name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    /// Missing cells across the whole table
    pub fn missing_count(&self) -> usize {
        self.frame.get_columns().iter().map(|c| c.null_count()).sum()
    }

    /// First `n` rows as detached cells
    pub fn head_rows(&self, n: usize) -> Result<Vec<Vec<Value>>, RecordSetError> {
        let columns = self.frame.get_columns();
        (0..n.min(self.len()))
            .map(|i| {
                columns
                    .iter()
                    .map(|column| -> Result<Value, RecordSetError> {
                        Ok(Value::from(column.get(i)?))
                    })
                    .collect()
            })
            .collect()
    }

    /// Column coerced to floats; cells that do not parse become missing
    pub fn coerced(&self, name: &str) -> Result<Float64Chunked, RecordSetError> {
        let column = self.frame.column(name)?.cast(&DataType::Float64)?;
        Ok(column.as_materialized_series().f64()?.clone())
    }

    /// Present, finite numeric values of a column, in row order
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, RecordSetError> {
        Ok(self
            .coerced(name)?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect())
    }

    /// Rows where both columns hold finite numbers, as `(x, y)` pairs
    pub fn number_pairs(&self, x: &str, y: &str) -> Result<Vec<(f64, f64)>, RecordSetError> {
        let xs = self.coerced(x)?;
        let ys = self.coerced(y)?;
        Ok(xs
            .into_iter()
            .zip(ys.into_iter())
            .filter_map(|pair| match pair {
                (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((a, b)),
                _ => None,
            })
            .collect())
    }

    /// Values of a date column; any other column type yields all missing
    pub fn dates(&self, name: &str) -> Result<Vec<Option<NaiveDate>>, RecordSetError> {
        let column = self.frame.column(name)?;
        if !matches!(column.dtype(), DataType::Date) {
            return Ok(vec![None; self.len()]);
        }
        let days = column.cast(&DataType::Int32)?;
        Ok(days
            .as_materialized_series()
            .i32()?
            .into_iter()
            .map(|d| d.and_then(date_from_epoch_days))
            .collect())
    }
}

impl From<DataFrame> for RecordSet {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordSet {
        RecordSet::new(
            df!(
                "name" => ["a", "b", "c"],
                "year" => [Some(1965i64), None, Some(1991)],
                "tempo" => ["100", "fast", "120"],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_shape_and_headers() {
        let set = sample();
        assert_eq!(set.len(), 3);
        assert_eq!(set.width(), 3);
        assert_eq!(set.headers(), vec!["name", "year", "tempo"]);
        assert!(set.has_column("tempo"));
        assert!(!set.has_column("Tempo"));
        assert_eq!(set.missing_count(), 1);
    }

    #[test]
    fn test_head_rows() {
        let rows = sample().head_rows(2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![Value::from("a"), Value::Number(1965.0), Value::from("100")]);
        assert!(rows[1][1].is_missing());
        assert_eq!(sample().head_rows(10).unwrap().len(), 3);
    }

    #[test]
    fn test_numbers_skip_unparsable() {
        let set = sample();
        assert_eq!(set.numbers("tempo").unwrap(), vec![100.0, 120.0]);
        assert_eq!(
            set.number_pairs("year", "tempo").unwrap(),
            vec![(1965.0, 100.0), (1991.0, 120.0)]
        );
        assert!(set.numbers("missing").is_err());
    }

    #[test]
    fn test_dates_only_from_date_columns() {
        let set = sample();
        assert_eq!(set.dates("name").unwrap(), vec![None, None, None]);

        let sold = NaiveDate::from_ymd_opt(2005, 3, 1).unwrap();
        let frame = df!("sale_date" => [Some(sold), None]).unwrap();
        assert_eq!(
            RecordSet::new(frame).dates("sale_date").unwrap(),
            vec![Some(sold), None]
        );
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn numbers_never_exceed_rows(values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 0..50)) {
            let present = values.iter().filter(|v| v.is_some()).count();
            let set = RecordSet::new(df!("x" => values).unwrap());
            let numbers = set.numbers("x").unwrap();
            prop_assert_eq!(numbers.len(), present);
            prop_assert_eq!(set.missing_count(), set.len() - present);
        }
    }
}
