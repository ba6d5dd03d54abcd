//! Row Filters for Range Checking

use crate::error::CleaningError;
use polars::prelude::*;
use record_set::RecordSet;

/// Predicate over a column coerced to floats
///
/// Missing and non-numeric cells never satisfy a bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// `min <= x <= max`
    Between(f64, f64),
    /// `x < limit`
    Below(f64),
}

impl Bound {
    /// Filter expression over `column`
    pub fn predicate(&self, column: &str) -> Expr {
        let value = col(column).cast(DataType::Float64);
        match *self {
            Bound::Between(min, max) => value.clone().gt_eq(lit(min)).and(value.lt_eq(lit(max))),
            Bound::Below(limit) => value.lt(lit(limit)),
        }
    }
}

/// Keep rows whose column value satisfies the bound; returns the kept set and
/// the number of rows removed
pub fn retain_within(
    set: &RecordSet,
    column: &str,
    bound: Bound,
) -> Result<(RecordSet, usize), CleaningError> {
    let kept = set
        .frame()
        .clone()
        .lazy()
        .filter(bound.predicate(column))
        .collect()?;
    let removed = set.len() - kept.height();
    Ok((RecordSet::new(kept), removed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acreage(values: &[Option<f64>]) -> RecordSet {
        RecordSet::new(df!("acreage" => values).unwrap())
    }

    #[test]
    fn test_between_is_inclusive() {
        let set = acreage(&[Some(999.99), Some(1000.0), Some(5_000_000.0), None]);
        let (kept, removed) =
            retain_within(&set, "acreage", Bound::Between(1000.0, 5_000_000.0)).unwrap();
        assert_eq!(kept.numbers("acreage").unwrap(), vec![1000.0, 5_000_000.0]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_below_is_strict() {
        let set = acreage(&[Some(0.5), Some(49.9), Some(50.0), Some(75.0), None]);
        let (kept, removed) = retain_within(&set, "acreage", Bound::Below(50.0)).unwrap();
        assert_eq!(kept.numbers("acreage").unwrap(), vec![0.5, 49.9]);
        assert_eq!(removed, 3);
    }

    #[test]
    fn test_text_cells_never_pass() {
        let set = RecordSet::new(df!("acreage" => ["small", "12"]).unwrap());
        let (kept, _) = retain_within(&set, "acreage", Bound::Below(50.0)).unwrap();
        assert_eq!(kept.len(), 1);
    }
}
