//! Box Summaries

use polars::prelude::*;
use serde::Serialize;

/// Five-number summary plus mean, as drawn by a box plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl BoxSummary {
    /// Summarise the present values of a column, `None` when there are none
    ///
    /// Quartiles interpolate linearly between order statistics.
    pub fn compute(values: &Float64Chunked) -> PolarsResult<Option<Self>> {
        let count = values.len() - values.null_count();
        let (Some(min), Some(max), Some(median), Some(mean)) =
            (values.min(), values.max(), values.median(), values.mean())
        else {
            return Ok(None);
        };
        let q1 = values.quantile(0.25, QuantileMethod::Linear)?.unwrap_or(min);
        let q3 = values.quantile(0.75, QuantileMethod::Linear)?.unwrap_or(max);

        Ok(Some(Self {
            count,
            min,
            q1,
            median,
            q3,
            max,
            mean,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(values: &[Option<f64>]) -> Float64Chunked {
        Float64Chunked::from_iter_options("v".into(), values.iter().copied())
    }

    #[test]
    fn test_box_summary() {
        let values = chunked(&[Some(5.0), Some(1.0), None, Some(3.0), Some(2.0), Some(4.0)]);
        let summary = BoxSummary::compute(&values).unwrap().unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.mean, 3.0);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let summary = BoxSummary::compute(&chunked(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]))
            .unwrap()
            .unwrap();
        assert_eq!(summary.q1, 1.75);
        assert_eq!(summary.median, 2.5);
    }

    #[test]
    fn test_all_missing_has_no_summary() {
        assert!(BoxSummary::compute(&chunked(&[None, None])).unwrap().is_none());
        assert!(BoxSummary::compute(&chunked(&[])).unwrap().is_none());
    }

    proptest::proptest! {
        #[test]
        fn prop_quartiles_ordered(values in proptest::collection::vec(-1e6f64..1e6, 1..50)) {
            let ca = Float64Chunked::from_vec("v".into(), values);
            let s = BoxSummary::compute(&ca).unwrap().unwrap();
            proptest::prop_assert!(s.min <= s.q1 && s.q1 <= s.median);
            proptest::prop_assert!(s.median <= s.q3 && s.q3 <= s.max);
        }
    }
}
