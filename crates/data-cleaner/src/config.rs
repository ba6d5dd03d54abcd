//! Cleaning Configuration

use crate::error::CleaningError;
use serde::{Deserialize, Serialize};

/// Bounds applied by the range-checking stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Earliest plausible construction year
    pub min_year_built: i32,
    /// Latest construction year kept by the year filter
    pub max_year_built: i32,
    /// Inclusive sale price bounds
    pub sale_price_range: (f64, f64),
    /// Acreage must be strictly below this
    pub acreage_limit: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            min_year_built: 1800,
            max_year_built: 2023,
            sale_price_range: (1000.0, 5_000_000.0),
            acreage_limit: 50.0,
        }
    }
}

impl CleaningConfig {
    /// Check that every bound is usable
    pub fn validate(&self) -> Result<(), CleaningError> {
        if self.min_year_built > self.max_year_built {
            return Err(CleaningError::InvalidRange {
                field: "year_built",
                min: self.min_year_built as f64,
                max: self.max_year_built as f64,
            });
        }

        let (min, max) = self.sale_price_range;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(CleaningError::InvalidRange {
                field: "sale_price",
                min,
                max,
            });
        }

        if !self.acreage_limit.is_finite() {
            return Err(CleaningError::InvalidLimit {
                field: "acreage",
                value: self.acreage_limit,
            });
        }

        Ok(())
    }

    /// Year bounds as floats for comparison against coerced cells
    pub fn year_range(&self) -> (f64, f64) {
        (self.min_year_built as f64, self.max_year_built as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CleaningConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_year_range() {
        let config = CleaningConfig {
            min_year_built: 2000,
            max_year_built: 1900,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CleaningError::InvalidRange { field: "year_built", .. })
        ));
    }

    #[test]
    fn test_non_finite_limits() {
        let config = CleaningConfig {
            sale_price_range: (f64::NAN, 10.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CleaningConfig {
            acreage_limit: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: CleaningConfig = serde_json::from_str(r#"{"acreage_limit": 10.0}"#).unwrap();
        assert_eq!(config.acreage_limit, 10.0);
        assert_eq!(config.min_year_built, 1800);
    }
}
