//! Cell Values and the Missing Marker

use chrono::NaiveDate;
use polars::prelude::AnyValue;
use serde::Serialize;

/// Tokens the CSV reader treats as "no value" (empty fields are always null)
pub(crate) const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Days between 0001-01-01 and the Unix epoch
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A single cell, detached from its frame
///
/// Serializes untagged so previews read as plain JSON scalars, with `null` for
/// the missing marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Whether this is the missing marker
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric payload, without coercion
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, without coercion
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Calendar date for a physical `Date` value
pub(crate) fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

impl From<AnyValue<'_>> for Value {
    fn from(cell: AnyValue<'_>) -> Self {
        match cell {
            AnyValue::Null => Value::Missing,
            AnyValue::Boolean(b) => Value::Text(if b { "True" } else { "False" }.to_string()),
            AnyValue::String(s) => Value::Text(s.to_string()),
            AnyValue::StringOwned(s) => Value::Text(s.to_string()),
            AnyValue::Date(days) => date_from_epoch_days(days).map_or(Value::Missing, Value::Date),
            other => match other.extract::<f64>() {
                Some(n) if n.is_nan() => Value::Missing,
                Some(n) => Value::Number(n),
                None => Value::Text(other.to_string()),
            },
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}
