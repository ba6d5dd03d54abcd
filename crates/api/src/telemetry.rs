//! Service Metrics
//!
//! Prometheus counters for cleaning runs and explorer usage.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use track_explorer::InsightKey;

pub const CLEANING_RUNS: &str = "cleaning_runs_total";
pub const CLEANING_ROWS_REMOVED: &str = "cleaning_rows_removed";
pub const INSIGHTS_SHOWN: &str = "explorer_insights_shown_total";
pub const SESSIONS_OPENED: &str = "explorer_sessions_opened_total";

/// Install the global Prometheus recorder
///
/// Can only succeed once per process.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Count one pipeline run and how many rows it dropped
pub fn record_cleaning(raw_rows: usize, cleaned_rows: usize) {
    counter!(CLEANING_RUNS).increment(1);
    histogram!(CLEANING_ROWS_REMOVED).record(raw_rows.saturating_sub(cleaned_rows) as f64);
}

pub fn record_session_opened() {
    counter!(SESSIONS_OPENED).increment(1);
}

pub fn record_insight(key: InsightKey) {
    counter!(INSIGHTS_SHOWN, "insight" => key.as_str()).increment(1);
}
