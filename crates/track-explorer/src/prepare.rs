//! Track Dataset Preparation

use crate::error::ExplorerError;
use polars::prelude::*;
use record_set::RecordSet;
use tracing::debug;

/// Earliest release year kept
pub const MIN_RELEASE_YEAR: f64 = 1900.0;

/// Derive `duration_min` and `decade`, dropping tracks released before 1900
///
/// Each derivation only happens when its source column exists. Tracks with
/// no usable year are dropped along with the pre-1900 ones.
pub fn prepare_tracks(raw: &RecordSet) -> Result<RecordSet, ExplorerError> {
    let mut tracks = raw.frame().clone().lazy();

    if raw.has_column("duration_ms") {
        let minutes = col("duration_ms").cast(DataType::Float64) / lit(60_000.0);
        tracks = tracks.with_column(minutes.alias("duration_min"));
    }

    if raw.has_column("year") {
        let year = col("year").cast(DataType::Float64);
        let decade = (year.clone() / lit(10.0)).floor() * lit(10.0);
        tracks = tracks
            .filter(year.gt_eq(lit(MIN_RELEASE_YEAR)))
            .with_column(decade.alias("decade"));
    }

    let tracks = RecordSet::new(tracks.collect()?);
    debug!(
        "Prepared {} of {} tracks",
        tracks.len(),
        raw.len()
    );
    Ok(tracks)
}
