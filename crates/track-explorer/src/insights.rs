//! Insight Series
//!
//! Builds the numbers behind each canned chart. Rendering is left to the
//! client; everything here is plot-ready data.

use crate::error::ExplorerError;
use crate::questions::InsightKey;
use distribution::{kde, Histogram, KDE_GRID_POINTS};
use polars::prelude::{col, DataType, IntoLazy};
use record_set::RecordSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bins used for the overall feature histograms and the tempo-by-decade view
const WIDE_BINS: usize = 50;
/// Bins used for the energy and valence by-decade views
const NARROW_BINS: usize = 40;

/// Named sequence of (x, y) points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// One feature's histogram with its kernel density curve
///
/// The curve is scaled to counts (density × values × bin width) so it
/// overlays the bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturePanel {
    pub label: String,
    pub histogram: Histogram,
    pub density: Vec<(f64, f64)>,
}

impl FeaturePanel {
    fn compute(label: String, values: &[f64], bins: usize) -> Self {
        let histogram = Histogram::compute(values, bins);
        let bin_width = histogram.edges.get(1).zip(histogram.edges.first()).map_or(0.0, |(b, a)| b - a);
        let scale = values.len() as f64 * bin_width;
        let density = kde(values, KDE_GRID_POINTS)
            .into_iter()
            .map(|(x, d)| (x, d * scale))
            .collect();
        Self {
            label,
            histogram,
            density,
        }
    }
}

/// Chart payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Scatter {
        x_label: String,
        y_label: String,
        points: Vec<(f64, f64)>,
    },
    Line {
        x_label: String,
        y_label: String,
        series: Vec<Series>,
    },
    /// One histogram per feature, side by side
    Histograms { panels: Vec<FeaturePanel> },
    /// Density histograms per decade on shared bins
    DecadeDensity {
        x_label: String,
        groups: Vec<(i64, Histogram)>,
    },
}

/// A chart with its heading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub key: InsightKey,
    pub title: String,
    pub chart: Chart,
}

/// Build the chart data for one insight
pub fn build_insight(key: InsightKey, tracks: &RecordSet) -> Result<Insight, ExplorerError> {
    let chart = match key {
        InsightKey::ScatterDurationDanceability => Chart::Scatter {
            x_label: "Duration (minutes)".into(),
            y_label: "Danceability".into(),
            points: pairs(tracks, "duration_min", "danceability")?,
        },
        InsightKey::ScatterEnergyValence => Chart::Scatter {
            x_label: "Energy".into(),
            y_label: "Valence (Positivity)".into(),
            points: pairs(tracks, "energy", "valence")?,
        },
        InsightKey::LineDurationOverTime => Chart::Line {
            x_label: "Year".into(),
            y_label: "Average Duration (minutes)".into(),
            series: vec![Series {
                label: "Average Duration".into(),
                points: grouped_means(tracks, "year", "duration_min")?,
            }],
        },
        InsightKey::HistFeatures => {
            let panels = ["tempo", "energy", "valence"]
                .into_iter()
                .map(|feature| {
                    let values = numbers(tracks, feature)?;
                    Ok::<_, ExplorerError>(FeaturePanel::compute(capitalize(feature), &values, WIDE_BINS))
                })
                .collect::<Result<Vec<_>, ExplorerError>>()?;
            Chart::Histograms { panels }
        }
        InsightKey::HistTempoDecade => decade_density(tracks, "tempo", "Tempo (BPM)", WIDE_BINS)?,
        InsightKey::HistEnergyDecade => decade_density(tracks, "energy", "Energy", NARROW_BINS)?,
        InsightKey::HistValenceDecade => decade_density(
            tracks,
            "valence",
            "Valence (0 = Sad, 1 = Happy)",
            NARROW_BINS,
        )?,
        InsightKey::LineDecadeTrends => {
            let series = ["tempo", "energy", "valence"]
                .into_iter()
                .map(|feature| {
                    Ok::<_, ExplorerError>(Series {
                        label: capitalize(feature),
                        points: grouped_means(tracks, "decade", feature)?,
                    })
                })
                .collect::<Result<Vec<_>, ExplorerError>>()?;
            Chart::Line {
                x_label: "Decade".into(),
                y_label: "Value".into(),
                series,
            }
        }
    };

    Ok(Insight {
        key,
        title: key.title(),
        chart,
    })
}

fn require(tracks: &RecordSet, column: &'static str) -> Result<(), ExplorerError> {
    if tracks.has_column(column) {
        Ok(())
    } else {
        Err(ExplorerError::MissingColumn(column))
    }
}

fn numbers(tracks: &RecordSet, column: &'static str) -> Result<Vec<f64>, ExplorerError> {
    require(tracks, column)?;
    Ok(tracks.numbers(column)?)
}

/// Rows where both columns are numeric
fn pairs(
    tracks: &RecordSet,
    x: &'static str,
    y: &'static str,
) -> Result<Vec<(f64, f64)>, ExplorerError> {
    require(tracks, x)?;
    require(tracks, y)?;
    Ok(tracks.number_pairs(x, y)?)
}

/// Mean of `value` per distinct `group`, ascending by group; groups with no
/// numeric values are dropped
fn grouped_means(
    tracks: &RecordSet,
    group: &'static str,
    value: &'static str,
) -> Result<Vec<(f64, f64)>, ExplorerError> {
    require(tracks, group)?;
    require(tracks, value)?;

    let means = tracks
        .frame()
        .clone()
        .lazy()
        .select([
            col(group).cast(DataType::Float64).floor().alias("group"),
            col(value).cast(DataType::Float64).alias("mean"),
        ])
        .drop_nulls(None)
        .group_by([col("group")])
        .agg([col("mean").mean()])
        .collect()?;

    let mut points = RecordSet::new(means).number_pairs("group", "mean")?;
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(points)
}

fn decade_density(
    tracks: &RecordSet,
    feature: &'static str,
    x_label: &str,
    bins: usize,
) -> Result<Chart, ExplorerError> {
    let points = pairs(tracks, "decade", feature)?;
    let all: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let edges = Histogram::edges_for(&all, bins);

    let mut by_decade: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for (decade, v) in points {
        by_decade.entry(decade as i64).or_default().push(v);
    }

    let groups = by_decade
        .into_iter()
        .map(|(decade, values)| {
            (
                decade,
                Histogram::with_edges(&values, edges.clone()).into_density(),
            )
        })
        .collect();

    Ok(Chart::DecadeDensity {
        x_label: x_label.to_string(),
        groups,
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
