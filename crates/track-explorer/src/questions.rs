//! Question Catalog

use crate::error::ExplorerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one canned chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKey {
    ScatterDurationDanceability,
    ScatterEnergyValence,
    LineDurationOverTime,
    HistFeatures,
    HistTempoDecade,
    HistEnergyDecade,
    HistValenceDecade,
    LineDecadeTrends,
}

impl InsightKey {
    /// Every key in catalog order
    pub const ALL: [InsightKey; 8] = [
        InsightKey::ScatterDurationDanceability,
        InsightKey::ScatterEnergyValence,
        InsightKey::LineDurationOverTime,
        InsightKey::HistFeatures,
        InsightKey::HistTempoDecade,
        InsightKey::HistEnergyDecade,
        InsightKey::HistValenceDecade,
        InsightKey::LineDecadeTrends,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKey::ScatterDurationDanceability => "scatter_duration_danceability",
            InsightKey::ScatterEnergyValence => "scatter_energy_valence",
            InsightKey::LineDurationOverTime => "line_duration_over_time",
            InsightKey::HistFeatures => "hist_features",
            InsightKey::HistTempoDecade => "hist_tempo_decade",
            InsightKey::HistEnergyDecade => "hist_energy_decade",
            InsightKey::HistValenceDecade => "hist_valence_decade",
            InsightKey::LineDecadeTrends => "line_decade_trends",
        }
    }

    /// The question a visitor picks to open this chart
    pub fn question(&self) -> &'static str {
        match self {
            InsightKey::ScatterDurationDanceability => "Are shorter songs more danceable?",
            InsightKey::ScatterEnergyValence => "Do energetic songs also feel happier?",
            InsightKey::LineDurationOverTime => "Has the average song duration changed over time?",
            InsightKey::HistFeatures => "How are tempo, energy, and valence distributed?",
            InsightKey::HistTempoDecade => "How does the distribution of tempo vary by decade?",
            InsightKey::HistEnergyDecade => "How does the distribution of energy vary by decade?",
            InsightKey::HistValenceDecade => {
                "How does the distribution of valence (happiness) vary by decade?"
            }
            InsightKey::LineDecadeTrends => {
                "How have tempo, energy, and valence changed across decades?"
            }
        }
    }

    /// Panel heading: the identifier with spaces, in title case
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

impl fmt::Display for InsightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightKey {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InsightKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ExplorerError::UnknownInsight(s.to_string()))
    }
}
