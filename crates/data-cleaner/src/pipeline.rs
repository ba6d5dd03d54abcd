//! Cleaning Pipeline

use crate::config::CleaningConfig;
use crate::error::CleaningError;
use crate::stages::{standard_stages, Stage};
use record_set::RecordSet;
use serde::Serialize;
use tracing::{debug, info};

/// File name offered for the cleaned export
pub const CLEANED_FILE_NAME: &str = "nashville_cleaned.csv";

/// Ordered, human-readable record of the stages that had an effect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CleaningLog(Vec<String>);

impl CleaningLog {
    /// Log entries in execution order
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was logged
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in order
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl Extend<String> for CleaningLog {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for CleaningLog {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Cleaned table plus the log of what was done to it
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub cleaned: RecordSet,
    pub log: CleaningLog,
}

/// Ordered stage table folded over a raw record set
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    config: CleaningConfig,
}

impl Pipeline {
    /// Create a pipeline with the standard stage order
    pub fn new(config: CleaningConfig) -> Self {
        Self::with_stages(config, standard_stages())
    }

    /// Create a pipeline over an explicit stage list
    pub fn with_stages(config: CleaningConfig, stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages, config }
    }

    /// Run every stage in order; stages whose target column is absent are skipped
    pub fn run(&self, raw: &RecordSet) -> Result<CleaningOutcome, CleaningError> {
        let (cleaned, log) = self.stages.iter().try_fold(
            (raw.clone(), CleaningLog::default()),
            |(table, mut log), stage| {
                if let Some(column) = stage.target() {
                    if !table.has_column(column) {
                        debug!("Skipping stage {}: no `{}` column", stage.name(), column);
                        return Ok::<_, CleaningError>((table, log));
                    }
                }

                let before = table.len();
                let output = stage.apply(&table, &self.config)?;
                debug!(
                    "Stage {} done: {} -> {} rows, {} log entries",
                    stage.name(),
                    before,
                    output.table.len(),
                    output.log.len()
                );
                log.extend(output.log);
                Ok((output.table, log))
            },
        )?;

        info!(
            "Cleaning finished: {} -> {} rows, {} steps logged",
            raw.len(),
            cleaned.len(),
            log.len()
        );
        Ok(CleaningOutcome { cleaned, log })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

/// Clean a raw record set with the standard stages
pub fn clean(raw: &RecordSet, config: &CleaningConfig) -> Result<CleaningOutcome, CleaningError> {
    Pipeline::new(config.clone()).run(raw)
}
