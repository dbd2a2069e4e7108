use crate::cleaner::{IQR_MULTIPLIER, OutlierPolicy};
use crate::error::{CleanerError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILE: &str = "data_cleaning.log";
pub const DEFAULT_DATE_MARKER: &str = "date";

/// Settings for one cleaning run. Every field has a default, so a config file
/// only needs the keys it changes:
///
/// ```json
/// { "outlier_policy": "remove" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub outlier_policy: OutlierPolicy,
    pub iqr_multiplier: f64,
    /// Case-insensitive substring marking a column for date standardization
    pub date_column_marker: String,
    pub log_file: PathBuf,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            outlier_policy: OutlierPolicy::Clip,
            iqr_multiplier: IQR_MULTIPLIER,
            date_column_marker: DEFAULT_DATE_MARKER.to_owned(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl CleaningConfig {
    /// Reads a JSON config file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`CleanerError::Config`] if the file is unreadable, is not
    /// valid JSON, or holds out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CleanerError::Config(e.to_string()))
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content).context("Failed to parse JSON config")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`CleanerError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(CleanerError::Config(format!(
                "iqr_multiplier must be a non-negative number, got {}",
                self.iqr_multiplier
            )));
        }
        if self.date_column_marker.trim().is_empty() {
            return Err(CleanerError::Config(
                "date_column_marker must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
