//! Optional `chatlab.toml` configuration.
//!
//! Every key is optional. A missing file means defaults; a file that exists but does not
//! parse is an error.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ChatlabError, Result};
use crate::exporters::{CsvExportOptions, JsonExportOptions};
use crate::models::ChatType;
use crate::parsers::CsvOptions;

/// The config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "chatlab.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatlabConfig {
    pub csv: CsvConfig,
    pub export: ExportConfig,
    pub analysis: AnalysisConfig,
}

/// Session values and dialect for CSV input and output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvConfig {
    pub platform: String,
    pub chat_name: String,
    pub chat_type: String,
    pub owner_id: String,
    pub delimiter: char,
}

impl Default for CsvConfig {
    fn default() -> Self {
        let options = CsvOptions::default();
        Self {
            platform: options.platform,
            chat_name: options.chat_name,
            chat_type: options.chat_type.to_string(),
            owner_id: options.owner_id,
            delimiter: char::from(options.delimiter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Spaces per level for pretty JSON
    pub indent: usize,
    /// Single-line JSON; overrides `indent`
    pub compact: bool,
    pub ensure_ascii: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { indent: 2, compact: false, ensure_ascii: false }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Idle minutes that start a new conversation thread
    pub thread_gap_minutes: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { thread_gap_minutes: 30.0 }
    }
}

impl AnalysisConfig {
    /// A thread gap must be finite and non-negative
    pub fn is_valid_gap(minutes: f64) -> bool {
        minutes.is_finite() && minutes >= 0.0
    }
}

impl ChatlabConfig {
    /// Load and validate a config file. Read failures propagate as I/O errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let invalid = |reason: String| ChatlabError::Config { path: path.to_path_buf(), reason };

        let config: ChatlabConfig =
            toml::from_str(&content).map_err(|e| invalid(e.message().to_string()))?;
        config.validate().map_err(invalid)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolve the effective config.
    ///
    /// An explicit path must exist. Without one, `chatlab.toml` in `working_dir` is used when
    /// present, otherwise defaults.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = working_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() { Self::load(&candidate) } else { Ok(Self::default()) }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !self.csv.delimiter.is_ascii() {
            return Err(format!(
                "csv.delimiter must be an ASCII character, got '{}'",
                self.csv.delimiter
            ));
        }
        if !AnalysisConfig::is_valid_gap(self.analysis.thread_gap_minutes) {
            return Err("analysis.thread_gap_minutes must be a non-negative number".to_string());
        }
        Ok(())
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            platform: self.csv.platform.clone(),
            chat_name: self.csv.chat_name.clone(),
            chat_type: ChatType::from(self.csv.chat_type.as_str()),
            owner_id: self.csv.owner_id.clone(),
            delimiter: self.csv_delimiter(),
        }
    }

    pub fn json_options(&self) -> JsonExportOptions {
        JsonExportOptions {
            indent: (!self.export.compact).then_some(self.export.indent),
            ensure_ascii: self.export.ensure_ascii,
        }
    }

    pub fn csv_export_options(&self) -> CsvExportOptions {
        CsvExportOptions { delimiter: self.csv_delimiter() }
    }

    fn csv_delimiter(&self) -> u8 {
        u8::try_from(self.csv.delimiter).unwrap_or(b',')
    }
}
