use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the library.
///
/// Row- and line-level damage inside CSV and JSON Lines inputs never reaches
/// this type; those inputs degrade per row instead.
#[derive(Debug, Error)]
pub enum ChatlabError {
    /// Input could not be decoded by any strategy attempted for the format
    #[error("could not decode {format} input (tried {}): {reason}", .strategies.join(", "))]
    Format { format: &'static str, strategies: Vec<&'static str>, reason: String },

    /// A format selector outside the recognized set
    #[error("unsupported format: '{0}'")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl ChatlabError {
    pub(crate) fn format(
        format: &'static str,
        strategies: Vec<&'static str>,
        reason: impl Into<String>,
    ) -> Self {
        ChatlabError::Format { format, strategies, reason: reason.into() }
    }

    /// Whether this is a decoding failure (as opposed to I/O or a bad selector)
    pub fn is_format_error(&self) -> bool {
        matches!(self, ChatlabError::Format { .. })
    }
}

pub type Result<T> = std::result::Result<T, ChatlabError>;
