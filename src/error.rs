//! Error types for the analysis pipeline.

use std::fmt::Display;
use std::path::Path;

use thiserror::Error;

/// Everything that can stop a run. None of these are recovered locally;
/// they propagate to `main` and end the process.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The input file is missing, unreadable or not valid CSV.
    #[error("failed to load {source_name}: {message}")]
    DataLoad {
        source_name: String,
        message: String,
    },

    /// A required column is absent or has the wrong type.
    #[error("schema mismatch: column `{column}` {reason}")]
    SchemaMismatch { column: String, reason: String },

    /// An artifact could not be written to its destination.
    #[error("failed to write {path}: {message}")]
    OutputWrite { path: String, message: String },

    /// The configuration file or flags are invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EdaError {
    pub fn data_load(source_name: impl Into<String>, message: impl Display) -> Self {
        EdaError::DataLoad {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn schema_mismatch(column: impl Into<String>, reason: impl Display) -> Self {
        EdaError::SchemaMismatch {
            column: column.into(),
            reason: reason.to_string(),
        }
    }

    pub fn output_write(path: &Path, message: impl Display) -> Self {
        EdaError::OutputWrite {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EdaError>;
