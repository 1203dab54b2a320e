//! Error taxonomy for the pipeline.
//!
//! Per-file errors (`FileAccess`, `LineParse`) are recovered by the driver;
//! `DirectoryCreation` and `WriteFailure` abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while processing a batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single line of an input file is not a number.
    #[error("Invalid data at line {line} in {path}: {raw:?}")]
    LineParse {
        path: PathBuf,
        line: usize,
        raw: String,
    },

    /// Statistics were requested over zero data points.
    #[error("Cannot compute statistics over an empty dataset")]
    EmptyDataset,

    /// The output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report or histogram could not be written.
    #[error("Failed to write {path}: {reason}")]
    WriteFailure { path: PathBuf, reason: String },
}

impl PipelineError {
    /// Build a `WriteFailure` from any displayable cause.
    pub fn write_failure(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::WriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error ends the run rather than skipping one input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DirectoryCreation { .. } | Self::WriteFailure { .. }
        )
    }
}

/// Convenience alias used across the pipeline modules.
pub type Result<T> = std::result::Result<T, PipelineError>;
