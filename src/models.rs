//! Data models for the statistics pipeline.
//!
//! This module contains the core data structures passed between the
//! parser, the aggregator, the statistics engine and the report writer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A single rejected line within an otherwise readable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// Line number of the rejected line (1-indexed).
    pub line_number: usize,
    /// The line as it appeared in the file, without the line terminator.
    pub raw: String,
}

/// The result of parsing one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Path of the file as given on the command line or found by the scanner.
    pub source: String,
    /// Accepted values, in line order.
    pub values: Vec<f64>,
    /// Rejected lines, in line order.
    pub errors: Vec<LineError>,
}

impl ParsedFile {
    /// Number of accepted values.
    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    /// Whether any line was rejected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Classify this file for logging and reporting.
    ///
    /// In strict mode a single rejected line rejects the whole file.
    pub fn outcome(&self, strict: bool) -> FileOutcome {
        if strict && self.has_errors() {
            FileOutcome::Rejected(self.errors.len())
        } else if self.values.is_empty() {
            FileOutcome::NoData
        } else if self.has_errors() {
            FileOutcome::WithLineErrors(self.errors.len())
        } else {
            FileOutcome::Clean
        }
    }
}

/// How a single input file fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "rejected_lines")]
pub enum FileOutcome {
    /// Every non-empty line parsed.
    Clean,
    /// Some lines were rejected; the rest were accepted.
    WithLineErrors(usize),
    /// The file was readable but yielded no values.
    NoData,
    /// Strict mode: the file had rejected lines and was dropped entirely.
    Rejected(usize),
    /// The file could not be opened or read.
    Unreadable,
}

impl FileOutcome {
    /// Whether the file's values go into the aggregate dataset.
    pub fn contributes(&self) -> bool {
        matches!(self, FileOutcome::Clean | FileOutcome::WithLineErrors(_))
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Clean => write!(f, "ok"),
            FileOutcome::WithLineErrors(n) => write!(f, "ok, {} line(s) rejected", n),
            FileOutcome::NoData => write!(f, "no numeric data"),
            FileOutcome::Rejected(n) => write!(f, "rejected, {} invalid line(s)", n),
            FileOutcome::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// Combined values of every accepted file, in file-then-line order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateDataset {
    values: Vec<f64>,
}

impl AggregateDataset {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Summary statistics over the aggregate dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 when fewer than two points.
    pub stdev: f64,
    /// Number of files that contributed values.
    pub file_count: usize,
    /// Number of values in the aggregate dataset.
    pub point_count: usize,
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={}, mean={}, median={}, stdev={}, files={}, points={}",
            self.total, self.mean, self.median, self.stdev, self.file_count, self.point_count
        )
    }
}

/// Per-file line of the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Path of the input file.
    pub path: String,
    /// What happened to it.
    pub outcome: FileOutcome,
    /// Number of values accepted from it.
    pub values: usize,
}

/// Metadata about one run of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the run started.
    pub run_date: DateTime<Utc>,
    /// Every input file, in processing order.
    pub files: Vec<FileRecord>,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

impl RunSummary {
    pub fn new(run_date: DateTime<Utc>) -> Self {
        Self {
            run_date,
            files: Vec::new(),
            duration_seconds: 0.0,
        }
    }

    /// Record the outcome of one input file.
    pub fn record(&mut self, path: impl Into<String>, outcome: FileOutcome, values: usize) {
        self.files.push(FileRecord {
            path: path.into(),
            outcome,
            values,
        });
    }

    /// Files whose values were aggregated.
    pub fn files_processed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.contributes()).count()
    }

    /// Files that were opened but contributed nothing.
    pub fn files_skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::NoData | FileOutcome::Rejected(_)))
            .count()
    }

    /// Files that could not be read at all.
    pub fn files_failed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::Unreadable)
            .count()
    }

    /// Total number of rejected lines across all readable files.
    pub fn rejected_lines(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::WithLineErrors(n) | FileOutcome::Rejected(n) => n,
                _ => 0,
            })
            .sum()
    }
}

/// The complete machine-readable report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub statistics: StatisticsReport,
    pub summary: RunSummary,
}
