//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::GeneralConfig;
use clap::Parser;
use std::path::{Path, PathBuf};

/// numtally - statistics over numeric text files
///
/// Reads one number per line from each input, reports the total, mean,
/// median and sample standard deviation, and draws a histogram.
///
/// Examples:
///   numtally data1.txt data2.txt -o results
///   numtally readings/ --recursive -o results -l run.log
///   numtally data.txt -o results --strict --json --bins 40
///   numtally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Input data files or directories
    ///
    /// Directories are scanned for files with a configured extension.
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub inputs: Vec<PathBuf>,

    /// Output directory for the report and histogram (created if missing)
    #[arg(
        short,
        long,
        value_name = "DIR",
        alias = "output_dir",
        required_unless_present = "init_config"
    )]
    pub output_dir: Option<PathBuf>,

    /// Log file path
    ///
    /// Events are appended. Default: from config or processing.log.
    #[arg(short, long, value_name = "FILE", alias = "log_file", env = "NUMTALLY_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .numtally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Reject a whole file if any of its lines is not a number
    #[arg(long)]
    pub strict: bool,

    /// Number of histogram bins
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<usize>,

    /// Skip rendering the histogram
    #[arg(long)]
    pub no_histogram: bool,

    /// Also write a JSON report with per-file outcomes
    #[arg(long)]
    pub json: bool,

    /// Walk directory inputs recursively
    #[arg(long)]
    pub recursive: bool,

    /// File extensions picked up from directory inputs (comma-separated)
    ///
    /// Example: --extensions txt,dat
    #[arg(long, value_name = "EXTS", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Maximum number of rejected lines logged individually per file
    #[arg(long, value_name = "COUNT")]
    pub max_logged_errors: Option<usize>,

    /// Generate a default .numtally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The output directory; empty when unset (validate first).
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new(""))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.inputs.is_empty() {
            return Err("At least one input file is required".to_string());
        }

        match self.output_dir {
            None => return Err("An output directory is required (-o <DIR>)".to_string()),
            Some(ref dir) if dir.as_os_str().is_empty() => {
                return Err("Output directory must not be empty".to_string());
            }
            Some(ref dir) if dir.exists() && !dir.is_dir() => {
                return Err(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                ));
            }
            Some(_) => {}
        }

        if self.bins == Some(0) {
            return Err("Bins must be at least 1".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins; otherwise `--verbose` or `verbose = true` in the
    /// config file turns on debug output.
    pub fn log_level(&self, general: &GeneralConfig) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
