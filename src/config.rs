//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.numtally.toml` files.

use crate::analysis::histogram::DEFAULT_BINS;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".numtally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input discovery and parsing settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log file path.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Maximum rejected lines logged individually per file.
    #[serde(default = "default_max_logged_errors")]
    pub max_logged_errors: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            verbose: false,
            max_logged_errors: default_max_logged_errors(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("processing.log")
}

fn default_max_logged_errors() -> usize {
    20
}

/// Input discovery and parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions picked up from directory inputs.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Walk directory inputs recursively.
    #[serde(default)]
    pub recursive: bool,

    /// Reject a whole file when any of its lines is invalid.
    #[serde(default)]
    pub strict: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            recursive: false,
            strict: false,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["txt", "dat", "csv"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// CSV report file name inside the output directory.
    #[serde(default = "default_report_name")]
    pub report_name: String,

    /// JSON report file name inside the output directory.
    #[serde(default = "default_json_name")]
    pub json_name: String,

    /// Also write the JSON report.
    #[serde(default)]
    pub write_json: bool,

    /// Render the histogram image.
    #[serde(default = "default_true")]
    pub histogram: bool,

    /// Histogram file name inside the output directory.
    #[serde(default = "default_histogram_name")]
    pub histogram_name: String,

    /// Number of histogram bins.
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Histogram image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Histogram image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_name: default_report_name(),
            json_name: default_json_name(),
            write_json: false,
            histogram: true,
            histogram_name: default_histogram_name(),
            bins: default_bins(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_report_name() -> String {
    "report.csv".to_string()
}

fn default_json_name() -> String {
    "report.json".to_string()
}

fn default_histogram_name() -> String {
    "histogram.png".to_string()
}

fn default_true() -> bool {
    true
}

fn default_bins() -> usize {
    DEFAULT_BINS
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref log_file) = args.log_file {
            self.general.log_file = log_file.clone();
        }
        if let Some(max) = args.max_logged_errors {
            self.general.max_logged_errors = max;
        }

        if let Some(ref extensions) = args.extensions {
            self.input.extensions = extensions.clone();
        }

        if let Some(bins) = args.bins {
            self.report.bins = bins;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
        if args.recursive {
            self.input.recursive = true;
        }
        if args.strict {
            self.input.strict = true;
        }
        if args.json {
            self.report.write_json = true;
        }
        if args.no_histogram {
            self.report.histogram = false;
        }
    }

    /// Check values that would otherwise fail late in the run.
    pub fn validate(&self) -> Result<()> {
        if self.report.bins == 0 {
            bail!("report.bins must be at least 1");
        }
        if self.report.width == 0 || self.report.height == 0 {
            bail!(
                "Histogram size must be non-zero (got {}x{})",
                self.report.width,
                self.report.height
            );
        }
        if self.report.report_name.is_empty() {
            bail!("report.report_name must not be empty");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.log_file, PathBuf::from("processing.log"));
        assert_eq!(config.report.bins, 20);
        assert_eq!(config.report.report_name, "report.csv");
        assert!(config.report.histogram);
        assert!(!config.input.strict);
        assert!(config.input.extensions.contains(&"txt".to_string()));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
log_file = "logs/run.log"
verbose = true

[input]
extensions = ["num"]
strict = true

[report]
bins = 40
write_json = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.log_file, PathBuf::from("logs/run.log"));
        assert!(config.general.verbose);
        assert_eq!(config.input.extensions, vec!["num"]);
        assert!(config.input.strict);
        assert!(!config.input.recursive);
        assert_eq!(config.report.bins, 40);
        assert!(config.report.write_json);
        assert_eq!(config.report.histogram_name, "histogram.png");
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.report.bins = 40;
        config.input.strict = true;

        let mut args = make_args();
        args.log_file = Some(PathBuf::from("custom.log"));
        args.no_histogram = true;
        config.merge_with_args(&args);

        assert_eq!(config.general.log_file, PathBuf::from("custom.log"));
        // Not given on the command line, so the file value stays.
        assert_eq!(config.report.bins, 40);
        assert!(config.input.strict);
        assert!(!config.report.histogram);

        args.bins = Some(10);
        config.merge_with_args(&args);
        assert_eq!(config.report.bins, 10);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        assert!(Config::default().validate().is_ok());

        let config: Config = toml::from_str("[report]\nbins = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bins"));

        let config: Config = toml::from_str("[report]\nwidth = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config: Config = toml::from_str("[report]\nheight = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_command_line_bins_repair_config_value() {
        let mut config: Config = toml::from_str("[report]\nbins = 0\n").unwrap();
        let mut args = make_args();
        args.bins = Some(12);
        config.merge_with_args(&args);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[report]"));
    }
}
