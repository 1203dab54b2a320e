//! Statistics report generation.
//!
//! Reports are rendered to a string first and then written atomically:
//! the content goes to a temporary file in the destination directory which
//! is renamed over the target, so a failed write never leaves a partial
//! report behind.

use crate::error::{PipelineError, Result};
use crate::models::{Report, StatisticsReport};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Header row of the CSV report.
pub const CSV_HEADER: (&str, &str) = ("Statistic", "Value");

/// The report rows in their fixed order.
pub fn report_rows(stats: &StatisticsReport) -> Vec<(&'static str, String)> {
    vec![
        ("total", format_float(stats.total)),
        ("mean", format_float(stats.mean)),
        ("median", format_float(stats.median)),
        ("stdev", format_float(stats.stdev)),
        ("Number of files processed", stats.file_count.to_string()),
        ("Total data points", stats.point_count.to_string()),
    ]
}

/// Generate the CSV report text.
pub fn generate_csv_report(stats: &StatisticsReport) -> String {
    let mut output = String::new();

    push_csv_row(&mut output, CSV_HEADER.0, CSV_HEADER.1);
    for (label, value) in report_rows(stats) {
        push_csv_row(&mut output, label, &value);
    }

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write the CSV report to `path`.
pub fn write_csv_report(stats: &StatisticsReport, path: &Path) -> Result<()> {
    write_atomic(path, generate_csv_report(stats).as_bytes())
}

/// Write the JSON report to `path`.
pub fn write_json_report(report: &Report, path: &Path) -> Result<()> {
    let content = generate_json_report(report).map_err(|e| PipelineError::write_failure(path, e))?;
    write_atomic(path, content.as_bytes())
}

/// Write `content` to `path` via a temporary sibling file and a rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let failure = |e: std::io::Error| PipelineError::write_failure(path, e);

    let mut tmp = NamedTempFile::new_in(parent_dir(path)).map_err(failure)?;
    tmp.write_all(content).map_err(failure)?;
    tmp.as_file().sync_all().map_err(failure)?;
    tmp.persist(path).map_err(|e| failure(e.error))?;

    Ok(())
}

/// Directory that holds `path`, falling back to the current directory.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Shortest round-trip representation, always with a decimal point or exponent.
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

fn push_csv_row(output: &mut String, label: &str, value: &str) {
    output.push_str(&escape_csv_field(label));
    output.push(',');
    output.push_str(&escape_csv_field(value));
    output.push('\n');
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileOutcome, RunSummary};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_stats() -> StatisticsReport {
        StatisticsReport {
            total: 10.0,
            mean: 2.5,
            median: 2.5,
            stdev: 1.2909944487358056,
            file_count: 2,
            point_count: 4,
        }
    }

    #[test]
    fn test_row_order_is_fixed() {
        let labels: Vec<&str> = report_rows(&create_test_stats())
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "total",
                "mean",
                "median",
                "stdev",
                "Number of files processed",
                "Total data points"
            ]
        );
    }

    #[test]
    fn test_generate_csv_report() {
        let csv = generate_csv_report(&create_test_stats());
        let expected = "Statistic,Value\n\
                        total,10.0\n\
                        mean,2.5\n\
                        median,2.5\n\
                        stdev,1.2909944487358056\n\
                        Number of files processed,2\n\
                        Total data points,4\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_csv_report_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.csv");
        std::fs::write(&path, "stale").unwrap();

        write_csv_report(&create_test_stats(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Statistic,Value\n"));
        // Only the report itself remains; the temporary file was renamed.
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent").join("report.csv");

        let err = write_csv_report(&create_test_stats(), &path).unwrap_err();
        assert!(matches!(err, PipelineError::WriteFailure { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_json_report() {
        let mut summary = RunSummary::new(Utc::now());
        summary.record("a.txt", FileOutcome::Clean, 4);
        let report = Report {
            statistics: create_test_stats(),
            summary,
        };

        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"statistics\""));
        assert!(json.contains("\"point_count\": 4"));
        assert!(json.contains("\"a.txt\""));
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("report.csv")), Path::new("."));
        assert_eq!(parent_dir(Path::new("out/report.csv")), Path::new("out"));
    }
}
