//! Logging setup: console output plus an append-only log file.
//!
//! The log file receives one line per event in the form
//! `<timestamp> <LEVEL>: <message>`, INFO and above.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Timestamp layout of log-file lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Event formatter for log-file lines.
pub struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} {}: ",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
///
/// `console_level` applies to stderr unless `RUST_LOG` is set. When the log
/// file cannot be opened the run continues with console output only.
pub fn init(console_level: Level, log_file: &Path) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.as_str().to_lowercase()));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (file_layer, open_error) = match open_log_file(log_file) {
        Ok(file) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LogLineFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    let installed = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        eprintln!("Warning: a logger was already installed; keeping it");
        return;
    }

    if let Some(e) = open_error {
        tracing::warn!(
            "Cannot open log file {}: {}; logging to console only",
            log_file.display(),
            e
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Subscriber writing log-file lines to `path`, for scoped use in tests.
    pub(crate) fn capture(path: &Path) -> impl Subscriber + Send + Sync {
        let file = open_log_file(path).unwrap();
        tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(LogLineFormat)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::INFO),
        )
    }

    #[test]
    fn test_log_line_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("processing.log");

        tracing::subscriber::with_default(capture(&path), || {
            tracing::info!("Successfully read {}", "a.txt");
            tracing::debug!("not written");
            tracing::warn!("Invalid data at line 3");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" INFO: Successfully read a.txt"));
        assert!(lines[1].ends_with(" WARN: Invalid data at line 3"));

        // "YYYY-MM-DD HH:MM:SS,mmm" prefix
        let stamp = lines[0].as_bytes();
        assert_eq!(stamp[4], b'-');
        assert_eq!(stamp[10], b' ');
        assert_eq!(stamp[19], b',');
        assert_eq!(stamp[23], b' ');
    }

    #[test]
    fn test_log_file_is_appended() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("processing.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        tracing::subscriber::with_default(capture(&path), || {
            tracing::info!("second run");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("earlier run\n"));
        assert!(content.contains("INFO: second run"));
    }
}
