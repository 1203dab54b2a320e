//! numtally - statistics over numeric text files
//!
//! A batch CLI that reads one number per line from each input file,
//! aggregates the values, and writes a CSV report, a histogram image
//! and an append-only log.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Fatal error (bad arguments, output directory, write failure)
//!   2 - No input file yielded any data

mod analysis;
mod cli;
mod config;
mod error;
mod logging;
mod models;
mod parser;
mod report;
mod scanner;

use analysis::Histogram;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use error::PipelineError;
use indicatif::{ProgressBar, ProgressStyle};
use models::{FileOutcome, ParsedFile, Report, RunSummary, StatisticsReport};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// How a run ended when no fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    /// Statistics computed and every output written.
    Completed,
    /// No input produced any value; nothing was written.
    NoData,
}

impl RunOutcome {
    fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::NoData => 2,
        }
    }
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The log file location may come from the config, so load it first
    let (mut config, config_note) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    if let Err(e) = config.validate() {
        eprintln!("Error: invalid configuration: {:#}", e);
        std::process::exit(1);
    }

    logging::init(args.log_level(&config.general), &config.general.log_file);

    info!("numtally v{}", env!("CARGO_PKG_VERSION"));
    if let Some(note) = config_note {
        warn!("{}", note);
    }
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run_pipeline(&args, &config) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            if e.is_fatal() {
                error!("Run aborted: {}", e);
            } else {
                error!("Run failed: {}", e);
            }
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .numtally.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the log file, extensions, bins, and more.");
    Ok(())
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` must load; a broken default file falls back to
/// built-in defaults and yields a note to log once logging is up.
fn load_config(args: &Args) -> Result<(Config, Option<String>)> {
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, None));
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok((config, None)),
        Ok(None) => Ok((Config::default(), None)),
        Err(e) => Ok((
            Config::default(),
            Some(format!("Failed to load config: {:#}; using defaults", e)),
        )),
    }
}

/// Run the whole batch: read, aggregate, compute, render, report.
fn run_pipeline(args: &Args, config: &Config) -> Result<RunOutcome, PipelineError> {
    let start_time = Instant::now();
    let mut summary = RunSummary::new(Utc::now());
    let output_dir = args.output_dir();

    // Step 1: Output directory
    ensure_output_dir(output_dir)?;

    // Step 2: Read every input
    let scanner = scanner::InputScanner::new(scanner::ScanConfig::from(&config.input));
    let files = scanner.expand(&args.inputs);
    info!("Processing {} input file(s)", files.len());

    let progress = progress_bar(files.len() as u64, args.quiet);
    let mut accepted: Vec<ParsedFile> = Vec::new();

    for path in &files {
        progress.set_message(path.display().to_string());
        if let Some(parsed) = read_input(path, config, &mut summary) {
            accepted.push(parsed);
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if accepted.is_empty() {
        warn!("No valid data files to process. Exiting.");
        println!(
            "⚠️  No valid data files to process. See {} for details.",
            config.general.log_file.display()
        );
        return Ok(RunOutcome::NoData);
    }

    // Step 3: Aggregate and compute
    let dataset = analysis::aggregate(&accepted);
    info!(
        "Aggregated {} data point(s) from {} file(s)",
        dataset.len(),
        accepted.len()
    );
    let stats = analysis::compute_statistics(&dataset, accepted.len())?;
    info!("Computed statistics: {}", stats);

    // Step 4: Histogram
    if config.report.histogram {
        let histogram_path = output_dir.join(&config.report.histogram_name);
        let histogram = Histogram::from_values(dataset.values(), config.report.bins)
            .ok_or_else(|| PipelineError::write_failure(&histogram_path, "nothing to plot"))?;
        report::render_histogram(
            &histogram,
            &histogram_path,
            (config.report.width, config.report.height),
        )?;
        info!("Histogram saved at {}", histogram_path.display());
    }

    // Step 5: Reports
    let report_path = output_dir.join(&config.report.report_name);
    report::write_csv_report(&stats, &report_path)?;
    info!("Report saved at {}", report_path.display());

    summary.duration_seconds = start_time.elapsed().as_secs_f64();

    if config.report.write_json {
        let json_path = output_dir.join(&config.report.json_name);
        let report = Report {
            statistics: stats,
            summary: summary.clone(),
        };
        report::write_json_report(&report, &json_path)?;
        info!("JSON report saved at {}", json_path.display());
    }

    if !args.quiet {
        print_summary(&stats, &summary);
    }
    println!("\n✅ Processing complete. Check {} for results.", output_dir.display());

    Ok(RunOutcome::Completed)
}

/// Create the output directory if it does not exist yet.
fn ensure_output_dir(dir: &Path) -> Result<(), PipelineError> {
    if dir.is_dir() {
        debug!("Output directory exists: {}", dir.display());
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|source| PipelineError::DirectoryCreation {
        path: dir.to_path_buf(),
        source,
    })?;

    info!("Created output directory: {}", dir.display());
    Ok(())
}

/// Parse one input, log its outcome and record it in the summary.
///
/// Returns the parsed file only when its values should be aggregated.
fn read_input(path: &Path, config: &Config, summary: &mut RunSummary) -> Option<ParsedFile> {
    let source = path.display().to_string();

    let parsed = match parser::parse_file(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("{}", e);
            summary.record(source, FileOutcome::Unreadable, 0);
            return None;
        }
    };

    log_line_errors(&parsed, config.general.max_logged_errors);

    let outcome = parsed.outcome(config.input.strict);
    match outcome {
        FileOutcome::Clean => {
            info!("Successfully read {} ({} values)", source, parsed.point_count());
        }
        FileOutcome::WithLineErrors(n) => {
            info!(
                "Read {} ({} values, {} invalid line(s) skipped)",
                source,
                parsed.point_count(),
                n
            );
        }
        FileOutcome::Rejected(n) => {
            warn!("Rejected {}: {} invalid line(s) in strict mode", source, n);
        }
        FileOutcome::NoData | FileOutcome::Unreadable => {
            warn!("No numeric data in {}; skipping", source);
        }
    }

    let contributes = outcome.contributes();
    let values = if contributes { parsed.point_count() } else { 0 };
    summary.record(source, outcome, values);

    contributes.then_some(parsed)
}

/// Log rejected lines, at most `limit` individually per file.
fn log_line_errors(parsed: &ParsedFile, limit: usize) {
    for err in parser::line_errors(parsed).take(limit) {
        warn!("{}", err);
    }

    let remaining = parsed.errors.len().saturating_sub(limit);
    if remaining > 0 {
        warn!(
            "... and {} more invalid line(s) in {}",
            remaining, parsed.source
        );
    }
}

/// Progress bar over the input files; hidden in quiet mode.
fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Print the end-of-run summary to stdout.
fn print_summary(stats: &StatisticsReport, summary: &RunSummary) {
    println!("\n📊 Statistics:");
    println!("   Total:  {}", stats.total);
    println!("   Mean:   {}", stats.mean);
    println!("   Median: {}", stats.median);
    println!("   Stdev:  {}", stats.stdev);
    println!(
        "   Files processed: {} | skipped: {} | unreadable: {}",
        summary.files_processed(),
        summary.files_skipped(),
        summary.files_failed()
    );
    println!(
        "   Data points: {} | rejected lines: {}",
        stats.point_count,
        summary.rejected_lines()
    );
    println!("   Duration: {:.2}s", summary.duration_seconds);
}
