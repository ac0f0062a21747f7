//! multidigest CLI - hash files with several algorithms in one read

use clap::Parser;
use multidigest::config::{CliArgs, OutputFormat, SessionConfig};
use multidigest::core::HashSession;
use multidigest::error::Result;
use multidigest::progress::{ProgressReporter, ProgressSummary, SessionObserver, TracingObserver};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();

    init_logging(&args);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so stdout carries only the report
fn init_logging(args: &CliArgs) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether every file was hashed
fn run(args: CliArgs) -> Result<bool> {
    let config = SessionConfig::from_cli(&args)?;
    tracing::debug!("Configuration: {:?}", config);

    let progress = if args.progress && !args.quiet {
        let progress = Arc::new(ProgressReporter::new());
        progress.set_total_bytes(expected_bytes(&config));
        Some(progress)
    } else {
        None
    };
    let observer: Arc<dyn SessionObserver> = match &progress {
        Some(progress) => progress.clone(),
        None => Arc::new(TracingObserver),
    };

    let mut session = HashSession::new(config)?.with_observer(observer);
    let stats = session.run()?;
    let report = session.report()?;

    if let Some(progress) = progress.filter(|p| p.is_enabled()) {
        print_summary(&progress.summary());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match args.format {
        OutputFormat::Text => write!(out, "{}", report),
        OutputFormat::Json => writeln!(out, "{}", report.to_json()?),
    };
    written
        .and_then(|_| out.flush())
        .map_err(|e| multidigest::error::DigestError::io("<stdout>", e))?;

    Ok(stats.is_success())
}

fn print_summary(summary: &ProgressSummary) {
    eprintln!(
        "Hashed {}/{} files ({} failed), {} of {} ({:.1}%) in {:.2?}, {}/s",
        summary.files_done - summary.files_failed,
        summary.total_files,
        summary.files_failed,
        humansize::format_size(summary.bytes_hashed, humansize::BINARY),
        humansize::format_size(summary.total_bytes, humansize::BINARY),
        summary.percentage(),
        summary.elapsed,
        humansize::format_size(summary.throughput as u64, humansize::BINARY),
    );
}

/// Total size of the readable distinct input files, for the progress bar
fn expected_bytes(config: &SessionConfig) -> u64 {
    let mut seen = std::collections::HashSet::new();
    config
        .filenames
        .iter()
        .filter(|path| seen.insert(path.as_path()))
        .filter_map(|path| std::fs::metadata(path).ok())
        .map(|meta| meta.len())
        .sum()
}
