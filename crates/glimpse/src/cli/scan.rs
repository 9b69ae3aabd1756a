//! The `glimpse scan` command: drives a scan and renders the results.
//!
//! This is the display layer for the core's event stream: it owns the
//! result store, applies the filter, updates the progress bar, and prints
//! the final listing and statistics.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, ValueEnum};
use glimpse_core::{
    CancelToken, Config, MetadataExtractor, ResultStore, ScanEvent, Scanner, StatisticsEngine,
};

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory of images to scan (non-recursive)
    #[arg(required = true)]
    pub directory: PathBuf,

    /// Keep only entries whose filename or format contains this text
    /// (case-insensitive)
    #[arg(short = 'F', long)]
    pub filter: Option<String>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Include per-file format advisories in the listing
    #[arg(long)]
    pub details: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Output format for scan results.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable listing plus statistics
    Text,
    /// Single JSON document with results and statistics
    Json,
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    let format = resolve_format(&args, &config);

    let scanner = Arc::new(Scanner::new(&config));
    let cancel = CancelToken::new();
    let (tx, mut rx) = scanner.channel();

    // Ctrl-C flips the cancellation flag; the worker stops at the next
    // file boundary and still delivers its completion event.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, stopping after the current file");
                cancel.cancel();
            }
        });
    }

    let start = Instant::now();
    let worker = {
        let scanner = Arc::clone(&scanner);
        let cancel = cancel.clone();
        let dir = args.directory.clone();
        tokio::spawn(async move { scanner.scan(&dir, cancel, tx).await })
    };

    let progress = (!args.no_progress && format == OutputFormat::Text).then(create_progress_bar);

    let mut store = ResultStore::new();
    if let Some(query) = &args.filter {
        store.apply_filter(query);
    }

    while let Some(event) = rx.recv().await {
        match event {
            ScanEvent::Result {
                file_name,
                metadata,
            } => {
                store.insert(file_name, metadata);
                // Statistics are recomputed on every stored result; only
                // the final report is printed.
                tracing::debug!(
                    "\n{}",
                    StatisticsEngine::report(store.results(), start.elapsed())
                );
            }
            ScanEvent::Progress { percent, status } => {
                tracing::debug!("{}", status);
                if let Some(pb) = &progress {
                    pb.set_position(u64::from(percent));
                    pb.set_message(status);
                }
            }
            ScanEvent::Finished => break,
        }
    }
    worker.await??;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let elapsed = start.elapsed();
    match format {
        OutputFormat::Text => {
            let extractor = MetadataExtractor::new(&config);
            print!("{}", render_text(&store, &extractor, args.details));
            println!();
            print!("{}", StatisticsEngine::report(store.results(), elapsed));
            tracing::info!(
                "Scan complete: {} files in {:.1} s",
                store.len(),
                elapsed.as_secs_f64()
            );
        }
        OutputFormat::Json => {
            let stats = StatisticsEngine::compute(store.results(), elapsed);
            let document = serde_json::json!({
                "results": store.filtered(),
                "statistics": stats,
            });
            if config.output.pretty {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                println!("{}", serde_json::to_string(&document)?);
            }
        }
    }

    Ok(())
}

fn resolve_format(args: &ScanArgs, config: &Config) -> OutputFormat {
    args.format.unwrap_or(match config.output.format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    })
}

/// Render the filtered listing as aligned text.
fn render_text(store: &ResultStore, extractor: &MetadataExtractor, details: bool) -> String {
    let mut out = String::new();

    if store.filtered().is_empty() {
        out.push_str("no matching files\n");
        return out;
    }

    out.push_str(&format!(
        "{:<28} {:>13} {:>11} {:>8} {:>14} {:>6} {:>10}\n",
        "file", "pixels", "dpi", "depth", "compression", "format", "size"
    ));
    for (name, meta) in store.filtered() {
        out.push_str(&format!(
            "{:<28} {:>13} {:>11} {:>8} {:>14} {:>6} {:>10}\n",
            name,
            meta.dimensions,
            meta.resolution,
            meta.color_depth,
            meta.compression,
            meta.format,
            meta.file_size_label
        ));
        if let Some(error) = &meta.error {
            out.push_str(&format!("{:<28}   error: {}\n", "", error));
        }
        if details {
            if let Some(info) = extractor.additional_info(&meta.format, &meta.file_path) {
                out.push_str(&format!("{:<28}   {}\n", "", info));
            }
        }
    }

    if !store.filter().is_empty() {
        out.push_str(&format!("found: {} files\n", store.filtered().len()));
    }

    out
}

/// Create a percentage-based progress bar.
fn create_progress_bar() -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}
