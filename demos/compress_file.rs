//! Compress a single file from the command line
//!
//! This example drives one task the way an editor integration would:
//! - Deriving the target path from the configured extension
//! - Refusing to overwrite an existing artifact unless `--force` is given
//! - Cancelling on Ctrl-C
//! - Printing the formatted report and lifecycle events
//!
//! ```bash
//! cargo run --example compress_file -- notes.txt --level 19 --force
//! ```
//!
//! Set `ZSTD_PIPELINE_CONFIG` to a JSON file to override the defaults.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use zstd_pipeline::{
    CompressionLevel, CompressionPipeline, CompressionRequest, Config, Event,
    TokioContextProvider, default_target_path,
};

#[derive(Parser)]
#[command(name = "compress_file")]
#[command(about = "Compress a file next to itself with zstd", long_about = None)]
struct Args {
    /// File to compress
    source: PathBuf,

    /// Compression level (1-22, defaults to the configured level)
    #[arg(short, long)]
    level: Option<i32>,

    /// Overwrite an existing compressed file
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = match std::env::var("ZSTD_PIPELINE_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::default(),
    };
    let level = match args.level {
        Some(level) => CompressionLevel::new(level)?,
        None => config.compression.level()?,
    };
    let target = default_target_path(&args.source, &config.compression.target_extension)
        .ok_or("source path has no file name")?;

    let request = CompressionRequest::for_files(&args.source, &target, level)
        .with_overwrite_confirmed(args.force);
    if let Err(e) = request.ensure_target_writable() {
        eprintln!("✗ {} (pass --force to overwrite)", e);
        std::process::exit(1);
    }

    let contexts = Arc::new(TokioContextProvider::new(&config.contexts)?);
    let pipeline = CompressionPipeline::with_zstd(contexts, config)?;

    let mut events = pipeline.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::Submitted { id, level } => {
                    println!("• Task #{} submitted at level {}", id, level.get());
                }
                Event::StateChanged { id, state } => {
                    println!("  Task #{}: {:?}", id, state);
                }
                Event::Finished { id, elapsed_ms, .. } => {
                    println!("• Task #{} finished in {} ms", id, elapsed_ms);
                }
            }
        }
    });

    let handle = pipeline.submit(request);

    // The report runs on the foreground context after the outcome is
    // published, so wait for it explicitly rather than for `join`
    let (report_tx, report_rx) = oneshot::channel();
    handle.on_report(move |severity, message| {
        println!("[{:?}] {}", severity, message);
        report_tx.send(()).ok();
    });

    let cancel = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Cancelling...");
            cancel.cancel();
        }
    });

    let outcome = handle.join().await?;
    report_rx.await?;

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
