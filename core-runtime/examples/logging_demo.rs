//! Logging system demonstration
//!
//! This example shows how to use the logging infrastructure in different modes.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format
//! cargo run --example logging_demo -- compact
//!
//! # With custom filter
//! cargo run --example logging_demo -- pretty "core_runtime=trace"
//! ```

use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::env;
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let format = if args.len() > 1 {
        match args[1].as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Pretty,
        }
    } else {
        LogFormat::default()
    };

    let mut config = LoggingConfig::default().with_format(format);
    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    init_logging(config).expect("Failed to initialize logging");

    info!("=== Logging System Demo ===");
    info!(format = ?format, "Logging initialized");

    // Demonstrate different log levels
    demo_log_levels();

    // Demonstrate structured logging
    demo_structured_logging();

    // Demonstrate spans for tracing
    demo_spans().await;

    // Demonstrate instrumentation
    demo_instrumentation().await;

    info!("=== Demo Complete ===");
}

fn demo_log_levels() {
    let span = span!(Level::INFO, "log_levels");
    let _enter = span.enter();

    trace!("This is a TRACE level log");
    debug!("This is a DEBUG level log");
    info!("This is an INFO level log");
    warn!("This is a WARN level log");
    error!("This is an ERROR level log");
}

fn demo_structured_logging() {
    let span = span!(Level::INFO, "structured_logging");
    let _enter = span.enter();

    info!("Simple message without fields");

    info!(
        image_id = "mega-1",
        name = "first-dance.jpg",
        file_size = 2_048_000,
        "Image information"
    );

    info!(
        selected = 2,
        listed = 48,
        refresh_interval_ms = 300_000,
        "Sync metrics"
    );
}

async fn demo_spans() {
    let span = span!(Level::INFO, "sync_request", mode = "shared");
    let _enter = span.enter();

    info!("Starting sync request");

    {
        let inner_span = span!(Level::DEBUG, "list_folder");
        let _inner = inner_span.enter();

        debug!(count = 48, "Listed entries from shared folder");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    {
        let inner_span = span!(Level::DEBUG, "fetch_images");
        let _inner = inner_span.enter();

        debug!(fetched = 2, total = 2, "Embedding image payloads");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    info!(images = 2, "Sync request completed");
}

#[instrument]
async fn demo_instrumentation() {
    info!("Instrumented function automatically creates spans");

    let entries = vec!["cake.png", "vows.webp", "first-dance.jpg"];
    process_entries(&entries).await;
}

#[instrument(fields(count = entries.len()))]
async fn process_entries(entries: &[&str]) {
    debug!("Processing entries");

    for (idx, entry) in entries.iter().enumerate() {
        process_entry(idx, entry).await;
    }

    info!("All entries processed");
}

#[instrument(fields(rank = idx))]
async fn process_entry(idx: usize, entry: &str) {
    trace!(entry = %entry, "Processing individual entry");
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
}
