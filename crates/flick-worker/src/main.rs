//! Movie processing worker binary.
//!
//! Runs the processing pipeline for the movie ids given on the command
//! line. Enqueue/dequeue mechanics live with the job-queue in front of
//! this binary; each invocation is one batch of dispatched work units.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flick_media::{FfmpegProcessor, MediaTools};
use flick_models::MovieId;
use flick_store::{JsonCatalog, MediaStore};
use flick_worker::{MoviePipeline, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("flick=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting flick-worker");

    let mut movie_ids = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.parse::<i64>() {
            Ok(n) => movie_ids.push(MovieId(n)),
            Err(_) => {
                error!("Invalid movie id: {}", arg);
                std::process::exit(2);
            }
        }
    }
    if movie_ids.is_empty() {
        error!("Usage: flick-worker <movie-id>...");
        std::process::exit(2);
    }

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let tools = match MediaTools::from_path() {
        Ok(t) => t.with_timeout(config.tool_timeout),
        Err(e) => {
            error!("Failed to resolve media tools: {}", e);
            std::process::exit(1);
        }
    };

    let store = match MediaStore::new(&config.storage_root) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open media store: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = Arc::new(JsonCatalog::new(&config.catalog_path));
    let media = Arc::new(FfmpegProcessor::new(tools));
    let pipeline = MoviePipeline::new(catalog, store, media, config.tmp_dir.clone());

    let mut failed = false;
    for id in movie_ids {
        if let Err(e) = pipeline.process(id).await {
            error!("Processing movie {} failed: {}", id, e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    info!("Worker run complete");
}
