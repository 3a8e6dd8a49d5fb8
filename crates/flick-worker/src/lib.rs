//! Movie processing worker.
//!
//! This crate provides:
//! - The pipeline orchestrator for a single movie job
//! - Worker configuration
//! - Structured job logging

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::JobLogger;
pub use pipeline::MoviePipeline;
