//! FFmpeg CLI wrapper for movie variant and asset processing.
//!
//! This crate provides:
//! - Resolved external tool paths with per-invocation timeouts
//! - Type-safe FFmpeg command building
//! - Best-effort duration probing
//! - Variant transcoding and asset extraction (stills, teaser)
//! - The `MediaProcessor` seam the pipeline orchestrator consumes

pub mod assets;
pub mod command;
pub mod error;
pub mod filters;
pub mod probe;
pub mod processor;
pub mod tools;
pub mod transcode;

pub use assets::{cut_teaser, frame_to_image};
pub use command::FfmpegCommand;
pub use error::{MediaError, MediaResult};
pub use probe::probe_duration;
pub use processor::{FfmpegProcessor, MediaProcessor};
pub use tools::MediaTools;
pub use transcode::transcode_variant;
