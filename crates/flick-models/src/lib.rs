//! Shared data models for the flick catalog backend.
//!
//! This crate provides Serde-serializable types for:
//! - The movie record and its processing lifecycle
//! - Variant tiers and canonical artifact naming
//! - Encoding configuration

pub mod encoding;
pub mod movie;

// Re-export common types
pub use encoding::{truncate_chars, EncodingConfig};
pub use movie::{ArtifactKind, Movie, MovieId, ProcessingStatus, VariantTier};
