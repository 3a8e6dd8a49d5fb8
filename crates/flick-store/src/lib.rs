//! Artifact storage and movie catalog persistence.
//!
//! This crate provides:
//! - `MediaStore`: permanent artifact storage with replace-on-commit
//!   semantics and best-effort whole-movie purge
//! - `MovieCatalog`: the persistence seam for movie records, with
//!   JSON-file and in-memory implementations

pub mod catalog;
pub mod error;
pub mod media_store;

pub use catalog::{JsonCatalog, MemoryCatalog, MovieCatalog};
pub use error::{StoreError, StoreResult};
pub use media_store::MediaStore;
