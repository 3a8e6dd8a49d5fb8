//! Permanent artifact storage on the local filesystem.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use flick_models::Movie;

use crate::error::StoreResult;

/// Artifact storage rooted at a directory.
///
/// Keys are relative paths (`variants/movie_7.1080.mp4`). A committed key
/// always points at a complete file: commit replaces any previous file under
/// the same key, so re-processing never accumulates suffixed duplicates.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Open (and create if absent) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a key within the store.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Check whether a key currently holds a file.
    pub async fn exists(&self, key: &str) -> bool {
        fs::metadata(self.path(key)).await.is_ok()
    }

    /// Commit a completed temp file into the store under `key`.
    ///
    /// Any previous file at `key` is deleted first, the temp file's bytes
    /// are copied in, and the temp file is removed afterwards (best effort;
    /// a leftover temp file is logged, not reported).
    pub async fn commit(&self, tmp: &Path, key: &str) -> StoreResult<()> {
        let dst = self.path(key);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).await?;
        }

        if self.exists(key).await {
            fs::remove_file(&dst).await?;
        }
        fs::copy(tmp, &dst).await?;

        if let Err(e) = fs::remove_file(tmp).await {
            warn!("Failed to remove temp file {}: {}", tmp.display(), e);
        }

        debug!("Committed {} -> {}", tmp.display(), dst.display());
        Ok(())
    }

    /// Delete the file at `key`, if present.
    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every artifact referenced by a movie record (source, variants,
    /// derived assets). Best effort: individual failures are logged and the
    /// purge continues; the caller is never failed.
    pub async fn purge_movie(&self, movie: &Movie) {
        for key in movie.artifact_keys() {
            if let Err(e) = self.delete(key).await {
                warn!("Failed to delete {} for movie {}: {}", key, movie.id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_models::{Movie, MovieId, VariantTier};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_commit_moves_temp_into_store() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().join("media")).unwrap();
        let tmp = dir.path().join("work.mp4");
        fs::write(&tmp, b"payload").await.unwrap();

        store.commit(&tmp, "variants/movie_1.720.mp4").await.unwrap();

        assert!(!tmp.exists(), "temp file should be removed");
        let stored = fs::read(store.path("variants/movie_1.720.mp4")).await.unwrap();
        assert_eq!(stored, b"payload");
    }

    #[tokio::test]
    async fn test_commit_replaces_existing_without_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().join("media")).unwrap();

        let first = dir.path().join("first.mp4");
        fs::write(&first, b"old content").await.unwrap();
        store.commit(&first, "variants/movie_1.480.mp4").await.unwrap();

        let second = dir.path().join("second.mp4");
        fs::write(&second, b"new content").await.unwrap();
        store.commit(&second, "variants/movie_1.480.mp4").await.unwrap();

        let stored = fs::read(store.path("variants/movie_1.480.mp4")).await.unwrap();
        assert_eq!(stored, b"new content");

        // Exactly one file in the variants directory, no leftover temps.
        let mut entries = fs::read_dir(store.path("variants")).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
        assert!(!first.exists() && !second.exists());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path()).unwrap();
        store.delete("variants/absent.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn test_purge_movie_removes_all_referenced_files() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().join("media")).unwrap();

        let tmp = dir.path().join("a.mp4");
        fs::write(&tmp, b"a").await.unwrap();
        store.commit(&tmp, "variants/movie_5.720.mp4").await.unwrap();

        let mut movie = Movie::new(MovieId(5), "Test");
        movie.set_variant(VariantTier::P720, "variants/movie_5.720.mp4".to_string());
        // A dangling reference must not abort the purge.
        movie.thumbnail_image = Some("thumbnails/movie_5_thumb.jpg".to_string());

        store.purge_movie(&movie).await;
        assert!(!store.exists("variants/movie_5.720.mp4").await);
    }
}
