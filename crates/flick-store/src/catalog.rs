//! Movie catalog persistence.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};

use flick_models::{Movie, MovieId};

use crate::error::{StoreError, StoreResult};

/// Persistence seam for movie records.
///
/// `update` persists the whole record; the persistence layer is responsible
/// for making each write atomic.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Load a movie by id.
    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>>;

    /// Persist a mutated movie record. Fails if the record does not exist.
    async fn update(&self, movie: &Movie) -> StoreResult<()>;
}

/// In-memory catalog, used by tests and tooling.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    movies: RwLock<HashMap<MovieId, Movie>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub async fn insert(&self, movie: Movie) {
        self.movies.write().await.insert(movie.id, movie);
    }
}

#[async_trait]
impl MovieCatalog for MemoryCatalog {
    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>> {
        Ok(self.movies.read().await.get(&id).cloned())
    }

    async fn update(&self, movie: &Movie) -> StoreResult<()> {
        let mut movies = self.movies.write().await;
        if !movies.contains_key(&movie.id) {
            return Err(StoreError::not_found(format!("movie {}", movie.id)));
        }
        movies.insert(movie.id, movie.clone());
        Ok(())
    }
}

/// Catalog backed by a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crashed write never leaves a torn catalog behind.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCatalog {
    /// Open a catalog at `path`. A missing file reads as an empty catalog.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Insert or replace a record.
    pub async fn insert(&self, movie: Movie) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut movies = self.load().await?;
        match movies.iter_mut().find(|m| m.id == movie.id) {
            Some(slot) => *slot = movie,
            None => movies.push(movie),
        }
        self.save(&movies).await
    }

    async fn load(&self) -> StoreResult<Vec<Movie>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, movies: &[Movie]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(movies)?;
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl MovieCatalog for JsonCatalog {
    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>> {
        Ok(self.load().await?.into_iter().find(|m| m.id == id))
    }

    async fn update(&self, movie: &Movie) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut movies = self.load().await?;
        let slot = movies
            .iter_mut()
            .find(|m| m.id == movie.id)
            .ok_or_else(|| StoreError::not_found(format!("movie {}", movie.id)))?;
        *slot = movie.clone();
        self.save(&movies).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_models::ProcessingStatus;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_catalog_round_trip() {
        let catalog = MemoryCatalog::new();
        catalog.insert(Movie::new(MovieId(1), "First")).await;

        let mut movie = catalog.get(MovieId(1)).await.unwrap().unwrap();
        movie.begin_processing();
        catalog.update(&movie).await.unwrap();

        let reloaded = catalog.get(MovieId(1)).await.unwrap().unwrap();
        assert_eq!(reloaded.processing_status, ProcessingStatus::Processing);
    }

    #[tokio::test]
    async fn test_memory_catalog_update_missing_fails() {
        let catalog = MemoryCatalog::new();
        let movie = Movie::new(MovieId(9), "Ghost");
        assert!(matches!(
            catalog.update(&movie).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_json_catalog_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = JsonCatalog::new(&path);
        catalog
            .insert(Movie::new(MovieId(7), "Seventh").with_source("videos/in.mp4"))
            .await
            .unwrap();

        let reopened = JsonCatalog::new(&path);
        let movie = reopened.get(MovieId(7)).await.unwrap().unwrap();
        assert_eq!(movie.title, "Seventh");
        assert_eq!(movie.video_file.as_deref(), Some("videos/in.mp4"));
    }

    #[tokio::test]
    async fn test_json_catalog_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let catalog = JsonCatalog::new(dir.path().join("absent.json"));
        assert!(catalog.get(MovieId(1)).await.unwrap().is_none());
    }
}
