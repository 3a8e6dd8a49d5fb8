//! Movie record and processing lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque numeric identifier assigned by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub i64);

impl MovieId {
    /// Get the inner value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Movie processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Waiting for a processing run
    #[default]
    Pending,
    /// A processing run is in flight
    Processing,
    /// At least one playable variant exists
    Ready,
    /// The last run produced no variant
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Ready => "ready",
            ProcessingStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state for a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Ready | ProcessingStatus::Failed)
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target vertical resolution for a transcoded variant.
///
/// Ordering doubles as the best-source preference when picking an input for
/// asset extraction: highest resolution first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantTier {
    P1080,
    P720,
    P480,
}

impl VariantTier {
    /// All tiers, highest resolution first.
    pub const ALL: [VariantTier; 3] = [VariantTier::P1080, VariantTier::P720, VariantTier::P480];

    /// Target output height in pixels.
    pub fn height(self) -> u32 {
        match self {
            VariantTier::P1080 => 1080,
            VariantTier::P720 => 720,
            VariantTier::P480 => 480,
        }
    }
}

impl fmt::Display for VariantTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.height())
    }
}

/// A derived artifact the pipeline produces for a movie.
///
/// Each kind has a deterministic, collision-free storage key derived from the
/// movie id, so a re-run replaces the previous file instead of accumulating
/// suffixed duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Variant(VariantTier),
    Thumbnail,
    Hero,
    Teaser,
}

impl ArtifactKind {
    /// Storage directory for this kind of artifact.
    pub fn dir(self) -> &'static str {
        match self {
            ArtifactKind::Variant(_) => "variants",
            ArtifactKind::Thumbnail => "thumbnails",
            ArtifactKind::Hero => "hero_images",
            ArtifactKind::Teaser => "teasers",
        }
    }

    /// Canonical file name within the storage directory.
    pub fn file_name(self, id: MovieId) -> String {
        match self {
            ArtifactKind::Variant(tier) => format!("movie_{}.{}.mp4", id, tier.height()),
            ArtifactKind::Thumbnail => format!("movie_{}_thumb.jpg", id),
            ArtifactKind::Hero => format!("movie_{}_hero.jpg", id),
            ArtifactKind::Teaser => format!("movie_{}_teaser.mp4", id),
        }
    }

    /// Full storage key (`dir/file_name`).
    pub fn key(self, id: MovieId) -> String {
        format!("{}/{}", self.dir(), self.file_name(id))
    }
}

/// A movie record in the catalog.
///
/// Created by the catalog management surface; mutated only by the processing
/// pipeline after creation. Output references either point at a committed
/// storage file or are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier
    pub id: MovieId,

    /// Display title
    pub title: String,

    /// Uploaded source video (storage key), if any
    #[serde(default)]
    pub video_file: Option<String>,

    /// Transcoded 1080p variant (storage key)
    #[serde(default)]
    pub video_1080: Option<String>,

    /// Transcoded 720p variant (storage key)
    #[serde(default)]
    pub video_720: Option<String>,

    /// Transcoded 480p variant (storage key)
    #[serde(default)]
    pub video_480: Option<String>,

    /// 640x360 still frame (storage key)
    #[serde(default)]
    pub thumbnail_image: Option<String>,

    /// 1280x720 still frame (storage key)
    #[serde(default)]
    pub hero_image: Option<String>,

    /// Short preview clip (storage key)
    #[serde(default)]
    pub teaser_video: Option<String>,

    /// Processing lifecycle state
    #[serde(default)]
    pub processing_status: ProcessingStatus,

    /// Error summary from the last processing run (bounded length)
    #[serde(default)]
    pub processing_error: String,

    /// Container duration in whole seconds, once probed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Create a new record in `pending` state with no files attached.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            video_file: None,
            video_1080: None,
            video_720: None,
            video_480: None,
            thumbnail_image: None,
            hero_image: None,
            teaser_video: None,
            processing_status: ProcessingStatus::Pending,
            processing_error: String::new(),
            duration_seconds: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach an uploaded source video.
    pub fn with_source(mut self, key: impl Into<String>) -> Self {
        self.video_file = Some(key.into());
        self
    }

    /// Get the committed variant key for a tier.
    pub fn variant(&self, tier: VariantTier) -> Option<&str> {
        match tier {
            VariantTier::P1080 => self.video_1080.as_deref(),
            VariantTier::P720 => self.video_720.as_deref(),
            VariantTier::P480 => self.video_480.as_deref(),
        }
    }

    /// Record a committed variant key for a tier.
    pub fn set_variant(&mut self, tier: VariantTier, key: String) {
        match tier {
            VariantTier::P1080 => self.video_1080 = Some(key),
            VariantTier::P720 => self.video_720 = Some(key),
            VariantTier::P480 => self.video_480 = Some(key),
        }
        self.touch();
    }

    /// Check whether any transcoded variant is present.
    pub fn has_any_variant(&self) -> bool {
        VariantTier::ALL.iter().any(|t| self.variant(*t).is_some())
    }

    /// Enter `processing` and clear the previous error summary.
    pub fn begin_processing(&mut self) {
        self.processing_status = ProcessingStatus::Processing;
        self.processing_error.clear();
        self.touch();
    }

    /// Write the terminal status and error summary for a run.
    pub fn finish(&mut self, any_ok: bool, error_summary: String) {
        self.processing_status = if any_ok {
            ProcessingStatus::Ready
        } else {
            ProcessingStatus::Failed
        };
        self.processing_error = error_summary;
        self.touch();
    }

    /// All storage keys currently referenced by this record (source,
    /// variants, assets). Used for whole-movie artifact cleanup.
    pub fn artifact_keys(&self) -> Vec<&str> {
        [
            self.video_file.as_deref(),
            self.video_1080.as_deref(),
            self.video_720.as_deref(),
            self.video_480.as_deref(),
            self.thumbnail_image.as_deref(),
            self.hero_image.as_deref(),
            self.teaser_video.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(ProcessingStatus::Pending.as_str(), "pending");
        assert_eq!(ProcessingStatus::Ready.as_str(), "ready");
        assert!(ProcessingStatus::Ready.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());

        let json = serde_json::to_string(&ProcessingStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_canonical_names() {
        let id = MovieId(7);
        assert_eq!(
            ArtifactKind::Variant(VariantTier::P1080).key(id),
            "variants/movie_7.1080.mp4"
        );
        assert_eq!(ArtifactKind::Thumbnail.key(id), "thumbnails/movie_7_thumb.jpg");
        assert_eq!(ArtifactKind::Hero.key(id), "hero_images/movie_7_hero.jpg");
        assert_eq!(ArtifactKind::Teaser.key(id), "teasers/movie_7_teaser.mp4");
    }

    #[test]
    fn test_tier_order_is_highest_first() {
        let heights: Vec<u32> = VariantTier::ALL.iter().map(|t| t.height()).collect();
        assert_eq!(heights, vec![1080, 720, 480]);
    }

    #[test]
    fn test_begin_processing_clears_error() {
        let mut movie = Movie::new(MovieId(1), "Test");
        movie.processing_error = "[480p] rc=1 err=old".to_string();
        movie.processing_status = ProcessingStatus::Failed;

        movie.begin_processing();
        assert_eq!(movie.processing_status, ProcessingStatus::Processing);
        assert!(movie.processing_error.is_empty());
    }

    #[test]
    fn test_variant_accessors() {
        let mut movie = Movie::new(MovieId(3), "Test");
        assert!(!movie.has_any_variant());

        movie.set_variant(VariantTier::P720, "variants/movie_3.720.mp4".to_string());
        assert!(movie.has_any_variant());
        assert_eq!(movie.variant(VariantTier::P720), Some("variants/movie_3.720.mp4"));
        assert_eq!(movie.variant(VariantTier::P1080), None);
    }

    #[test]
    fn test_artifact_keys_skips_absent() {
        let movie = Movie::new(MovieId(9), "Test").with_source("videos/input.mp4");
        assert_eq!(movie.artifact_keys(), vec!["videos/input.mp4"]);
    }
}
