//! Movie processing pipeline orchestration.
//!
//! One call processes one enqueued movie job: probe the source, transcode
//! the resolution variants, commit what succeeded, derive the preview
//! assets, and write the terminal status. Each variant transcode and the
//! whole asset block are fault-isolated: a failure is recorded in the error
//! summary instead of aborting sibling steps. The only fatal condition is
//! zero successful variants.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::warn;

use flick_media::{MediaError, MediaProcessor};
use flick_models::encoding::{
    ERROR_SUMMARY_MAX_CHARS, HERO_HEIGHT, HERO_WIDTH, STDERR_TRUNCATE_CHARS, TEASER_SECONDS,
    THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH,
};
use flick_models::{truncate_chars, ArtifactKind, Movie, MovieId, ProcessingStatus, VariantTier};
use flick_store::{MediaStore, MovieCatalog};

use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;

/// The movie processing pipeline.
///
/// Single writer of the movie record for the duration of a run; the queue
/// in front of it is responsible for at most one concurrent run per movie.
pub struct MoviePipeline {
    catalog: Arc<dyn MovieCatalog>,
    store: MediaStore,
    media: Arc<dyn MediaProcessor>,
    tmp_dir: PathBuf,
}

impl MoviePipeline {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        store: MediaStore,
        media: Arc<dyn MediaProcessor>,
        tmp_dir: PathBuf,
    ) -> Self {
        Self {
            catalog,
            store,
            media,
            tmp_dir,
        }
    }

    /// Process one enqueued movie job.
    ///
    /// A movie without a source file is a silent no-op, so re-enqueueing
    /// such a job is always safe. If an error escapes the per-step fault
    /// isolation (e.g. a bookkeeping write fails), a terminal status is
    /// still best-effort written before the error propagates; a completed
    /// call never leaves the record in `processing`.
    pub async fn process(&self, id: MovieId) -> WorkerResult<()> {
        match self.run(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.write_terminal_after_abort(id, &e).await;
                Err(e)
            }
        }
    }

    async fn run(&self, id: MovieId) -> WorkerResult<()> {
        let log = JobLogger::new(id, "process_movie");

        let Some(mut movie) = self.catalog.get(id).await? else {
            return Err(WorkerError::MovieNotFound(id));
        };

        // Nothing to do without an input file.
        let Some(source_key) = movie.video_file.clone() else {
            return Ok(());
        };
        let source = self.store.path(&source_key);

        log.log_start("processing source video");
        fs::create_dir_all(&self.tmp_dir).await?;

        // Mark processing (and clear the previous error summary).
        movie.begin_processing();
        self.catalog.update(&movie).await?;

        // Probe duration early (best effort).
        let probed = self.media.probe_duration(&source).await.filter(|d| *d > 0);

        // Transcode each tier to a temp file; one failing does not abort
        // the others.
        let mut errors: Vec<String> = Vec::new();
        let mut outcomes: Vec<(VariantTier, PathBuf, bool)> = Vec::new();
        for tier in VariantTier::ALL {
            let tmp = self.tmp_dir.join(ArtifactKind::Variant(tier).file_name(id));
            let ok = self.safe_transcode(&source, &tmp, tier, &mut errors).await;
            outcomes.push((tier, tmp, ok));
        }

        // Commit available variants, plus the probed duration if the record
        // has none yet, as one group.
        let mut dirty = false;
        for (tier, tmp, ok) in &outcomes {
            if *ok && tmp.exists() {
                let key = ArtifactKind::Variant(*tier).key(id);
                self.store.commit(tmp, &key).await?;
                movie.set_variant(*tier, key);
                dirty = true;
            }
        }
        if movie.duration_seconds.is_none() {
            if let Some(d) = probed {
                movie.duration_seconds = Some(d);
                dirty = true;
            }
        }
        if dirty {
            self.catalog.update(&movie).await?;
        }

        let any_ok = outcomes.iter().any(|(_, _, ok)| *ok);

        // Prefer the highest-resolution committed variant as the asset
        // source, falling back to the original upload.
        let best_src = self.best_source(&movie, &source).await;

        // Best-effort asset block; its failures never change readiness.
        let mut asset_errors: Vec<String> = Vec::new();
        if let Err(e) = self.build_assets(&mut movie, &best_src, probed).await {
            log.log_warning(&format!("asset extraction failed: {e}"));
            asset_errors.push(format_asset_error(&e));
        }

        movie.finish(any_ok, build_summary(&errors, &asset_errors));
        self.catalog.update(&movie).await?;

        if any_ok {
            log.log_completion(&format!(
                "{} variant(s) ready",
                outcomes.iter().filter(|(_, _, ok)| *ok).count()
            ));
        } else {
            log.log_error("no variant could be produced");
        }
        Ok(())
    }

    /// Transcode one variant; convert any failure into a collected error
    /// message and a boolean outcome.
    async fn safe_transcode(
        &self,
        src: &Path,
        out_tmp: &Path,
        tier: VariantTier,
        errors: &mut Vec<String>,
    ) -> bool {
        match self
            .media
            .transcode_variant(src, out_tmp, tier.height())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                errors.push(format_variant_error(tier, &e));
                false
            }
        }
    }

    /// First existing committed variant, highest resolution first, else the
    /// original source.
    async fn best_source(&self, movie: &Movie, source: &Path) -> PathBuf {
        for tier in VariantTier::ALL {
            if let Some(key) = movie.variant(tier) {
                if self.store.exists(key).await {
                    return self.store.path(key);
                }
            }
        }
        source.to_path_buf()
    }

    /// Extract and commit the thumbnail, hero image and teaser clip, plus
    /// the duration if it is still unset. The first failure aborts the
    /// remaining asset steps; the caller records it separately from the
    /// variant errors.
    async fn build_assets(
        &self,
        movie: &mut Movie,
        best_src: &Path,
        probed: Option<u64>,
    ) -> WorkerResult<()> {
        let id = movie.id;

        let dur = match probed {
            Some(d) => d,
            None => self
                .media
                .probe_duration(best_src)
                .await
                .filter(|d| *d > 0)
                .unwrap_or(0),
        };
        let (frame_at, teaser_at) = asset_timestamps(dur);

        let tmp_thumb = self.tmp_dir.join(ArtifactKind::Thumbnail.file_name(id));
        let tmp_hero = self.tmp_dir.join(ArtifactKind::Hero.file_name(id));
        let tmp_teaser = self.tmp_dir.join(ArtifactKind::Teaser.file_name(id));

        self.media
            .extract_frame(best_src, &tmp_thumb, THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, frame_at)
            .await?;
        self.media
            .extract_frame(best_src, &tmp_hero, HERO_WIDTH, HERO_HEIGHT, frame_at)
            .await?;
        self.media
            .cut_teaser(best_src, &tmp_teaser, teaser_at, TEASER_SECONDS)
            .await?;

        // Commit the assets, plus the duration if still unset, as one group.
        if movie.duration_seconds.is_none() && dur > 0 {
            movie.duration_seconds = Some(dur);
        }

        let thumb_key = ArtifactKind::Thumbnail.key(id);
        self.store.commit(&tmp_thumb, &thumb_key).await?;
        movie.thumbnail_image = Some(thumb_key);

        let hero_key = ArtifactKind::Hero.key(id);
        self.store.commit(&tmp_hero, &hero_key).await?;
        movie.hero_image = Some(hero_key);

        let teaser_key = ArtifactKind::Teaser.key(id);
        self.store.commit(&tmp_teaser, &teaser_key).await?;
        movie.teaser_video = Some(teaser_key);

        self.catalog.update(movie).await?;
        Ok(())
    }

    /// Best-effort repair after an error escaped the per-step isolation:
    /// if the record was left in `processing`, write a terminal status so
    /// no job is ever stuck there. Readiness still reflects whether any
    /// variant was committed before the abort.
    async fn write_terminal_after_abort(&self, id: MovieId, cause: &WorkerError) {
        match self.catalog.get(id).await {
            Ok(Some(mut movie)) if movie.processing_status == ProcessingStatus::Processing => {
                let summary =
                    truncate_chars(&format!("internal: {cause}"), ERROR_SUMMARY_MAX_CHARS);
                movie.finish(movie.has_any_variant(), summary);
                if let Err(e) = self.catalog.update(&movie).await {
                    warn!("Failed to write terminal status for movie {}: {}", id, e);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to load movie {} after abort: {}", id, e),
        }
    }
}

/// Still-frame and teaser seek offsets for a given duration.
///
/// Picks representative content past any cold-open sequence while keeping
/// the offsets strictly positive; an unknown duration falls back to second 1.
fn asset_timestamps(duration_secs: u64) -> (u64, u64) {
    ((duration_secs / 3).max(1), (duration_secs / 5).max(1))
}

fn format_variant_error(tier: VariantTier, e: &MediaError) -> String {
    match e {
        MediaError::CommandFailed { exit_code, stderr } => format!(
            "[{tier}] rc={} err={}",
            format_exit_code(*exit_code),
            truncate_chars(stderr.trim(), STDERR_TRUNCATE_CHARS)
        ),
        MediaError::Timeout(secs) => format!("[{tier}] rc=timeout err=no exit within {secs}s"),
        other => format!("[{tier}] unexpected: {other}"),
    }
}

fn format_asset_error(e: &WorkerError) -> String {
    match e {
        WorkerError::Media(MediaError::CommandFailed { exit_code, stderr }) => format!(
            "[assets] rc={} err={}",
            format_exit_code(*exit_code),
            truncate_chars(stderr.trim(), STDERR_TRUNCATE_CHARS)
        ),
        WorkerError::Media(MediaError::Timeout(secs)) => {
            format!("[assets] rc=timeout err=no exit within {secs}s")
        }
        other => format!("[assets] unexpected: {other}"),
    }
}

fn format_exit_code(code: Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}

/// Newline-join the transcode and asset errors, bounded to the persisted
/// summary length. Empty when the run was clean.
fn build_summary(errors: &[String], asset_errors: &[String]) -> String {
    let combined: Vec<&str> = errors
        .iter()
        .chain(asset_errors.iter())
        .map(String::as_str)
        .collect();
    if combined.is_empty() {
        String::new()
    } else {
        truncate_chars(&combined.join("\n"), ERROR_SUMMARY_MAX_CHARS)
    }
}
