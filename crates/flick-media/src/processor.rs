//! The media-processing seam consumed by the pipeline orchestrator.

use std::path::Path;

use async_trait::async_trait;

use flick_models::encoding::{self, EncodingConfig};

use crate::error::MediaResult;
use crate::tools::MediaTools;
use crate::{assets, probe, transcode};

/// The media operations the pipeline depends on.
///
/// The production implementation drives the external tools; tests substitute
/// a scripted implementation to exercise the orchestrator's failure policy.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Best-effort container duration in whole seconds.
    async fn probe_duration(&self, src: &Path) -> Option<u64>;

    /// Produce one resolution variant at `height` into `out_tmp`.
    async fn transcode_variant(&self, src: &Path, out_tmp: &Path, height: u32) -> MediaResult<()>;

    /// Extract a letterboxed still frame at `at_secs`.
    async fn extract_frame(
        &self,
        src: &Path,
        out_tmp: &Path,
        width: u32,
        height: u32,
        at_secs: u64,
    ) -> MediaResult<()>;

    /// Cut a letterboxed teaser clip starting at `start_secs`.
    async fn cut_teaser(
        &self,
        src: &Path,
        out_tmp: &Path,
        start_secs: u64,
        duration_secs: u64,
    ) -> MediaResult<()>;
}

/// `MediaProcessor` backed by the external ffmpeg/ffprobe binaries.
#[derive(Debug, Clone)]
pub struct FfmpegProcessor {
    tools: MediaTools,
    encoding: EncodingConfig,
}

impl FfmpegProcessor {
    /// Create a processor with the default encoding configuration.
    pub fn new(tools: MediaTools) -> Self {
        Self {
            tools,
            encoding: EncodingConfig::default(),
        }
    }

    /// Override the variant encoding configuration.
    pub fn with_encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = encoding;
        self
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn probe_duration(&self, src: &Path) -> Option<u64> {
        probe::probe_duration(&self.tools, src).await
    }

    async fn transcode_variant(&self, src: &Path, out_tmp: &Path, height: u32) -> MediaResult<()> {
        transcode::transcode_variant(&self.tools, &self.encoding, src, out_tmp, height).await
    }

    async fn extract_frame(
        &self,
        src: &Path,
        out_tmp: &Path,
        width: u32,
        height: u32,
        at_secs: u64,
    ) -> MediaResult<()> {
        assets::frame_to_image(&self.tools, src, out_tmp, width, height, at_secs).await
    }

    async fn cut_teaser(
        &self,
        src: &Path,
        out_tmp: &Path,
        start_secs: u64,
        duration_secs: u64,
    ) -> MediaResult<()> {
        assets::cut_teaser(
            &self.tools,
            &EncodingConfig::for_teaser(),
            src,
            out_tmp,
            start_secs,
            duration_secs,
            encoding::TEASER_WIDTH,
            encoding::TEASER_HEIGHT,
        )
        .await
    }
}
