//! Derived asset extraction: still frames and the teaser clip.

use std::path::Path;

use tokio::fs;
use tracing::info;

use flick_models::encoding::{EncodingConfig, STILL_QUALITY};

use crate::command::FfmpegCommand;
use crate::error::MediaResult;
use crate::filters;
use crate::tools::MediaTools;

/// Extract a single frame at `at_secs` as a JPEG, scaled to fit within
/// `width`x`height` and letterboxed (centered) to exactly fill it.
pub async fn frame_to_image(
    tools: &MediaTools,
    src: &Path,
    out_tmp: &Path,
    width: u32,
    height: u32,
    at_secs: u64,
) -> MediaResult<()> {
    if let Some(parent) = out_tmp.parent() {
        fs::create_dir_all(parent).await?;
    }

    info!(
        "Extracting {}x{} still at {}s: {} -> {}",
        width,
        height,
        at_secs,
        src.display(),
        out_tmp.display()
    );

    let cmd = FfmpegCommand::new(src, out_tmp)
        .seek(at_secs)
        .single_frame()
        .video_filter(filters::box_fit(width, height))
        .still_quality(STILL_QUALITY);

    tools.run_ffmpeg(&cmd.build_args()).await
}

/// Cut a short teaser MP4 from `start_secs` with the given duration, scaled
/// and letterboxed to `width`x`height`, re-encoded with fast-start layout.
#[allow(clippy::too_many_arguments)]
pub async fn cut_teaser(
    tools: &MediaTools,
    encoding: &EncodingConfig,
    src: &Path,
    out_tmp: &Path,
    start_secs: u64,
    duration_secs: u64,
    width: u32,
    height: u32,
) -> MediaResult<()> {
    if let Some(parent) = out_tmp.parent() {
        fs::create_dir_all(parent).await?;
    }

    info!(
        "Cutting {}s teaser from {}s: {} -> {}",
        duration_secs,
        start_secs,
        src.display(),
        out_tmp.display()
    );

    let cmd = FfmpegCommand::new(src, out_tmp)
        .seek(start_secs)
        .duration(duration_secs)
        .map_video_and_optional_audio()
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .video_filter(filters::box_fit(width, height))
        .pixel_format(&encoding.pixel_format)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .faststart();

    tools.run_ffmpeg(&cmd.build_args()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_frame_to_image_creates_parent() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.mp4");
        fs::write(&src, b"fake").await.unwrap();
        let out = dir.path().join("tmp/thumb.jpg");

        let tools = MediaTools::with_paths("/bin/true", "/bin/true");
        frame_to_image(&tools, &src, &out, 640, 360, 20).await.unwrap();

        assert!(out.parent().unwrap().is_dir());
    }
}
