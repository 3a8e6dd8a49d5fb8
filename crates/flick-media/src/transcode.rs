//! Resolution variant transcoding.

use std::path::Path;

use tokio::fs;
use tracing::info;

use flick_models::EncodingConfig;

use crate::command::FfmpegCommand;
use crate::error::MediaResult;
use crate::filters;
use crate::tools::MediaTools;

/// Transcode `src` into an MP4 variant with the given output height.
///
/// Aspect ratio is preserved (no padding), output width is forced even, SAR
/// is normalized to square pixels, and the moov atom is relocated for
/// progressive playback. The result is written to `out_tmp`; committing it
/// into permanent storage is the caller's concern.
pub async fn transcode_variant(
    tools: &MediaTools,
    encoding: &EncodingConfig,
    src: &Path,
    out_tmp: &Path,
    height: u32,
) -> MediaResult<()> {
    if let Some(parent) = out_tmp.parent() {
        fs::create_dir_all(parent).await?;
    }

    info!(
        "Transcoding {} -> {} ({}p)",
        src.display(),
        out_tmp.display(),
        height
    );

    let cmd = FfmpegCommand::new(src, out_tmp)
        .map_video_and_optional_audio()
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .video_filter(filters::variant_scale(height))
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
    async fn test_transcode_creates_parent_and_runs_tool() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.mp4");
        fs::write(&src, b"fake").await.unwrap();
        let out = dir.path().join("tmp/variant.mp4");

        // `true` ignores the ffmpeg arguments and exits 0.
        let tools = MediaTools::with_paths("/bin/true", "/bin/true");
        transcode_variant(&tools, &EncodingConfig::default(), &src, &out, 720)
            .await
            .unwrap();

        assert!(out.parent().unwrap().is_dir());
    }
}
