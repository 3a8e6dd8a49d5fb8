//! Container duration probing.

use std::path::Path;

use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::tools::MediaTools;

/// Probe the container duration of `src` in whole seconds.
///
/// Duration is an enrichment, not a correctness-critical value: any
/// underlying failure (missing file, tool error, unparseable output) is
/// reported as `None` and the pipeline proceeds without it.
pub async fn probe_duration(tools: &MediaTools, src: &Path) -> Option<u64> {
    match try_probe_duration(tools, src).await {
        Ok(secs) => Some(secs),
        Err(e) => {
            debug!("duration probe failed for {}: {}", src.display(), e);
            None
        }
    }
}

async fn try_probe_duration(tools: &MediaTools, src: &Path) -> MediaResult<u64> {
    if !src.exists() {
        return Err(MediaError::FileNotFound(src.to_path_buf()));
    }

    let args = vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "default=nw=1:nk=1".to_string(),
        src.to_string_lossy().to_string(),
    ];

    let stdout = tools.run_ffprobe(&args).await?;
    parse_duration(&stdout).ok_or_else(|| MediaError::InvalidOutput(stdout.trim().to_string()))
}

/// Parse the prober's plain-text duration output into whole seconds.
fn parse_duration(s: &str) -> Option<u64> {
    let secs: f64 = s.trim().parse().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        Some(secs as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("61.44"), Some(61));
        assert_eq!(parse_duration(" 8.0\n"), Some(8));
        assert_eq!(parse_duration("0.3"), Some(0));
        assert_eq!(parse_duration("N/A"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-5"), None);
    }

    #[tokio::test]
    async fn test_probe_missing_file_is_none() {
        let tools = MediaTools::with_paths("/bin/sh", "/bin/sh");
        let got = probe_duration(&tools, Path::new("/nonexistent/input.mp4")).await;
        assert_eq!(got, None);
    }
}
