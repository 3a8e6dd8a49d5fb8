//! External tool resolution and subprocess execution.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Resolved executable paths for the external media tools, plus the
/// per-invocation timeout applied to every subprocess.
///
/// Constructed once at process startup and passed explicitly to everything
/// that spawns a tool; nothing reads tool names from ambient state.
#[derive(Debug, Clone)]
pub struct MediaTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    timeout: Option<Duration>,
}

impl MediaTools {
    /// Resolve `ffmpeg` and `ffprobe` from the execution PATH.
    pub fn from_path() -> MediaResult<Self> {
        let ffmpeg = which::which("ffmpeg").map_err(|_| MediaError::ToolNotFound("ffmpeg"))?;
        let ffprobe = which::which("ffprobe").map_err(|_| MediaError::ToolNotFound("ffprobe"))?;
        Ok(Self::with_paths(ffmpeg, ffprobe))
    }

    /// Use explicit executable paths.
    pub fn with_paths(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            timeout: None,
        }
    }

    /// Set the per-invocation timeout. Expiry kills the child and surfaces
    /// as `MediaError::Timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn ffprobe(&self) -> &Path {
        &self.ffprobe
    }

    /// Run ffmpeg to completion. Output goes to the file ffmpeg writes;
    /// stdout is discarded.
    pub async fn run_ffmpeg(&self, args: &[String]) -> MediaResult<()> {
        self.run(&self.ffmpeg, args).await.map(|_| ())
    }

    /// Run ffprobe and return its captured stdout.
    pub async fn run_ffprobe(&self, args: &[String]) -> MediaResult<String> {
        self.run(&self.ffprobe, args).await
    }

    /// Spawn a tool, capture stdout/stderr as text, and fail with the exit
    /// code and stderr on non-zero exit.
    async fn run(&self, program: &Path, args: &[String]) -> MediaResult<String> {
        debug!("Running {} {}", program.display(), args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdout_pipe = child.stdout.take().expect("stdout not captured");
        let mut stderr_pipe = child.stderr.take().expect("stderr not captured");

        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stdout_pipe.read_to_end(&mut buf).await;
            buf
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr_pipe.read_to_end(&mut buf).await;
            buf
        });

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(
                        "{} timed out after {}s, killing process",
                        program.display(),
                        limit.as_secs()
                    );
                    let _ = child.kill().await;
                    return Err(MediaError::Timeout(limit.as_secs()));
                }
            },
            None => child.wait().await?,
        };

        let stdout = String::from_utf8_lossy(&stdout_task.await.unwrap_or_default()).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_task.await.unwrap_or_default()).into_owned();

        if status.success() {
            Ok(stdout)
        } else {
            Err(MediaError::command_failed(status.code(), stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_tools() -> MediaTools {
        // `sh` stands in for both tools; tests drive it with -c scripts.
        MediaTools::with_paths("/bin/sh", "/bin/sh")
    }

    fn script(s: &str) -> Vec<String> {
        vec!["-c".to_string(), s.to_string()]
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let out = shell_tools()
            .run_ffprobe(&script("echo 42.5"))
            .await
            .unwrap();
        assert_eq!(out.trim(), "42.5");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_code_and_stderr() {
        let err = shell_tools()
            .run_ffmpeg(&script("echo broken >&2; exit 3"))
            .await
            .unwrap_err();
        match err {
            MediaError::CommandFailed { exit_code, stderr } => {
                assert_eq!(exit_code, Some(3));
                assert!(stderr.contains("broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let err = shell_tools()
            .with_timeout(Duration::from_millis(100))
            .run_ffmpeg(&script("sleep 5"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Timeout(_)));
    }
}
