//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while driving the external media tools.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),

    #[error("command exited with {}", exit_code_label(.exit_code))]
    CommandFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("command timed out after {0} seconds")]
    Timeout(u64),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unparseable tool output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a command failure carrying exit code and captured stderr.
    pub fn command_failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let e = MediaError::command_failed(Some(3), "stderr text");
        assert_eq!(e.to_string(), "command exited with 3");

        let killed = MediaError::command_failed(None, "");
        assert_eq!(killed.to_string(), "command exited with signal");
    }
}
