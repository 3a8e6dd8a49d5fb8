//! Structured job logging utilities.

use tracing::{error, info, warn};

use flick_models::MovieId;

/// Job logger for consistent lifecycle logging.
#[derive(Debug, Clone)]
pub struct JobLogger {
    movie_id: String,
    operation: String,
}

impl JobLogger {
    /// Create a new job logger for a movie and operation.
    pub fn new(movie_id: MovieId, operation: &str) -> Self {
        Self {
            movie_id: movie_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of a job operation.
    pub fn log_start(&self, message: &str) {
        info!(
            movie_id = %self.movie_id,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    /// Log a warning during job execution.
    pub fn log_warning(&self, message: &str) {
        warn!(
            movie_id = %self.movie_id,
            operation = %self.operation,
            "Job warning: {}", message
        );
    }

    /// Log an error during job execution.
    pub fn log_error(&self, message: &str) {
        error!(
            movie_id = %self.movie_id,
            operation = %self.operation,
            "Job error: {}", message
        );
    }

    /// Log the completion of a job operation.
    pub fn log_completion(&self, message: &str) {
        info!(
            movie_id = %self.movie_id,
            operation = %self.operation,
            "Job completed: {}", message
        );
    }
}
