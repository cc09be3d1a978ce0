//! Custom error types for marklaunch
//!
//! This module provides the single tagged error type used throughout the
//! crate. Discovery and launch failures propagate up to the command entry
//! points and end as a user-visible notification; per-candidate metadata
//! failures and stream-push failures are swallowed at their origin and only
//! logged.

use thiserror::Error;

use crate::process::CommandOutput;

/// Main error type for marklaunch operations
#[derive(Error, Debug)]
pub enum MarklaunchError {
    /// No usable installation was found; the message is user-facing
    #[error("{0}")]
    Discovery(String),

    /// A per-candidate metadata fetch failed; never surfaced individually
    #[error("Metadata query failed: {0}")]
    Query(String),

    /// A subprocess exited non-zero or failed to spawn, with captured output
    #[error("Command exited with status {}", .0.exit_code)]
    CommandFailed(CommandOutput),

    /// A snapshot could not be written to the streaming helper
    #[error("Stream write failed: {0}")]
    StreamWrite(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MarklaunchError {
    /// Create a discovery error carrying a user-facing message
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a metadata-query error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a stream-write error
    pub fn stream_write(msg: impl Into<String>) -> Self {
        Self::StreamWrite(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using MarklaunchError
pub type Result<T> = std::result::Result<T, MarklaunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_message_is_verbatim() {
        let err = MarklaunchError::discovery("Unable to find the Marked 2 application.");
        assert_eq!(err.to_string(), "Unable to find the Marked 2 application.");
    }

    #[test]
    fn test_command_failed_reports_exit_code() {
        let err = MarklaunchError::CommandFailed(CommandOutput {
            exit_code: 7,
            stdout: vec![],
            stderr: vec!["boom".to_string()],
        });
        assert_eq!(err.to_string(), "Command exited with status 7");
    }

    #[test]
    fn test_config_error() {
        let err = MarklaunchError::config("missing mkstream helper");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing mkstream helper"
        );
    }
}
