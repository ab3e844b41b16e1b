//! Error types for the pixinfo metadata pipeline.
//!
//! Most per-file failures never leave the pipeline: they are logged and the
//! affected record keeps its default values. The variants here exist so those
//! failures can be described precisely in logs, and so the few errors that do
//! abort a run (an unavailable folder picker, a bad config file) carry context.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pixinfo operations.
#[derive(Error, Debug)]
pub enum PixinfoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Pixel dimension probe failed
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },

    /// Embedded tag read failed
    #[error("Metadata extraction failed for {name}: {message}")]
    Metadata { name: String, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {name} after {timeout_ms}ms")]
    Timeout {
        name: String,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {name} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// A directory or entry could not be read during collection
    #[error("Cannot read {path}: {message}")]
    Traversal { path: PathBuf, message: String },

    /// The host cannot offer folder selection
    #[error("Folder selection is not supported here: {0}")]
    PickerUnavailable(String),
}

/// Convenience type alias for pixinfo results.
pub type Result<T> = std::result::Result<T, PixinfoError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_unavailable_message() {
        let err = PipelineError::PickerUnavailable("stdin is not a terminal".into());
        assert_eq!(
            err.to_string(),
            "Folder selection is not supported here: stdin is not a terminal"
        );
    }

    #[test]
    fn test_pipeline_error_converts_to_top_level() {
        let err: PixinfoError = PipelineError::Timeout {
            name: "a.png".into(),
            stage: "decode".into(),
            timeout_ms: 5000,
        }
        .into();
        assert!(err.to_string().starts_with("Pipeline error: Timeout in decode"));
    }
}
