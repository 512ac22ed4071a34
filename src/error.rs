//! Error types for zstd-pipeline
//!
//! Two layers of failure exist in this crate:
//! - Library errors ([`Error`]) returned synchronously by constructors, config
//!   parsing and request validation.
//! - Task failures, which never surface as `Err` across the asynchronous
//!   boundary. They are folded into a
//!   [`CompressionOutcome`](crate::types::CompressionOutcome) instead.
//!
//! [`CodecError`] sits between the two: codec adapters return it, and the
//! pipeline turns it into a `CompressionError` outcome.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{TaskId, TaskState};

/// Result type alias for zstd-pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for zstd-pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "compression.default_level")
        key: Option<String>,
    },

    /// Compression level outside the codec's supported range
    #[error("invalid compression level {level}: expected {min}..={max}")]
    InvalidLevel {
        /// The rejected level
        level: i32,
        /// Lowest accepted level
        min: i32,
        /// Highest accepted level
        max: i32,
    },

    /// Target already exists and overwriting was not confirmed by the caller
    #[error("target {path} already exists and overwrite was not confirmed")]
    TargetExists {
        /// The existing target
        path: PathBuf,
    },

    /// A task state change outside the allowed transition graph
    #[error("task {id}: invalid state transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// Task whose state change was rejected
        id: TaskId,
        /// State the task was in
        from: TaskState,
        /// State that was requested
        to: TaskState,
    },

    /// The task driver was dropped before reaching a terminal state
    #[error("task {id} was aborted before producing an outcome")]
    TaskAborted {
        /// The task that never completed
        id: TaskId,
    },

    /// Execution runtime unavailable or failed to start
    #[error("runtime error: {0}")]
    Runtime(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Machine-readable error code, stable across releases
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::InvalidLevel { .. } => "invalid_level",
            Error::TargetExists { .. } => "target_exists",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::TaskAborted { .. } => "task_aborted",
            Error::Runtime(_) => "runtime_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}

/// Failure reported by a [`Codec`](crate::codec::Codec) implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("codec {codec} failed: {message}")]
pub struct CodecError {
    /// Name of the codec that failed
    pub codec: &'static str,
    /// Implementation-specific detail
    pub message: String,
}

impl CodecError {
    /// Create a codec error from any displayable cause
    pub fn new(codec: &'static str, message: impl Into<String>) -> Self {
        Self {
            codec,
            message: message.into(),
        }
    }
}
