//! Core types for zstd-pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::ContextKind;
use crate::error::{Error, Result};

/// Unique identifier for a submitted task
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compression level accepted by the codec (1..=22)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct CompressionLevel(i32);

impl CompressionLevel {
    /// Lowest accepted level
    pub const MIN: i32 = 1;
    /// Highest accepted level
    pub const MAX: i32 = 22;

    /// Validate and wrap a raw level
    pub fn new(level: i32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::InvalidLevel {
                level,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Get the raw level
    pub fn get(&self) -> i32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i32> for CompressionLevel {
    type Error = Error;

    fn try_from(level: i32) -> Result<Self> {
        Self::new(level)
    }
}

impl From<CompressionLevel> for i32 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Accepted, not started
    Pending,
    /// Reading source bytes on the I/O context
    Reading,
    /// Compressing on the compute context
    Compressing,
    /// Writing the compressed artifact on the I/O context
    Writing,
    /// Target written
    Succeeded,
    /// A stage failed
    Failed,
    /// Cancellation observed at a stage boundary
    Cancelled,
}

impl TaskState {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed | TaskState::Cancelled
        )
    }

    /// Whether `next` is a legal successor of this state.
    ///
    /// Forward moves go one step at a time along
    /// Pending → Reading → Compressing → Writing → Succeeded. Failed and
    /// Cancelled are reachable from every non-terminal state.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            TaskState::Failed | TaskState::Cancelled => true,
            TaskState::Reading => *self == TaskState::Pending,
            TaskState::Compressing => *self == TaskState::Reading,
            TaskState::Writing => *self == TaskState::Compressing,
            TaskState::Succeeded => *self == TaskState::Writing,
            TaskState::Pending => false,
        }
    }
}

/// One of the ordered steps composing a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Read source bytes
    Read,
    /// Compress the bytes
    Compress,
    /// Persist the compressed bytes
    Write,
    /// Deliver the outcome to callbacks
    Report,
}

impl Stage {
    /// Execution context the stage is dispatched onto
    pub fn context(&self) -> ContextKind {
        match self {
            Stage::Read | Stage::Write => ContextKind::IoBound,
            Stage::Compress => ContextKind::ComputeBound,
            Stage::Report => ContextKind::Foreground,
        }
    }
}

/// Which stage a task failed in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The source could not be read
    ReadError,
    /// The codec rejected the input
    CompressionError,
    /// The target could not be written
    WriteError,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::ReadError => "read error",
            FailureKind::CompressionError => "compression error",
            FailureKind::WriteError => "write error",
        };
        f.write_str(label)
    }
}

/// Terminal result of a task, produced exactly once
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompressionOutcome {
    /// The target was written
    Success {
        /// Bytes read from the source
        original_size: u64,
        /// Bytes written to the target
        compressed_size: u64,
    },
    /// A stage failed; later stages did not run
    Failure {
        /// Stage that failed
        kind: FailureKind,
        /// Underlying error message
        detail: String,
    },
    /// Cancellation was observed before compression or before writing
    Cancelled,
}

impl CompressionOutcome {
    /// The terminal state this outcome corresponds to
    pub fn terminal_state(&self) -> TaskState {
        match self {
            CompressionOutcome::Success { .. } => TaskState::Succeeded,
            CompressionOutcome::Failure { .. } => TaskState::Failed,
            CompressionOutcome::Cancelled => TaskState::Cancelled,
        }
    }

    /// Whether the target was written
    pub fn is_success(&self) -> bool {
        matches!(self, CompressionOutcome::Success { .. })
    }

    pub(crate) fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        CompressionOutcome::Failure {
            kind,
            detail: detail.into(),
        }
    }
}

/// Severity tag handed to the reporting collaborator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Task succeeded
    Info,
    /// Task was cancelled
    Warning,
    /// Task failed
    Error,
}

/// Event emitted during a task's lifecycle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Task accepted by the pipeline
    Submitted {
        /// Task ID
        id: TaskId,
        /// Requested compression level
        level: CompressionLevel,
    },

    /// Task moved to a new state
    StateChanged {
        /// Task ID
        id: TaskId,
        /// The state just entered
        state: TaskState,
    },

    /// Task reached its terminal state
    Finished {
        /// Task ID
        id: TaskId,
        /// Terminal outcome
        outcome: CompressionOutcome,
        /// Wall time from submission to terminal state
        elapsed_ms: u64,
        /// When the terminal state was reached
        finished_at: DateTime<Utc>,
    },
}
