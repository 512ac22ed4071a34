//! Per-task state machine

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::{TaskId, TaskState};

/// A task as seen by its driver
///
/// Owned exclusively by the driver for the task's lifetime; callers interact
/// through a [`TaskHandle`](crate::TaskHandle) instead.
#[derive(Debug)]
pub struct PipelineTask {
    id: TaskId,
    state: TaskState,
    cancellation: CancellationToken,
}

impl PipelineTask {
    pub(crate) fn new(id: TaskId, cancellation: CancellationToken) -> Self {
        Self {
            id,
            state: TaskState::Pending,
            cancellation,
        }
    }

    /// Task ID
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Current state
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Whether cancellation has been requested
    pub fn is_cancel_requested(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Move to `next`, rejecting anything outside the transition graph
    pub(crate) fn transition(&mut self, next: TaskState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                id: self.id,
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
