//! Caller-facing task handle and completion bookkeeping

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::context::{ContextKind, ExecutionContextProvider};
use crate::error::{Error, Result};
use crate::reporter::{self, ReportSink};
use crate::types::{CompressionOutcome, Severity, TaskId, TaskState};

/// Callback invoked on the foreground context with the terminal outcome
pub(crate) type CompletionCallback = Box<dyn FnOnce(&CompressionOutcome) + Send + 'static>;

enum CompletionState {
    Pending(Vec<CompletionCallback>),
    Done(CompressionOutcome),
}

/// Outcome slot shared by a task's driver and its handles
///
/// Resolved exactly once. Callbacks registered before resolution are handed
/// back to the driver; callbacks registered afterwards are dispatched by the
/// handle itself, so every callback runs exactly once.
pub(crate) struct Completion {
    state: Mutex<CompletionState>,
}

impl Completion {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CompletionState::Pending(Vec::new())),
        }
    }

    /// Store the outcome and take the callbacks registered so far.
    /// Returns `None` if the slot was already resolved.
    pub(crate) fn resolve(&self, outcome: CompressionOutcome) -> Option<Vec<CompletionCallback>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *state, CompletionState::Done(outcome)) {
            CompletionState::Pending(callbacks) => Some(callbacks),
            done @ CompletionState::Done(_) => {
                *state = done;
                None
            }
        }
    }

    /// Register `callback`, or give it back with the outcome if already resolved
    fn register(
        &self,
        callback: CompletionCallback,
    ) -> Option<(CompletionCallback, CompressionOutcome)> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *state {
            CompletionState::Pending(callbacks) => {
                callbacks.push(callback);
                None
            }
            CompletionState::Done(outcome) => Some((callback, outcome.clone())),
        }
    }

    fn outcome(&self) -> Option<CompressionOutcome> {
        match &*self.state.lock().unwrap_or_else(PoisonError::into_inner) {
            CompletionState::Pending(_) => None,
            CompletionState::Done(outcome) => Some(outcome.clone()),
        }
    }
}

/// Handle to a submitted task (cloneable - all fields are shared)
///
/// Dropping every handle does not cancel the task.
#[derive(Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancellation: CancellationToken,
    state_rx: watch::Receiver<TaskState>,
    completion: Arc<Completion>,
    contexts: Arc<dyn ExecutionContextProvider>,
}

impl TaskHandle {
    pub(crate) fn new(
        id: TaskId,
        cancellation: CancellationToken,
        state_rx: watch::Receiver<TaskState>,
        completion: Arc<Completion>,
        contexts: Arc<dyn ExecutionContextProvider>,
    ) -> Self {
        Self {
            id,
            cancellation,
            state_rx,
            completion,
            contexts,
        }
    }

    /// Task ID
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Request cancellation.
    ///
    /// The flag is checked before compression and before writing. A stage that
    /// is already running finishes; if cancellation is observed after it, its
    /// result is discarded and nothing is written.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Whether cancellation was requested (not whether it was observed)
    pub fn is_cancel_requested(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// The task's cancellation token, e.g. to link it to a parent scope
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Most recent state published by the driver
    pub fn state(&self) -> TaskState {
        *self.state_rx.borrow()
    }

    /// The terminal outcome, once reached
    pub fn outcome(&self) -> Option<CompressionOutcome> {
        self.completion.outcome()
    }

    /// Run `callback` on the foreground context with the terminal outcome.
    ///
    /// If the task already finished, the callback is dispatched right away.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: FnOnce(&CompressionOutcome) + Send + 'static,
    {
        if let Some((callback, outcome)) = self.completion.register(Box::new(callback)) {
            self.contexts.dispatch(
                ContextKind::Foreground,
                Box::new(move || callback(&outcome)),
            );
        }
    }

    /// Like [`TaskHandle::on_complete`], with the outcome already formatted
    /// by [`reporter::format`] and tagged by [`reporter::severity`]
    pub fn on_report<F>(&self, callback: F)
    where
        F: FnOnce(Severity, String) + Send + 'static,
    {
        self.on_complete(move |outcome| {
            callback(reporter::severity(outcome), reporter::format(outcome))
        });
    }

    /// Deliver the formatted outcome to `sink` on the foreground context
    pub fn report_to(&self, sink: Arc<dyn ReportSink>) {
        self.on_report(move |severity, message| sink.report(severity, &message));
    }

    /// Wait for the terminal outcome without blocking the caller's thread.
    ///
    /// Resolves as soon as the outcome is published. Completion callbacks are
    /// dispatched to the foreground context afterwards, so they may not have
    /// run yet when this returns; to wait for a report, send it out of
    /// [`TaskHandle::on_report`] through a `tokio::sync::oneshot` and await
    /// that instead.
    ///
    /// Fails with [`Error::TaskAborted`] only if the driver was dropped before
    /// finishing, e.g. because the host runtime shut down.
    pub async fn join(&self) -> Result<CompressionOutcome> {
        let mut state_rx = self.state_rx.clone();
        // Sender side publishes the terminal state only after resolving the outcome
        let reached = state_rx.wait_for(TaskState::is_terminal).await.is_ok();
        match self.completion.outcome() {
            Some(outcome) => Ok(outcome),
            None => {
                debug_assert!(!reached, "terminal state published before outcome");
                Err(Error::TaskAborted { id: self.id })
            }
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("cancel_requested", &self.is_cancel_requested())
            .finish()
    }
}
