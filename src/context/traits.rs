//! Trait and helpers shared by all execution context providers

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tokio::sync::oneshot;

/// A unit of work submitted to a context
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The three logical execution contexts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// Serialized context for host-facing callbacks
    Foreground,
    /// CPU-bound work
    ComputeBound,
    /// Blocking I/O
    IoBound,
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ContextKind::Foreground => "foreground",
            ContextKind::ComputeBound => "compute-bound",
            ContextKind::IoBound => "io-bound",
        };
        f.write_str(label)
    }
}

/// Scheduler capability set used by the pipeline
///
/// Implementations decide where each [`ContextKind`] runs. `dispatch` must
/// not run jobs for [`ContextKind::Foreground`] concurrently with each other.
/// A job that can't be run (e.g. the scheduler is shutting down) may simply be
/// dropped; the pipeline observes that as an aborted stage.
pub trait ExecutionContextProvider: Send + Sync {
    /// Submit `job` to the given context
    fn dispatch(&self, context: ContextKind, job: Job);

    /// Start a task driver future
    fn launch(&self, driver: BoxFuture<'static, ()>);

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// A stage was dropped by its context before producing a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{context} context dropped the stage before it completed")]
pub struct StageDropped {
    /// The context that dropped the work
    pub context: ContextKind,
}

/// Run `work` on `context` and wait for its result without blocking.
///
/// Completion is signalled through a oneshot channel; the caller is suspended,
/// not parked. If the job panics or is discarded, the sender is dropped and
/// [`StageDropped`] is returned.
pub async fn run_on<T, F>(
    contexts: &dyn ExecutionContextProvider,
    context: ContextKind,
    work: F,
) -> Result<T, StageDropped>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    contexts.dispatch(
        context,
        Box::new(move || {
            // Receiver gone means the driver was dropped; nothing to deliver to
            let _ = tx.send(work());
        }),
    );
    rx.await.map_err(|_| StageDropped { context })
}

/// Execute a job, containing any panic so worker loops survive it
pub(crate) fn run_job(job: Job, context: ContextKind) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        tracing::error!(context = %context, panic = %message, "Job panicked");
    }
}
