//! Task driver: the Read → Compress → Write → Report sequence for one task.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, watch};

use crate::codec::Codec;
use crate::context::{ExecutionContextProvider, run_on};
use crate::types::{CompressionOutcome, Event, FailureKind, Stage, TaskState};

use super::handle::Completion;
use super::request::CompressionRequest;
use super::task::PipelineTask;

/// Everything the driver owns for the lifetime of one task
pub(super) struct TaskContext {
    pub(super) task: PipelineTask,
    pub(super) request: CompressionRequest,
    pub(super) contexts: Arc<dyn ExecutionContextProvider>,
    pub(super) codec: Arc<dyn Codec>,
    pub(super) event_tx: broadcast::Sender<Event>,
    pub(super) state_tx: watch::Sender<TaskState>,
    pub(super) completion: Arc<Completion>,
    pub(super) submitted_at: Instant,
}

impl TaskContext {
    /// Move the task to `next` and publish it
    fn enter(&mut self, next: TaskState) {
        if let Err(e) = self.task.transition(next) {
            tracing::error!(task_id = self.task.id().0, error = %e, "Rejected state transition");
            return;
        }
        self.state_tx.send_replace(next);
        self.event_tx
            .send(Event::StateChanged {
                id: self.task.id(),
                state: next,
            })
            .ok();
    }

    fn cancellation_observed(&self, before: Stage) -> bool {
        if self.task.is_cancel_requested() {
            tracing::warn!(
                task_id = self.task.id().0,
                before = ?before,
                "Cancellation observed, stopping task"
            );
            return true;
        }
        false
    }
}

/// Drive one task to its terminal outcome.
///
/// Phases:
/// 1. Read the source on the I/O context
/// 2. Check cancellation
/// 3. Compress on the compute context
/// 4. Re-check cancellation (compressed bytes are discarded if set)
/// 5. Write the target on the I/O context
/// 6. Publish the outcome and run callbacks on the foreground context
///
/// Never returns an error: every path ends in exactly one outcome.
pub(super) async fn run_task(mut ctx: TaskContext) {
    let outcome = match execute_stages(&mut ctx).await {
        Ok(outcome) | Err(outcome) => outcome,
    };
    finish(ctx, outcome);
}

/// `Err` carries the failure that short-circuited the remaining stages
async fn execute_stages(ctx: &mut TaskContext) -> Result<CompressionOutcome, CompressionOutcome> {
    let id = ctx.task.id();

    // Phase 1: read
    ctx.enter(TaskState::Reading);
    let source = ctx.request.source().clone();
    let original =
        run_stage(ctx, Stage::Read, FailureKind::ReadError, move || source.read()).await?;
    let original_size = original.len() as u64;
    tracing::debug!(task_id = id.0, bytes = original_size, "Source read");

    // Phase 2: cancellation before compute
    if ctx.cancellation_observed(Stage::Compress) {
        return Ok(CompressionOutcome::Cancelled);
    }

    // Phase 3: compress
    ctx.enter(TaskState::Compressing);
    let codec = ctx.codec.clone();
    let level = ctx.request.level();
    let (compressed, elapsed) = run_stage(
        ctx,
        Stage::Compress,
        FailureKind::CompressionError,
        move || {
            let started = Instant::now();
            codec
                .compress(&original, level)
                .map(|bytes| (bytes, started.elapsed()))
        },
    )
    .await?;
    let compressed_size = compressed.len() as u64;
    tracing::debug!(
        task_id = id.0,
        level = level.get(),
        compressed_bytes = compressed_size,
        elapsed_ms = elapsed.as_millis() as u64,
        "Compression performed"
    );

    // Phase 4: cancellation before write
    if ctx.cancellation_observed(Stage::Write) {
        return Ok(CompressionOutcome::Cancelled);
    }

    // Phase 5: write
    ctx.enter(TaskState::Writing);
    let target = ctx.request.target().clone();
    run_stage(ctx, Stage::Write, FailureKind::WriteError, move || {
        target.write(&compressed)
    })
    .await?;

    Ok(CompressionOutcome::Success {
        original_size,
        compressed_size,
    })
}

/// Run `work` on the context `stage` belongs to, folding an error or a
/// dropped job into a failure of `kind`
async fn run_stage<T, E, F>(
    ctx: &TaskContext,
    stage: Stage,
    kind: FailureKind,
    work: F,
) -> Result<T, CompressionOutcome>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let id = ctx.task.id();
    match run_on(ctx.contexts.as_ref(), stage.context(), work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!(task_id = id.0, stage = ?stage, error = %e, "Stage failed");
            Err(CompressionOutcome::failure(kind, e.to_string()))
        }
        Err(dropped) => {
            tracing::error!(task_id = id.0, stage = ?stage, error = %dropped, "Stage dropped");
            Err(CompressionOutcome::failure(kind, dropped.to_string()))
        }
    }
}

/// Phase 6: publish the terminal state and hand callbacks to the foreground
fn finish(mut ctx: TaskContext, outcome: CompressionOutcome) {
    let id = ctx.task.id();
    let elapsed = ctx.submitted_at.elapsed();

    // Resolve before publishing the state so `join` always finds the outcome
    let callbacks = ctx.completion.resolve(outcome.clone()).unwrap_or_default();
    ctx.enter(outcome.terminal_state());

    match &outcome {
        CompressionOutcome::Success {
            original_size,
            compressed_size,
        } => tracing::info!(
            task_id = id.0,
            target = %ctx.request.target().describe(),
            original_size,
            compressed_size,
            elapsed_ms = elapsed.as_millis() as u64,
            "Compression task succeeded"
        ),
        CompressionOutcome::Failure { kind, detail } => tracing::warn!(
            task_id = id.0,
            kind = %kind,
            detail = %detail,
            "Compression task failed"
        ),
        CompressionOutcome::Cancelled => {
            tracing::info!(task_id = id.0, "Compression task cancelled")
        }
    }

    ctx.event_tx
        .send(Event::Finished {
            id,
            outcome: outcome.clone(),
            elapsed_ms: elapsed.as_millis() as u64,
            finished_at: chrono::Utc::now(),
        })
        .ok();

    // One foreground job per callback; a panic in one leaves the rest intact
    tracing::debug!(
        task_id = id.0,
        stage = ?Stage::Report,
        callbacks = callbacks.len(),
        "Reporting outcome"
    );
    for callback in callbacks {
        let outcome = outcome.clone();
        ctx.contexts
            .dispatch(Stage::Report.context(), Box::new(move || callback(&outcome)));
    }
}
