//! Compression pipeline split into focused submodules:
//! - [`request`] - Immutable compression requests
//! - [`task`] - Per-task state machine
//! - [`handle`] - Caller-facing handle (cancel, callbacks, join)
//! - `driver` - The stage sequence run for every task

mod driver;
pub mod handle;
pub mod request;
pub mod task;


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::codec::{Codec, ZstdCodec};
use crate::config::Config;
use crate::context::ExecutionContextProvider;
use crate::error::Result;
use crate::types::{Event, TaskId, TaskState};

use driver::{TaskContext, run_task};
use handle::Completion;

pub use handle::TaskHandle;
pub use request::CompressionRequest;
pub use task::PipelineTask;

/// Orchestrates compression tasks (cloneable - all fields are Arc-wrapped)
///
/// Constructed with an injected [`ExecutionContextProvider`] and [`Codec`];
/// there is no global instance. Tasks are independent: the pipeline performs
/// no deduplication or locking across tasks, even for the same target path.
#[derive(Clone)]
pub struct CompressionPipeline {
    contexts: Arc<dyn ExecutionContextProvider>,
    codec: Arc<dyn Codec>,
    config: Arc<Config>,
    event_tx: broadcast::Sender<Event>,
    next_id: Arc<AtomicU64>,
}

impl CompressionPipeline {
    /// Create a pipeline with an explicit codec
    pub fn new(
        contexts: Arc<dyn ExecutionContextProvider>,
        codec: Arc<dyn Codec>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;

        // Buffer events so multiple subscribers can receive them independently
        let (event_tx, _rx) = broadcast::channel(config.events.channel_capacity);

        tracing::debug!(
            contexts = contexts.name(),
            codec = codec.name(),
            "Created compression pipeline"
        );

        Ok(Self {
            contexts,
            codec,
            config: Arc::new(config),
            event_tx,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Create a pipeline using [`ZstdCodec`]
    pub fn with_zstd(contexts: Arc<dyn ExecutionContextProvider>, config: Config) -> Result<Self> {
        Self::new(contexts, Arc::new(ZstdCodec), config)
    }

    /// The configuration this pipeline was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Subscribe to lifecycle events of every task submitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Submit a request with a fresh cancellation token
    ///
    /// Callers that must not overwrite an existing target should call
    /// [`CompressionRequest::ensure_target_writable`] first; the pipeline
    /// performs no existence check.
    pub fn submit(&self, request: CompressionRequest) -> TaskHandle {
        self.submit_with_cancellation(request, CancellationToken::new())
    }

    /// Submit a request observing a caller-supplied cancellation token
    ///
    /// Pass `parent.child_token()` to cancel the task together with a wider
    /// scope, or cancel the token from a timer to impose a deadline.
    pub fn submit_with_cancellation(
        &self,
        request: CompressionRequest,
        cancellation: CancellationToken,
    ) -> TaskHandle {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (state_tx, state_rx) = watch::channel(TaskState::Pending);
        let completion = Arc::new(Completion::new());

        let handle = TaskHandle::new(
            id,
            cancellation.clone(),
            state_rx,
            completion.clone(),
            self.contexts.clone(),
        );

        tracing::info!(
            task_id = id.0,
            source = %request.source().describe(),
            target = %request.target().describe(),
            level = request.level().get(),
            "Submitting compression task"
        );
        self.event_tx
            .send(Event::Submitted {
                id,
                level: request.level(),
            })
            .ok();

        let ctx = TaskContext {
            task: PipelineTask::new(id, cancellation),
            request,
            contexts: self.contexts.clone(),
            codec: self.codec.clone(),
            event_tx: self.event_tx.clone(),
            state_tx,
            completion,
            submitted_at: Instant::now(),
        };
        self.contexts.launch(Box::pin(run_task(ctx)));

        handle
    }
}

impl std::fmt::Debug for CompressionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionPipeline")
            .field("contexts", &self.contexts.name())
            .field("codec", &self.codec.name())
            .finish()
    }
}
