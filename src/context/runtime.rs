//! Production provider backed by a tokio runtime and a compute thread pool

use crossbeam::channel::{Receiver, Sender};
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::traits::{ContextKind, ExecutionContextProvider, Job, run_job};
use crate::config::ContextConfig;
use crate::error::{Error, Result};

/// Production [`ExecutionContextProvider`]
///
/// - Foreground: a single tokio task draining an unbounded queue, so
///   foreground jobs run one at a time in submission order
/// - Compute-bound: `compute_workers` dedicated OS threads fed by a crossbeam
///   channel, keeping codec calls off the tokio worker threads
/// - I/O-bound: tokio's blocking pool via `spawn_blocking`
/// - Task drivers: spawned on the runtime
///
/// Dropping the provider closes both queues; worker threads exit once the
/// jobs already queued have run.
pub struct TokioContextProvider {
    runtime: Handle,
    foreground_tx: mpsc::UnboundedSender<Job>,
    compute_tx: Sender<Job>,
    compute_workers: usize,
}

impl TokioContextProvider {
    /// Create a provider on the runtime the caller is running in
    ///
    /// Fails with [`Error::Runtime`] outside a tokio runtime.
    pub fn new(config: &ContextConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        Self::with_handle(runtime, config)
    }

    /// Create a provider on an explicit runtime handle
    pub fn with_handle(runtime: Handle, config: &ContextConfig) -> Result<Self> {
        if config.compute_workers == 0 {
            return Err(Error::Config {
                message: "at least one compute worker is required".to_string(),
                key: Some("contexts.compute_workers".to_string()),
            });
        }

        let (compute_tx, compute_rx) = crossbeam::channel::unbounded::<Job>();
        for index in 0..config.compute_workers {
            let rx = compute_rx.clone();
            std::thread::Builder::new()
                .name(format!("{}-{}", config.compute_thread_name, index))
                .spawn(move || run_compute_worker(rx))
                .map_err(|e| {
                    Error::Runtime(format!("failed to spawn compute worker {}: {}", index, e))
                })?;
        }

        let (foreground_tx, mut foreground_rx) = mpsc::unbounded_channel::<Job>();
        runtime.spawn(async move {
            while let Some(job) = foreground_rx.recv().await {
                run_job(job, ContextKind::Foreground);
            }
            tracing::debug!("Foreground queue closed");
        });

        tracing::debug!(
            compute_workers = config.compute_workers,
            "Started tokio execution contexts"
        );

        Ok(Self {
            runtime,
            foreground_tx,
            compute_tx,
            compute_workers: config.compute_workers,
        })
    }

    /// Number of compute worker threads
    pub fn compute_workers(&self) -> usize {
        self.compute_workers
    }
}

impl ExecutionContextProvider for TokioContextProvider {
    fn dispatch(&self, context: ContextKind, job: Job) {
        match context {
            ContextKind::Foreground => {
                if self.foreground_tx.send(job).is_err() {
                    tracing::warn!(context = %context, "Foreground queue closed, dropping job");
                }
            }
            ContextKind::ComputeBound => {
                if self.compute_tx.send(job).is_err() {
                    tracing::warn!(context = %context, "Compute pool closed, dropping job");
                }
            }
            ContextKind::IoBound => {
                // JoinHandle is not needed: completion is reported through the job itself
                drop(
                    self.runtime
                        .spawn_blocking(move || run_job(job, ContextKind::IoBound)),
                );
            }
        }
    }

    fn launch(&self, driver: BoxFuture<'static, ()>) {
        drop(self.runtime.spawn(driver));
    }

    fn name(&self) -> &'static str {
        "tokio"
    }
}

/// Compute worker loop; exits when every sender is gone
fn run_compute_worker(rx: Receiver<Job>) {
    while let Ok(job) = rx.recv() {
        run_job(job, ContextKind::ComputeBound);
    }
}
