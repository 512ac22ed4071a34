//! Deterministic single-context provider

use futures::future::BoxFuture;

use super::traits::{ContextKind, ExecutionContextProvider, Job, run_job};

/// Runs every job immediately on the calling thread
///
/// `launch` drives the task to completion with
/// [`futures::executor::block_on`], so
/// [`CompressionPipeline::submit`](crate::CompressionPipeline::submit) returns
/// only after the task reached its terminal state and its callbacks ran. No
/// async runtime is required.
///
/// Callbacks running under this provider must not submit further tasks to a
/// pipeline that uses it: `block_on` does not nest.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineContextProvider;

impl ExecutionContextProvider for InlineContextProvider {
    fn dispatch(&self, context: ContextKind, job: Job) {
        run_job(job, context);
    }

    fn launch(&self, driver: BoxFuture<'static, ()>) {
        futures::executor::block_on(driver);
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::run_on;
    use std::sync::{Arc, Mutex};

    #[test]
    fn jobs_run_before_dispatch_returns() {
        let provider = InlineContextProvider;
        let log = Arc::new(Mutex::new(Vec::new()));

        for context in [
            ContextKind::IoBound,
            ContextKind::ComputeBound,
            ContextKind::Foreground,
        ] {
            let log = log.clone();
            provider.dispatch(context, Box::new(move || log.lock().unwrap().push(context)));
        }

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ContextKind::IoBound,
                ContextKind::ComputeBound,
                ContextKind::Foreground
            ]
        );
    }

    #[test]
    fn launch_completes_driver_synchronously() {
        let provider = InlineContextProvider;
        let done = Arc::new(Mutex::new(false));
        let flag = done.clone();

        provider.launch(Box::pin(async move {
            let value = run_on(&InlineContextProvider, ContextKind::ComputeBound, || 21 * 2)
                .await
                .unwrap();
            assert_eq!(value, 42);
            *flag.lock().unwrap() = true;
        }));

        assert!(*done.lock().unwrap());
    }

    #[test]
    fn panicking_job_surfaces_as_dropped_stage() {
        let result = futures::executor::block_on(run_on(
            &InlineContextProvider,
            ContextKind::IoBound,
            || -> u8 { panic!("disk on fire") },
        ));

        assert_eq!(
            result.unwrap_err(),
            crate::context::StageDropped {
                context: ContextKind::IoBound
            }
        );
    }
}
