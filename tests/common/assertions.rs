//! Custom test assertions for integration tests

use std::time::Duration;
use zstd_pipeline::{CompressionOutcome, TaskHandle};

/// Join a task, failing the test if it does not finish within `timeout`
pub async fn join_within(handle: &TaskHandle, timeout: Duration) -> CompressionOutcome {
    match tokio::time::timeout(timeout, handle.join()).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => panic!("task {} aborted: {}", handle.id(), e),
        Err(_) => panic!("task {} did not finish within {:?}", handle.id(), timeout),
    }
}

/// Assert a success outcome and return `(original_size, compressed_size)`
pub fn assert_success(outcome: &CompressionOutcome) -> (u64, u64) {
    match outcome {
        CompressionOutcome::Success {
            original_size,
            compressed_size,
        } => (*original_size, *compressed_size),
        other => panic!("expected success, got {:?}", other),
    }
}
