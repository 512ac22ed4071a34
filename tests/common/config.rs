//! Pipeline builders for integration tests

use std::sync::Arc;
use zstd_pipeline::{CompressionPipeline, Config, InlineContextProvider, TokioContextProvider};

/// Pipeline on the production contexts; must be called inside a Tokio runtime
pub fn tokio_pipeline() -> CompressionPipeline {
    let mut config = Config::default();
    config.contexts.compute_workers = 2;
    config.contexts.compute_thread_name = "test-compute".to_string();
    let contexts = TokioContextProvider::new(&config.contexts)
        .unwrap_or_else(|e| panic!("Failed to create contexts: {}", e));
    CompressionPipeline::with_zstd(Arc::new(contexts), config)
        .unwrap_or_else(|e| panic!("Failed to create pipeline: {}", e))
}

/// Pipeline that runs every task to completion inside `submit`
pub fn inline_pipeline() -> CompressionPipeline {
    CompressionPipeline::with_zstd(Arc::new(InlineContextProvider), Config::default())
        .unwrap_or_else(|e| panic!("Failed to create pipeline: {}", e))
}
