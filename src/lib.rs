//! # zstd-pipeline
//!
//! Asynchronous, cancellable compression tasks for interactive hosts.
//!
//! A task reads a source, compresses it with zstd, writes the artifact and
//! reports exactly one structured outcome. Each stage runs on its own
//! execution context so the host's foreground stays responsive:
//!
//! | Stage    | Context                                   |
//! |----------|-------------------------------------------|
//! | Read     | [`ContextKind::IoBound`]                  |
//! | Compress | [`ContextKind::ComputeBound`]             |
//! | Write    | [`ContextKind::IoBound`]                  |
//! | Report   | [`ContextKind::Foreground`]               |
//!
//! ## Design Philosophy
//!
//! - **Injected, not global** - the pipeline is a value built from an
//!   [`ExecutionContextProvider`] and a [`Codec`](codec::Codec)
//! - **Cooperative cancellation** - checked before compressing and before
//!   writing, never preempting a running stage
//! - **No errors across the async boundary** - every task ends in one
//!   [`CompressionOutcome`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use zstd_pipeline::{
//!     CompressionLevel, CompressionPipeline, CompressionRequest, Config, TokioContextProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let contexts = Arc::new(TokioContextProvider::new(&config.contexts)?);
//!     let pipeline = CompressionPipeline::with_zstd(contexts, config)?;
//!
//!     let request = CompressionRequest::for_files(
//!         "notes.txt",
//!         "notes.txt.zst",
//!         CompressionLevel::new(3)?,
//!     );
//!     request.ensure_target_writable()?;
//!
//!     let handle = pipeline.submit(request);
//!     handle.on_report(|severity, message| println!("[{severity:?}] {message}"));
//!     let outcome = handle.join().await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Codec abstraction and the zstd adapter
pub mod codec;
/// Configuration types
pub mod config;
/// Execution context providers
pub mod context;
/// Error types
pub mod error;
/// Compression task pipeline
pub mod pipeline;
/// Outcome formatting for host notifications
pub mod reporter;
/// Source and target collaborators
pub mod storage;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use codec::{Codec, ZstdCodec};
pub use config::{CompressionConfig, Config, ContextConfig, EventConfig};
pub use context::{
    ContextKind, ExecutionContextProvider, InlineContextProvider, TokioContextProvider,
};
pub use error::{CodecError, Error, Result};
pub use pipeline::{CompressionPipeline, CompressionRequest, PipelineTask, TaskHandle};
pub use reporter::{ReportSink, TracingReportSink};
pub use storage::{
    FileSource, FileTarget, MemorySource, MemoryTarget, SourceReader, TargetWriter,
    default_target_path,
};
pub use types::{
    CompressionLevel, CompressionOutcome, Event, FailureKind, Severity, Stage, TaskId, TaskState,
};
