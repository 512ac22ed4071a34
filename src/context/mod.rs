//! Execution contexts
//!
//! A task hops between three logical contexts:
//!
//! - [`ContextKind::Foreground`]: serialized, safe for UI-facing callbacks
//! - [`ContextKind::ComputeBound`]: CPU-heavy work (the codec call)
//! - [`ContextKind::IoBound`]: blocking file reads and writes
//!
//! The pipeline depends only on the [`ExecutionContextProvider`] trait. Two
//! implementations are provided:
//!
//! - [`TokioContextProvider`]: production scheduler backed by a tokio runtime
//!   and a dedicated compute thread pool
//! - [`InlineContextProvider`]: deterministic provider that runs every job
//!   synchronously on the calling thread

mod inline;
mod runtime;
mod traits;

pub use inline::InlineContextProvider;
pub use runtime::TokioContextProvider;
pub use traits::{ContextKind, ExecutionContextProvider, Job, StageDropped, run_on};
