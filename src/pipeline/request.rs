//! Compression requests

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::storage::{FileSource, FileTarget, SourceReader, TargetWriter};
use crate::types::CompressionLevel;

/// Everything a task needs: where to read, where to write, how hard to compress
///
/// A request is immutable once built and is consumed by
/// [`CompressionPipeline::submit`](crate::CompressionPipeline::submit).
#[derive(Clone)]
pub struct CompressionRequest {
    source: Arc<dyn SourceReader>,
    target: Arc<dyn TargetWriter>,
    level: CompressionLevel,
    overwrite_confirmed: bool,
}

impl CompressionRequest {
    /// Build a request; overwriting an existing target is not confirmed
    pub fn new(
        source: impl SourceReader + 'static,
        target: impl TargetWriter + 'static,
        level: CompressionLevel,
    ) -> Self {
        Self {
            source: Arc::new(source),
            target: Arc::new(target),
            level,
            overwrite_confirmed: false,
        }
    }

    /// Request compressing the file at `source` into the file at `target`
    pub fn for_files(
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        level: CompressionLevel,
    ) -> Self {
        Self::new(FileSource::new(source), FileTarget::new(target), level)
    }

    /// Record whether the user agreed to replace an existing target
    pub fn with_overwrite_confirmed(mut self, confirmed: bool) -> Self {
        self.overwrite_confirmed = confirmed;
        self
    }

    /// Reject the request if the target exists and overwrite was not confirmed.
    ///
    /// This is the caller's pre-submission check; the pipeline itself never
    /// looks at the target before writing. The check and the eventual write
    /// are not atomic, so another writer may still create the target in
    /// between.
    pub fn ensure_target_writable(&self) -> Result<()> {
        if !self.overwrite_confirmed && self.target.exists() {
            return Err(Error::TargetExists {
                path: self
                    .target
                    .path()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(self.target.describe())),
            });
        }
        Ok(())
    }

    /// The source collaborator
    pub fn source(&self) -> &Arc<dyn SourceReader> {
        &self.source
    }

    /// The target collaborator
    pub fn target(&self) -> &Arc<dyn TargetWriter> {
        &self.target
    }

    /// Requested compression level
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Whether overwriting an existing target was confirmed
    pub fn overwrite_confirmed(&self) -> bool {
        self.overwrite_confirmed
    }
}

impl std::fmt::Debug for CompressionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionRequest")
            .field("source", &self.source.describe())
            .field("target", &self.target.describe())
            .field("level", &self.level)
            .field("overwrite_confirmed", &self.overwrite_confirmed)
            .finish()
    }
}
