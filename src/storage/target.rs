//! Target writers

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Persists the compressed artifact
///
/// From the pipeline's point of view a write is all-or-nothing: an `Err`
/// means the task failed, and no partial-write recovery is attempted.
pub trait TargetWriter: Send + Sync {
    /// Persist `bytes`, replacing any previous content
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Whether the target currently exists.
    ///
    /// Only consulted by callers before submission (see
    /// [`CompressionRequest::ensure_target_writable`](crate::CompressionRequest::ensure_target_writable));
    /// the pipeline never checks it.
    fn exists(&self) -> bool;

    /// Short description for logs and error messages
    fn describe(&self) -> String {
        "<target>".to_string()
    }

    /// Filesystem path of the target, if it has one
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// Writes the artifact to a file, creating or truncating it
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    /// Target file at `path`; the parent directory must exist
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TargetWriter for FileTarget {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(&self.path, bytes).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("failed to write '{}': {}", self.path.display(), e),
            )
        })
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// In-memory target; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    contents: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryTarget {
    /// An empty target that does not exist yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The last written bytes, or `None` if nothing was written
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TargetWriter for MemoryTarget {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(bytes.to_vec());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
