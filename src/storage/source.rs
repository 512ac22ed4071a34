//! Source readers

use std::io;
use std::path::{Path, PathBuf};

/// Produces the bytes to compress
///
/// A read either returns the complete content or fails; partial results are
/// never handed to the pipeline.
pub trait SourceReader: Send + Sync {
    /// Read the full source content
    fn read(&self) -> io::Result<Vec<u8>>;

    /// Short description for logs and error messages
    fn describe(&self) -> String {
        "<source>".to_string()
    }
}

impl<F> SourceReader for F
where
    F: Fn() -> io::Result<Vec<u8>> + Send + Sync,
{
    fn read(&self) -> io::Result<Vec<u8>> {
        self()
    }
}

/// Reads a file from disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    require_utf8: bool,
}

impl FileSource {
    /// Read `path` as raw bytes
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            require_utf8: false,
        }
    }

    /// Reject content that is not valid UTF-8 with [`io::ErrorKind::InvalidData`]
    ///
    /// Hosts that only offer compression for text documents use this to turn
    /// an encoding problem into a read failure.
    pub fn require_utf8(mut self, require: bool) -> Self {
        self.require_utf8 = require;
        self
    }

    /// The file being read
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceReader for FileSource {
    fn read(&self) -> io::Result<Vec<u8>> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("failed to read '{}': {}", self.path.display(), e),
            )
        })?;

        if self.require_utf8
            && let Err(e) = std::str::from_utf8(&bytes)
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("'{}' is not valid UTF-8: {}", self.path.display(), e),
            ));
        }

        Ok(bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory source, handy for editors that already hold the document text
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Wrap the given bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl SourceReader for MemorySource {
    fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.bytes.len())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_source_reads_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "Hello, world! 你好世界！Café au lait.").unwrap();

        let source = FileSource::new(&path);

        assert_eq!(
            source.read().unwrap(),
            "Hello, world! 你好世界！Café au lait.".as_bytes()
        );
        assert_eq!(source.describe(), path.display().to_string());
    }

    #[test]
    fn missing_file_keeps_not_found_kind_and_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = FileSource::new(&path).read().unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn utf8_requirement_rejects_binary_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.bin");
        std::fs::write(&path, b"\xff\xfe\x00\x80").unwrap();

        assert_eq!(FileSource::new(&path).read().unwrap().len(), 4);

        let err = FileSource::new(&path).require_utf8(true).read().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn closures_are_sources() {
        let source = || -> io::Result<Vec<u8>> { Ok(b"abc".to_vec()) };
        assert_eq!(SourceReader::read(&source).unwrap(), b"abc");
        assert_eq!(source.describe(), "<source>");
    }

    #[test]
    fn memory_source_can_be_read_repeatedly() {
        let source = MemorySource::new("abc");
        assert_eq!(source.read().unwrap(), b"abc");
        assert_eq!(source.read().unwrap(), b"abc");
        assert_eq!(source.describe(), "<memory: 3 bytes>");
    }
}
