//! Source and target collaborators
//!
//! The pipeline reads through a [`SourceReader`] and persists through a
//! [`TargetWriter`]. Both are synchronous: they run on the I/O-bound
//! execution context, never on the foreground.

mod source;
mod target;

pub use source::{FileSource, MemorySource, SourceReader};
pub use target::{FileTarget, MemoryTarget, TargetWriter};

use std::path::{Path, PathBuf};

/// Sibling path of `source` with `extension` appended to its file name.
///
/// `notes.txt` with extension `zst` becomes `notes.txt.zst`. Returns `None`
/// when `source` has no file name (e.g. `/` or `..`).
pub fn default_target_path(source: &Path, extension: &str) -> Option<PathBuf> {
    let mut file_name = source.file_name()?.to_os_string();
    file_name.push(".");
    file_name.push(extension);
    Some(source.with_file_name(file_name))
}
