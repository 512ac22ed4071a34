//! Source content generators

use std::path::{Path, PathBuf};

/// Mixed-script text with multi-byte UTF-8 sequences
pub const UNICODE_TEXT: &str = "Hello, world! 你好世界！Café au lait.";

/// Repetitive text that compresses well
pub fn compressible_text() -> String {
    "This is a larger string that should be highly compressible. ".repeat(200)
}

/// Bytes with no repetition for zstd to exploit
pub fn noisy_bytes(len: usize) -> Vec<u8> {
    // xorshift keeps the fixture reproducible without a rand dependency
    let mut state: u32 = 0x9E37_79B9;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

/// Write `contents` to `dir/name` and return the path
pub fn write_source(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap_or_else(|e| panic!("write {}: {}", path.display(), e));
    path
}

/// Decode a zstd artifact written by the pipeline
pub fn decode_file(path: &Path) -> Vec<u8> {
    let bytes =
        std::fs::read(path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e));
    zstd::stream::decode_all(bytes.as_slice())
        .unwrap_or_else(|e| panic!("decode {}: {}", path.display(), e))
}
