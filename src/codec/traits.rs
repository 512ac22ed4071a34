//! Trait for the compression collaborator

use crate::error::CodecError;
use crate::types::CompressionLevel;

/// A deterministic block codec
///
/// Implementations must be pure: the same input and level always yield the
/// same output and no state outside the returned buffer is touched. The
/// pipeline calls [`Codec::compress`] from the compute-bound context and never
/// interrupts a call in progress.
///
/// # Examples
///
/// ```
/// use zstd_pipeline::codec::{Codec, ZstdCodec};
/// use zstd_pipeline::CompressionLevel;
///
/// let codec = ZstdCodec;
/// let level = CompressionLevel::new(3).unwrap();
/// let compressed = codec.compress(b"hello hello hello", level).unwrap();
/// assert_eq!(codec.decompress(&compressed).unwrap(), b"hello hello hello");
/// ```
pub trait Codec: Send + Sync {
    /// Compress `input` at `level`
    fn compress(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError>;

    /// Reverse [`Codec::compress`]
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
