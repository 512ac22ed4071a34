//! zstd codec adapter

use super::traits::Codec;
use crate::error::CodecError;
use crate::types::CompressionLevel;

/// [`Codec`] producing standard single-frame zstd output
///
/// Frames carry the content size and are readable by the `zstd` command line
/// tool. Empty input produces a valid (non-empty) frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdCodec;

impl Codec for ZstdCodec {
    fn compress(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
        zstd::bulk::compress(input, level.get())
            .map_err(|e| CodecError::new(self.name(), e.to_string()))
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::stream::decode_all(input)
            .map_err(|e| CodecError::new(self.name(), e.to_string()))
    }

    fn name(&self) -> &'static str {
        "zstd"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn level(raw: i32) -> CompressionLevel {
        CompressionLevel::new(raw).unwrap()
    }

    #[test]
    fn empty_input_produces_a_decodable_frame() {
        let codec = ZstdCodec;
        let compressed = codec.compress(&[], level(3)).unwrap();

        assert!(!compressed.is_empty(), "an empty frame still has a header");
        assert!(codec.decompress(&compressed).unwrap().is_empty());
    }

    #[test]
    fn output_is_deterministic_for_same_level() {
        let codec = ZstdCodec;
        let input = "Hello, Zstd compression!".repeat(40);

        let a = codec.compress(input.as_bytes(), level(10)).unwrap();
        let b = codec.compress(input.as_bytes(), level(10)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn repetitive_input_shrinks_at_every_level_bound() {
        let codec = ZstdCodec;
        let input = "This is a larger string that should be highly compressible. ".repeat(100);

        for raw in [1, 22] {
            let compressed = codec.compress(input.as_bytes(), level(raw)).unwrap();
            assert!(
                compressed.len() < input.len() / 10,
                "level {raw}: {} bytes is not much smaller than {}",
                compressed.len(),
                input.len()
            );
            assert_eq!(codec.decompress(&compressed).unwrap(), input.as_bytes());
        }
    }

    #[test]
    fn garbage_fails_to_decompress_with_codec_name() {
        let err = ZstdCodec.decompress(b"definitely not zstd").unwrap_err();
        assert_eq!(err.codec, "zstd");
        assert!(!err.message.is_empty());
    }
}
