//! Codec abstraction
//!
//! The pipeline treats compression as an opaque, deterministic, side-effect
//! free function behind the [`Codec`] trait. [`ZstdCodec`] is the production
//! implementation; tests substitute their own to inject failures or to hold a
//! compression call open.

mod traits;
mod zstd_codec;

pub use traits::Codec;
pub use zstd_codec::ZstdCodec;
