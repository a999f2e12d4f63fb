//! Token-stream compression and decompression.
//!
//! This module contains the codec engine: the fingerprint index, the match
//! finder, the token encoder and decoder, and the windows that let both run
//! over unbounded streams in bounded memory.

pub mod compress;
pub mod decompress_api;
pub mod decompress_core;
pub mod encode;
pub mod types;
pub mod window;

// Re-export the most important public API items at the module level.
pub use compress::{
    compress_bound, compress_into, compress_reusing, compress_to_vec, Lz4Error, MatchFinder,
    LZ4_MAX_INPUT_SIZE,
};
pub use decompress_api::{decompress_into_writer, decompress_to_vec};
pub use decompress_core::DecompressError;
pub use types::{HashIndex, MAX_DISTANCE, MINMATCH};
pub use window::{DecodeWindow, EncodeWindow};
