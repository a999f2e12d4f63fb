// lz4pipe: streaming LZ4-family codec over a headerless token stream

pub mod config;
pub mod block;
pub mod io;
pub mod cli;

// ── Wire-format constants ─────────────────────────────────────────────────────
pub use block::types::{MAX_DISTANCE, MINMATCH};

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::compress::{compress_bound, compress_into, compress_to_vec, Lz4Error, LZ4_MAX_INPUT_SIZE};
pub use block::decompress_api::decompress_to_vec;
pub use block::decompress_core::DecompressError;
pub use config::PipeConfig;
pub use io::{compress_to, decode_stream, decompress_to, encode_stream, PipeReader};
