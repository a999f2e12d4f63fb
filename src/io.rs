//! Streaming I/O surface: byte sources, the bounded pipe, and the
//! encode/decode sessions built on them.

pub mod pipe;
pub mod source;
pub mod stream;

// ── Byte source contract ──────────────────────────────────────────────────────
pub use source::ByteSource;

// ── Producer / consumer handoff ───────────────────────────────────────────────
pub use pipe::{pipe, PipeReader, PipeWriter};

// ── Synchronous sessions ──────────────────────────────────────────────────────
/// Compress a byte source into a writer on the calling thread.
pub use stream::compress_to;

/// Decompress a token stream into a writer on the calling thread.
pub use stream::decompress_to;

// ── Background sessions ───────────────────────────────────────────────────────
pub use stream::{decode_stream, decode_stream_with_config, encode_stream, encode_stream_with_config};
