//! One-shot decompression of an in-memory token stream.
//!
//! The decoder is the same windowed decoder the streaming path runs; here
//! the source is a slice and the sink a `Vec` or any [`Write`].

use std::io::Write;

use super::decompress_core::{decode_tokens, DecompressError};
use super::window::DecodeWindow;

/// Decompress a complete token stream.
pub fn decompress_to_vec(src: &[u8]) -> Result<Vec<u8>, DecompressError> {
    let mut out = Vec::with_capacity(src.len().saturating_mul(2));
    decompress_into_writer(src, &mut out)?;
    Ok(out)
}

/// Decompress a complete token stream into `sink`, returning the number of
/// bytes written.  On error `sink` may have received a prefix of the output.
pub fn decompress_into_writer<W: Write>(src: &[u8], sink: W) -> Result<u64, DecompressError> {
    let mut input = src;
    decode_tokens(&mut input, DecodeWindow::new(sink))
}
