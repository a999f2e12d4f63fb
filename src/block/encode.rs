//! Token serialisation.
//!
//! A sequence is written as:
//!
//! ```text
//! token | [literal length ext] | literals | [offset_le16 | [match length ext]]
//! ```
//!
//! High nibble of the token = `min(literal_len, 15)`, low nibble =
//! `min(match_extra, 15)`, where `match_extra` is the match length beyond
//! [`MINMATCH`](super::types::MINMATCH).  A nibble of 15 is followed by the
//! remainder in base 255: zero or more `255` bytes and one terminator `< 255`.
//! The terminal sequence carries literals only: its low nibble is 0 and no
//! offset follows.

use std::io::{self, Write};

use super::compress::Lz4Error;
use super::types::{ML_BITS, ML_MASK, RUN_MASK};

// ─────────────────────────────────────────────────────────────────────────────
// Sink abstraction
// ─────────────────────────────────────────────────────────────────────────────

/// Destination of encoded bytes.
pub trait TokenSink {
    type Error;

    fn put_byte(&mut self, byte: u8) -> Result<(), Self::Error>;
    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Writes into a caller-supplied slice, failing once it is full.
pub struct SliceSink<'a> {
    dst: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(dst: &'a mut [u8]) -> Self {
        Self { dst, pos: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize {
        self.pos
    }
}

impl TokenSink for SliceSink<'_> {
    type Error = Lz4Error;

    #[inline]
    fn put_byte(&mut self, byte: u8) -> Result<(), Lz4Error> {
        let slot = self.dst.get_mut(self.pos).ok_or(Lz4Error::OutputTooSmall)?;
        *slot = byte;
        self.pos += 1;
        Ok(())
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), Lz4Error> {
        let end = self.pos + bytes.len();
        if end > self.dst.len() {
            return Err(Lz4Error::OutputTooSmall);
        }
        self.dst[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// Adapts any [`Write`] into a [`TokenSink`].
pub struct StreamSink<W> {
    inner: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> TokenSink for StreamSink<W> {
    type Error = io::Error;

    #[inline]
    fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte])
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequence encoding
// ─────────────────────────────────────────────────────────────────────────────

/// The match half of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackReference {
    /// Distance behind the current output position, `1..=65535`.
    pub offset: u16,
    /// Match length minus `MINMATCH`.
    pub extra_len: usize,
}

/// Write the base-255 continuation of a length whose nibble saturated.
#[inline]
pub fn write_length_ext<S: TokenSink>(sink: &mut S, mut remainder: usize) -> Result<(), S::Error> {
    while remainder > 254 {
        sink.put_byte(255)?;
        remainder -= 255;
    }
    sink.put_byte(remainder as u8)
}

/// Emit one sequence.  `literals` are concatenated in order; the streaming
/// encoder may hold a run in two pieces.  `None` for `back_ref` writes the
/// terminal literal-only sequence.
pub fn write_sequence<S: TokenSink>(
    sink: &mut S,
    literals: [&[u8]; 2],
    back_ref: Option<BackReference>,
) -> Result<(), S::Error> {
    let literal_len = literals[0].len() + literals[1].len();
    let run_code = literal_len.min(RUN_MASK as usize) as u8;
    let match_code = back_ref.map_or(0, |m| m.extra_len.min(ML_MASK as usize)) as u8;

    sink.put_byte((run_code << ML_BITS) | match_code)?;
    if literal_len >= RUN_MASK as usize {
        write_length_ext(sink, literal_len - RUN_MASK as usize)?;
    }
    sink.put_slice(literals[0])?;
    sink.put_slice(literals[1])?;

    if let Some(m) = back_ref {
        sink.put_slice(&m.offset.to_le_bytes())?;
        if m.extra_len >= ML_MASK as usize {
            write_length_ext(sink, m.extra_len - ML_MASK as usize)?;
        }
    }
    Ok(())
}
