//! Token decoder.
//!
//! A single forward pass over the token stream.  Every token byte is
//! syntactically valid; what can go wrong is a back-reference reaching
//! before the first produced byte, a length that overflows, or the input
//! ending inside a sequence.  All of these surface as a [`DecompressError`]
//! and never as a short result.
//!
//! End of input is legal in exactly two places: before a token byte, and
//! where the offset of a sequence whose match nibble is 0 would start (the
//! terminal literal-only sequence).

use std::io::{self, Write};

use log::debug;

use super::types::{ML_BITS, ML_MASK, RUN_MASK};
use super::window::DecodeWindow;
use crate::io::source::ByteSource;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by token-stream decompression.
#[derive(Debug, thiserror::Error)]
pub enum DecompressError {
    /// A back-reference offset of 0, or one reaching before the first
    /// decoded byte, or a length that does not fit in `usize`.
    #[error("malformed token stream")]
    MalformedInput,
    /// The input ended inside a sequence.
    #[error("token stream truncated mid-sequence")]
    Truncated,
    /// The byte source or the output sink failed.
    #[error("i/o error during decompression: {0}")]
    Io(#[from] io::Error),
}

impl From<DecompressError> for io::Error {
    fn from(err: DecompressError) -> Self {
        match err {
            DecompressError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field readers
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
fn next_byte<S: ByteSource + ?Sized>(source: &mut S) -> Result<u8, DecompressError> {
    source.read_byte()?.ok_or(DecompressError::Truncated)
}

/// Extend a 4-bit length: a saturated nibble is followed by bytes summed
/// until one below 255.
#[inline]
fn read_length<S: ByteSource + ?Sized>(source: &mut S, nibble: u32, mask: u32) -> Result<usize, DecompressError> {
    let mut len = nibble as usize;
    if nibble == mask {
        loop {
            let b = next_byte(source)?;
            len = len.checked_add(b as usize).ok_or(DecompressError::MalformedInput)?;
            if b != 255 {
                break;
            }
        }
    }
    Ok(len)
}

/// Read the 16-bit offset.  `Ok(None)` is the terminal sequence.
#[inline]
fn read_offset<S: ByteSource + ?Sized>(source: &mut S, code: u8) -> Result<Option<usize>, DecompressError> {
    let lo = match source.read_byte()? {
        Some(b) => b,
        None if (code as u32 & ML_MASK) == 0 => return Ok(None),
        None => return Err(DecompressError::Truncated),
    };
    let hi = next_byte(source)?;
    Ok(Some(u16::from_le_bytes([lo, hi]) as usize))
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder state machine
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Expect a token byte or a clean end of input.
    Token,
    /// Copy the literal run of `code`.
    Literals { code: u8 },
    /// Expect the offset of `code`, or the end of a terminal sequence.
    Offset { code: u8 },
    /// Replay the match of `code` from `offset` bytes back.
    Match { code: u8, offset: usize },
    /// Flush what remains and stop.
    Terminal,
}

/// Decode a whole token stream from `source` into `window`.  Returns the
/// number of bytes produced.
pub fn decode_tokens<S, W>(source: &mut S, mut window: DecodeWindow<W>) -> Result<u64, DecompressError>
where
    S: ByteSource + ?Sized,
    W: Write,
{
    let mut phase = Phase::Token;
    loop {
        phase = match phase {
            Phase::Token => match source.read_byte()? {
                Some(code) => Phase::Literals { code },
                None => Phase::Terminal,
            },
            Phase::Literals { code } => {
                let len = read_length(source, (code >> ML_BITS) as u32, RUN_MASK)?;
                window.copy_literals(source, len)?;
                Phase::Offset { code }
            }
            Phase::Offset { code } => match read_offset(source, code)? {
                Some(offset) => Phase::Match { code, offset },
                None => Phase::Terminal,
            },
            Phase::Match { code, offset } => {
                let extra = read_length(source, code as u32 & ML_MASK, ML_MASK)?;
                window.copy_match(offset, extra)?;
                Phase::Token
            }
            Phase::Terminal => {
                let produced = window.finish()?;
                debug!("decoder finished: {produced} bytes produced");
                return Ok(produced);
            }
        };
    }
}
