//! Fixed-capacity windows for streaming compression and decompression.
//!
//! Both windows hold a contiguous slice of stream positions and double as
//! lookback history and staging area.  Neither is ever reallocated; they are
//! compacted in place immediately before an operation that would overflow.
//!
//! - [`EncodeWindow`]: bytes read from the source but not yet encoded.  Once
//!   the read-ahead mark passes `BUFFER_SIZE - PREFETCH_SIZE`, everything
//!   before the pending literal run is discarded and the run slides to 0.
//! - [`DecodeWindow`]: decoded bytes not yet written to the sink.  When the
//!   next copy would overflow, everything more than `FLUSH_WINDOW` bytes
//!   behind the reference cursor is written out and the tail slides down.

use std::io::{self, Write};

use log::debug;

use super::compress::SearchWindow;
use super::decompress_core::DecompressError;
use super::types::MINMATCH;
use crate::config::{BUFFER_SIZE, FLUSH_WINDOW, PREFETCH_SIZE, SPILL_KEEP};
use crate::io::source::ByteSource;

// ─────────────────────────────────────────────────────────────────────────────
// Encoder side
// ─────────────────────────────────────────────────────────────────────────────

/// Sliding read-ahead window over a [`ByteSource`].
pub struct EncodeWindow<S> {
    source: S,
    buf: Box<[u8]>,
    /// High-water mark: `buf[..cached]` holds bytes read from `source`.
    cached: usize,
    /// Head of a literal run too long to stay inside the window.
    spilled: Vec<u8>,
    exhausted: bool,
}

impl<S: ByteSource> EncodeWindow<S> {
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, BUFFER_SIZE)
    }

    pub(crate) fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            buf: vec![0u8; capacity].into_boxed_slice(),
            cached: 0,
            spilled: Vec::new(),
            exhausted: false,
        }
    }

    pub fn cached(&self) -> usize {
        self.cached
    }

    fn compaction_threshold(&self) -> usize {
        self.buf.len() - PREFETCH_SIZE
    }
}

impl<S: ByteSource> SearchWindow for EncodeWindow<S> {
    type Error = io::Error;

    #[inline]
    fn data(&self) -> &[u8] {
        &self.buf[..self.cached]
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn fill_to(&mut self, end: usize) -> io::Result<bool> {
        debug_assert!(end <= self.buf.len());
        if end <= self.cached {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        let n = self.source.read_into(&mut self.buf[self.cached..end])?;
        self.cached += n;
        if self.cached < end {
            self.exhausted = true;
            return Ok(false);
        }
        Ok(true)
    }

    fn compact(&mut self, anchor: usize, pos: usize) -> usize {
        let threshold = self.compaction_threshold();
        if self.cached <= threshold {
            return 0;
        }

        let mut shift = anchor;
        if self.cached - shift > threshold {
            // The pending literal run alone fills the window: move its head
            // out, keeping the most recent bytes searchable.
            let keep_from = pos.saturating_sub(SPILL_KEEP).max(anchor);
            self.spilled.extend_from_slice(&self.buf[anchor..keep_from]);
            shift = keep_from;
            debug!(
                "encode window: spilled {} literal bytes ({} pending)",
                keep_from - anchor,
                self.spilled.len()
            );
        }

        self.buf.copy_within(shift..self.cached, 0);
        self.cached -= shift;
        debug!("encode window: compacted by {shift}, {} bytes retained", self.cached);
        shift
    }

    #[inline]
    fn literals(&self, anchor: usize, end: usize) -> [&[u8]; 2] {
        [self.spilled.as_slice(), &self.buf[anchor..end]]
    }

    #[inline]
    fn spilled_len(&self) -> usize {
        self.spilled.len()
    }

    #[inline]
    fn literals_emitted(&mut self) {
        self.spilled.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder side
// ─────────────────────────────────────────────────────────────────────────────

/// Overlap correction for back-references shorter than `MINMATCH`, indexed
/// by offset.  After copying the first 4 bytes one at a time, the reference
/// cursor trails the write cursor by `offset + PERIOD[offset]`, a multiple of
/// the pattern period that is at least 4.
pub const PERIOD: [usize; 4] = [0, 3, 2, 3];

/// Output window of the token decoder, flushing into a [`Write`] sink.
pub struct DecodeWindow<W> {
    sink: W,
    buf: Box<[u8]>,
    /// Next byte to produce.
    pos: usize,
    /// Read cursor of the active back-reference; equals `pos` between matches.
    reference: usize,
    flushed: u64,
}

impl<W: Write> DecodeWindow<W> {
    pub fn new(sink: W) -> Self {
        Self::with_capacity(sink, BUFFER_SIZE)
    }

    pub(crate) fn with_capacity(sink: W, capacity: usize) -> Self {
        debug_assert!(capacity > FLUSH_WINDOW + super::types::MAX_DISTANCE);
        Self {
            sink,
            buf: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            reference: 0,
            flushed: 0,
        }
    }

    /// Total bytes produced so far, flushed or not.
    pub fn produced(&self) -> u64 {
        self.flushed + self.pos as u64
    }

    /// Write out history that no legal back-reference can reach any more.
    fn flush(&mut self) -> io::Result<()> {
        let keep_from = self.reference.saturating_sub(FLUSH_WINDOW);
        if keep_from == 0 {
            return Ok(());
        }
        self.sink.write_all(&self.buf[..keep_from])?;
        self.buf.copy_within(keep_from..self.pos, 0);
        self.pos -= keep_from;
        self.reference -= keep_from;
        self.flushed += keep_from as u64;
        debug!("decode window: flushed {keep_from} bytes, {} retained", self.pos);
        Ok(())
    }

    /// Make room for `len` more bytes if the window can; copies longer than
    /// the free space proceed in chunks.
    #[inline]
    fn reserve(&mut self, len: usize) -> io::Result<()> {
        if self.pos + len > self.buf.len() {
            self.flush()?;
        }
        Ok(())
    }

    /// Copy `len` literal bytes from `source`.
    pub fn copy_literals<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
        mut len: usize,
    ) -> Result<(), DecompressError> {
        self.reference = self.pos;
        while len > 0 {
            self.reserve(len)?;
            let take = len.min(self.buf.len() - self.pos);
            let n = source.read_into(&mut self.buf[self.pos..self.pos + take])?;
            self.pos += n;
            self.reference = self.pos;
            if n < take {
                return Err(DecompressError::Truncated);
            }
            len -= n;
        }
        Ok(())
    }

    /// Replay a back-reference of `offset` bytes; `extra_len` is the encoded
    /// length beyond `MINMATCH`.
    pub fn copy_match(&mut self, offset: usize, extra_len: usize) -> Result<(), DecompressError> {
        if offset == 0 || offset > self.pos {
            return Err(DecompressError::MalformedInput);
        }
        self.reference = self.pos - offset;

        let mut len = extra_len;
        if offset < MINMATCH {
            self.reserve(MINMATCH)?;
            for i in 0..MINMATCH {
                self.buf[self.pos + i] = self.buf[self.reference + i];
            }
            self.pos += MINMATCH;
            self.reference += MINMATCH - PERIOD[offset];
        } else {
            len += MINMATCH;
        }

        while len > 0 {
            self.reserve(len)?;
            let take = len.min(self.buf.len() - self.pos);
            let (src, dst) = (self.reference, self.pos);
            if dst - src >= take {
                self.buf.copy_within(src..src + take, dst);
            } else {
                for i in 0..take {
                    self.buf[dst + i] = self.buf[src + i];
                }
            }
            self.pos += take;
            self.reference += take;
            len -= take;
        }
        self.reference = self.pos;
        Ok(())
    }

    /// Write the unflushed tail and flush the sink.  Returns the total
    /// number of bytes produced.
    pub fn finish(mut self) -> io::Result<u64> {
        self.sink.write_all(&self.buf[..self.pos])?;
        self.sink.flush()?;
        Ok(self.flushed + self.pos as u64)
    }
}
