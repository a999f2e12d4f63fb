//! Match finder and one-shot block compression.
//!
//! | Item                    | Role                                              |
//! |-------------------------|---------------------------------------------------|
//! | [`MatchFinder`]         | greedy hash-table search, shared by both paths    |
//! | [`SearchWindow`]        | what the finder scans: a slice or a sliding window|
//! | [`compress_bound`]      | worst-case output size                            |
//! | [`compress_into`]       | compress into a caller buffer                     |
//! | [`compress_to_vec`]     | compress into a freshly sized `Vec`               |
//!
//! The finder walks the input with a stride that grows while no match turns
//! up (`step` grows by `1 + step/4` every time the pending literal run
//! outgrows `limit`, and `limit` doubles).  A hit found with a stride above 1
//! may not be the earliest one, so the finder rewinds to one byte past the
//! last probe and rescans at stride 1 before committing the match.

use log::trace;

use super::encode::{write_sequence, BackReference, SliceSink, TokenSink};
use super::types::{hash_sequence, read_le32, HashIndex, MAX_DISTANCE, MINMATCH};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Inputs of this size or larger are rejected by the block API.
pub const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

/// Pending literal run length that first triggers stride growth.
pub const INCOMPRESSIBLE: usize = 128;

/// Upper bound on the search stride; keeps one probe inside the streaming
/// encoder's prefetch margin.
pub const MAX_STEP: usize = 512;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by block compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Lz4Error {
    /// The output buffer is smaller than `compress_bound(input.len())`.
    #[error("output buffer too small")]
    OutputTooSmall,
    /// The input is at least `LZ4_MAX_INPUT_SIZE` bytes.
    #[error("input too large")]
    InputTooLarge,
}

// ─────────────────────────────────────────────────────────────────────────────
// Utility
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for `input_size` bytes, or 0 if the input is
/// too large to compress (`>= LZ4_MAX_INPUT_SIZE`).
///
/// The limit itself already yields 0: it is the first size the block API
/// rejects, so a nonzero bound always means the input is accepted.
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    if input_size >= LZ4_MAX_INPUT_SIZE {
        0
    } else {
        input_size + input_size / 255 + 16
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search window
// ─────────────────────────────────────────────────────────────────────────────

/// The byte range a [`MatchFinder`] addresses.
///
/// Positions handed to and from the finder are indices into [`data`].
///
/// [`data`]: SearchWindow::data
pub trait SearchWindow {
    type Error;

    /// Bytes currently addressable.
    fn data(&self) -> &[u8];

    /// Largest position the window can ever address before compacting.
    fn capacity(&self) -> usize;

    /// Make `data()[..end]` available.  Returns `Ok(false)` when input ends
    /// first; whatever could be read stays available.  `end <= capacity()`.
    fn fill_to(&mut self, end: usize) -> Result<bool, Self::Error>;

    /// Reclaim space ahead of the next probe.  Returns how far all positions
    /// were shifted down; positions below the shift are gone and any literals
    /// in `[anchor, shift)` have been moved aside.
    fn compact(&mut self, anchor: usize, pos: usize) -> usize;

    /// The pending literal run `[anchor, end)`, including anything
    /// previously moved aside by `compact`.
    fn literals(&self, anchor: usize, end: usize) -> [&[u8]; 2];

    /// Length of literals moved aside by `compact` and not yet emitted.
    fn spilled_len(&self) -> usize {
        0
    }

    /// Called once the run returned by [`literals`](Self::literals) is emitted.
    fn literals_emitted(&mut self) {}
}

/// A whole in-memory input: nothing to read, nothing to compact.
pub struct SliceWindow<'a> {
    src: &'a [u8],
}

impl<'a> SliceWindow<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src }
    }
}

impl SearchWindow for SliceWindow<'_> {
    type Error = Lz4Error;

    #[inline]
    fn data(&self) -> &[u8] {
        self.src
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.src.len()
    }

    #[inline]
    fn fill_to(&mut self, end: usize) -> Result<bool, Lz4Error> {
        Ok(end <= self.src.len())
    }

    #[inline]
    fn compact(&mut self, _anchor: usize, _pos: usize) -> usize {
        0
    }

    #[inline]
    fn literals(&self, anchor: usize, end: usize) -> [&[u8]; 2] {
        [&[], &self.src[anchor..end]]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match finder
// ─────────────────────────────────────────────────────────────────────────────

/// Search state between two iterations of the finder loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// Probe the 4 bytes at `pos`.
    Scanning,
    /// A hit at stride > 1: restore the slot and rescan from the byte after
    /// the previous probe.
    Rewinding { hash: usize, candidate: usize },
    /// A confirmed hit at stride 1.
    Matched { candidate: usize },
    /// Fewer than `MINMATCH` bytes left: flush the literal tail.
    Terminal,
}

/// Cursor and table state of one compression session.
pub struct MatchFinder {
    index: HashIndex,
    pos: usize,
    anchor: usize,
    step: usize,
    limit: usize,
}

impl MatchFinder {
    pub fn new() -> Self {
        Self {
            index: HashIndex::new(),
            pos: 0,
            anchor: 0,
            step: 1,
            limit: INCOMPRESSIBLE,
        }
    }

    /// Compress everything `window` yields into `sink`, ending with the
    /// terminal literal-only sequence.
    pub fn run<W, S>(&mut self, window: &mut W, sink: &mut S) -> Result<(), W::Error>
    where
        W: SearchWindow,
        S: TokenSink<Error = W::Error>,
    {
        let mut state = Scan::Scanning;
        loop {
            state = match state {
                Scan::Scanning => self.scan(window)?,
                Scan::Rewinding { hash, candidate } => {
                    trace!("rewind {} bytes at position {}", self.step - 1, self.pos);
                    self.index.update(hash, candidate);
                    self.pos -= self.step - 1;
                    self.step = 1;
                    Scan::Scanning
                }
                Scan::Matched { candidate } => {
                    self.emit_match(window, sink, candidate)?;
                    Scan::Scanning
                }
                Scan::Terminal => {
                    let end = window.data().len();
                    write_sequence(sink, window.literals(self.anchor, end), None)?;
                    window.literals_emitted();
                    self.anchor = end;
                    self.pos = end;
                    return Ok(());
                }
            };
        }
    }

    fn scan<W: SearchWindow>(&mut self, window: &mut W) -> Result<Scan, W::Error> {
        let shift = window.compact(self.anchor, self.pos);
        if shift > 0 {
            self.index.rebase(shift);
            self.pos -= shift;
            self.anchor = self.anchor.saturating_sub(shift);
        }

        if !window.fill_to(self.pos + MINMATCH)? {
            return Ok(Scan::Terminal);
        }

        let data = window.data();
        let sequence = read_le32(data, self.pos);
        let hash = hash_sequence(sequence);
        let candidate = self.index.lookup(hash);
        self.index.update(hash, self.pos);

        let pos = self.pos;
        let hit = candidate
            .filter(|&r| r < pos && pos - r <= MAX_DISTANCE && read_le32(data, r) == sequence);

        Ok(match hit {
            None => {
                let run = pos - self.anchor + window.spilled_len();
                if run > self.limit {
                    self.limit <<= 1;
                    self.step = (self.step + 1 + (self.step >> 2)).min(MAX_STEP);
                }
                self.pos += self.step;
                Scan::Scanning
            }
            Some(r) if self.step > 1 => Scan::Rewinding { hash, candidate: r },
            Some(r) => Scan::Matched { candidate: r },
        })
    }

    fn emit_match<W, S>(&mut self, window: &mut W, sink: &mut S, candidate: usize) -> Result<(), W::Error>
    where
        W: SearchWindow,
        S: TokenSink<Error = W::Error>,
    {
        self.limit = INCOMPRESSIBLE;

        let literal_end = self.pos;
        let offset = (self.pos - candidate) as u16;

        self.pos += MINMATCH;
        let match_start = self.pos;
        let mut reference = candidate + MINMATCH;
        while self.pos < window.capacity()
            && window.fill_to(self.pos + 1)?
            && window.data()[self.pos] == window.data()[reference]
        {
            self.pos += 1;
            reference += 1;
        }

        let back_ref = BackReference {
            offset,
            extra_len: self.pos - match_start,
        };
        write_sequence(sink, window.literals(self.anchor, literal_end), Some(back_ref))?;
        window.literals_emitted();
        self.anchor = self.pos;
        Ok(())
    }
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public: one-shot block API
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src` into `dst`, returning the number of bytes written.
///
/// `dst` must hold at least `compress_bound(src.len())` bytes; the check is
/// made before any work so a short buffer never yields a partial stream.
pub fn compress_into(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    if src.len() >= LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    if dst.len() < compress_bound(src.len()) {
        return Err(Lz4Error::OutputTooSmall);
    }

    let mut window = SliceWindow::new(src);
    let mut sink = SliceSink::new(dst);
    MatchFinder::new().run(&mut window, &mut sink)?;
    Ok(sink.written())
}

/// Compress `src` into a new `Vec` sized by [`compress_bound`].
pub fn compress_to_vec(src: &[u8]) -> Result<Vec<u8>, Lz4Error> {
    if src.len() >= LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    let mut dst = vec![0u8; compress_bound(src.len())];
    let n = compress_into(src, &mut dst)?;
    dst.truncate(n);
    Ok(dst)
}

/// Compress `src` reusing `dst`'s allocation when it is large enough.
pub fn compress_reusing(mut dst: Vec<u8>, src: &[u8]) -> Result<Vec<u8>, Lz4Error> {
    if src.len() >= LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InputTooLarge);
    }
    let bound = compress_bound(src.len());
    if dst.len() < bound {
        dst.resize(bound, 0);
    }
    let n = compress_into(src, &mut dst)?;
    dst.truncate(n);
    Ok(dst)
}
