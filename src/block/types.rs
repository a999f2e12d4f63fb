//! Token-format constants, little-endian helpers, and the fingerprint index.
//!
//!   - Common constants (`MINMATCH`, nibble masks, `MAX_DISTANCE`)
//!   - `read_le32` / `hash_sequence` (4-byte fingerprint)
//!   - [`HashIndex`]: last-write-wins table from fingerprint to position

// ─────────────────────────────────────────────────────────────────────────────
// Constants: wire format
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded in a token.
pub const MINMATCH: usize = 4;

pub const ML_BITS: u32 = 4;
pub const ML_MASK: u32 = (1u32 << ML_BITS) - 1;
const RUN_BITS: u32 = 8 - ML_BITS;
pub const RUN_MASK: u32 = (1u32 << RUN_BITS) - 1;

/// Largest back-reference distance representable in the 16-bit offset field.
pub const MAX_DISTANCE: usize = 65_535;

// ─────────────────────────────────────────────────────────────────────────────
// Constants: hash table sizing
// ─────────────────────────────────────────────────────────────────────────────

/// Number of fingerprint bits kept.
pub const HASH_LOG: u32 = 17;
/// Number of slots in a [`HashIndex`].
pub const HASH_TABLE_SIZE: usize = 1 << HASH_LOG;
const HASH_SHIFT: u32 = (MINMATCH as u32 * 8) - HASH_LOG;
/// Knuth's multiplicative constant (golden ratio × 2³²).
pub const HASH_MULTIPLIER: u32 = 2_654_435_761;

// ─────────────────────────────────────────────────────────────────────────────
// Memory helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u32` at `pos`.  Panics if fewer than 4 bytes remain;
/// callers only probe positions they have already made available.
#[inline(always)]
pub fn read_le32(buf: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}

/// Fingerprint of a 4-byte sequence: the top [`HASH_LOG`] bits of
/// `sequence * 2654435761`.
#[inline(always)]
pub fn hash_sequence(sequence: u32) -> usize {
    (sequence.wrapping_mul(HASH_MULTIPLIER) >> HASH_SHIFT) as usize
}

// ─────────────────────────────────────────────────────────────────────────────
// Hash index
// ─────────────────────────────────────────────────────────────────────────────

/// Slot value that no real position can take: every stored position is
/// bounded by `LZ4_MAX_INPUT_SIZE` (block) or the window capacity (stream).
const EMPTY_SLOT: u32 = u32::MAX;

/// Maps a fingerprint to the most recent position at which it was seen.
///
/// No chaining: a collision overwrites the slot.  Positions are relative to
/// whatever buffer the owning session addresses; [`HashIndex::rebase`] keeps
/// them valid when a streaming window slides.
pub struct HashIndex {
    slots: Box<[u32]>,
}

impl HashIndex {
    /// A table with every slot empty.
    pub fn new() -> Self {
        Self {
            slots: vec![EMPTY_SLOT; HASH_TABLE_SIZE].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn lookup(&self, hash: usize) -> Option<usize> {
        match self.slots[hash] {
            EMPTY_SLOT => None,
            pos => Some(pos as usize),
        }
    }

    #[inline(always)]
    pub fn update(&mut self, hash: usize, pos: usize) {
        debug_assert!(pos < EMPTY_SLOT as usize);
        self.slots[hash] = pos as u32;
    }

    /// Put back a value previously returned by [`lookup`](Self::lookup).
    #[inline(always)]
    pub fn restore(&mut self, hash: usize, previous: Option<usize>) {
        match previous {
            Some(pos) => self.update(hash, pos),
            None => self.slots[hash] = EMPTY_SLOT,
        }
    }

    /// Slide every entry down by `shift`: entries below `shift` now refer to
    /// discarded history and are emptied, the rest are translated.
    pub fn rebase(&mut self, shift: usize) {
        if shift == 0 {
            return;
        }
        let shift = shift as u32;
        for slot in self.slots.iter_mut() {
            if *slot == EMPTY_SLOT {
                continue;
            }
            *slot = if *slot < shift { EMPTY_SLOT } else { *slot - shift };
        }
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|&&s| s != EMPTY_SLOT).count()
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}
