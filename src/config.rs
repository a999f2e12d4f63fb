// config.rs: window sizing constants and pipe configuration.
//
// The window sizes are fixed: the token stream carries no header, so encoder
// and decoder must agree on nothing but the 16-bit offset range, and neither
// side exposes its buffer size as a knob.  Only the handoff channel between a
// background producer and its consumer is tunable.

pub const KB: usize = 1 << 10;

// Capacity of the streaming encode/decode window.
pub const BUFFER_SIZE: usize = 128 * KB;

// Encoder compacts once the read-ahead high-water mark passes
// BUFFER_SIZE - PREFETCH_SIZE.  Must exceed the largest scan stride plus the
// 4-byte probe (see `block::compress::MAX_STEP`).
pub const PREFETCH_SIZE: usize = 1024;

// Lookback the decoder keeps behind its reference cursor across a flush.
pub const FLUSH_WINDOW: usize = 64 * KB;

// When a pending literal run fills the encoder window, literals older than
// this many bytes behind the scan cursor are spilled out of the window.
pub const SPILL_KEEP: usize = 32 * KB;

// Number of chunks the handoff channel buffers before the producer blocks.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

// Size of one chunk handed from producer to consumer.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * KB;

/// Tuning for the background producer / consumer handoff.
///
/// Memory held by a pipe is bounded by roughly
/// `(channel_capacity + 2) * chunk_size`, independent of the input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeConfig {
    /// Chunks buffered in the channel.  `0` makes every handoff a rendezvous.
    pub channel_capacity: usize,
    /// Bytes accumulated by the producer before a chunk is sent.
    pub chunk_size: usize,
}

impl PipeConfig {
    pub const fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_channel_capacity(mut self, chunks: usize) -> Self {
        self.channel_capacity = chunks;
        self
    }

    /// Set the chunk size; values below 1 are clamped to 1.
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self::new()
    }
}
