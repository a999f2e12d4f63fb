//! Bounded in-memory byte pipe between one producer and one consumer.
//!
//! The producer writes through [`PipeWriter`], which batches bytes into
//! chunks and sends them over a `crossbeam_channel::bounded` channel; the
//! consumer reads through [`PipeReader`] with ordinary blocking reads.
//!
//! - A full channel blocks the producer; an empty one blocks the consumer.
//! - Dropping the reader makes the producer's next send fail with
//!   `BrokenPipe`.
//! - [`PipeWriter::close_with_error`] delivers an error to the consumer,
//!   which observes it once; later reads report end of stream.
//! - A writer dropped without being closed (a panicking producer, say)
//!   delivers `UnexpectedEof` instead of a clean end of stream.

use std::io::{self, BufRead, ErrorKind, Read, Write};
use std::mem;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::PipeConfig;

type Chunk = io::Result<Vec<u8>>;

/// Create a connected writer / reader pair.
pub fn pipe(config: &PipeConfig) -> (PipeWriter, PipeReader) {
    let (tx, rx) = bounded(config.channel_capacity);
    let chunk_size = config.chunk_size.max(1);
    let writer = PipeWriter {
        tx,
        pending: Vec::with_capacity(chunk_size),
        chunk_size,
        closed: false,
    };
    let reader = PipeReader {
        rx,
        current: Vec::new(),
        offset: 0,
        finished: false,
    };
    (writer, reader)
}

// ---------------------------------------------------------------------------
// Producer end
// ---------------------------------------------------------------------------

/// Producer end of a [`pipe`].
pub struct PipeWriter {
    tx: Sender<Chunk>,
    pending: Vec<u8>,
    chunk_size: usize,
    closed: bool,
}

impl PipeWriter {
    fn send_pending(&mut self) -> io::Result<()> {
        let chunk = mem::replace(&mut self.pending, Vec::with_capacity(self.chunk_size));
        self.tx
            .send(Ok(chunk))
            .map_err(|_| io::Error::new(ErrorKind::BrokenPipe, "pipe reader closed"))
    }

    /// Send any buffered bytes and signal a clean end of stream.
    pub fn close(mut self) -> io::Result<()> {
        self.closed = true;
        if !self.pending.is_empty() {
            self.send_pending()?;
        }
        Ok(())
    }

    /// Send any buffered bytes, then `err`.  Fails silently if the reader is
    /// already gone.
    pub fn close_with_error(mut self, err: io::Error) {
        self.closed = true;
        if !self.pending.is_empty() && self.send_pending().is_err() {
            return;
        }
        let _ = self.tx.send(Err(err));
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let n = buf.len().min(self.chunk_size - self.pending.len());
        self.pending.extend_from_slice(&buf[..n]);
        if self.pending.len() == self.chunk_size {
            self.send_pending()?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.send_pending()
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.tx.send(Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "pipe writer dropped before close",
            )));
        }
    }
}

// ---------------------------------------------------------------------------
// Consumer end
// ---------------------------------------------------------------------------

/// Consumer end of a [`pipe`].
pub struct PipeReader {
    rx: Receiver<Chunk>,
    current: Vec<u8>,
    offset: usize,
    finished: bool,
}

impl BufRead for PipeReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        while self.offset == self.current.len() && !self.finished {
            match self.rx.recv() {
                Ok(Ok(chunk)) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                Ok(Err(err)) => {
                    self.finished = true;
                    self.current.clear();
                    self.offset = 0;
                    return Err(err);
                }
                // Every sender dropped.
                Err(_) => self.finished = true,
            }
        }
        Ok(&self.current[self.offset..])
    }

    fn consume(&mut self, amt: usize) {
        self.offset = (self.offset + amt).min(self.current.len());
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}
