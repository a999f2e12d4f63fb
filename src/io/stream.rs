//! Streaming compression and decompression sessions.
//!
//! Synchronous entry points run a whole session on the calling thread:
//!
//! - [`compress_to`]: [`ByteSource`] → token stream → [`Write`]
//! - [`decompress_to`]: [`ByteSource`] → decoded bytes → [`Write`]
//!
//! The background adapters run the same sessions on a dedicated thread and
//! hand the output over a bounded [`pipe`], so the caller simply reads:
//!
//! - [`encode_stream`]: plain reader in, compressed [`PipeReader`] out
//! - [`decode_stream`]: compressed reader in, plain [`PipeReader`] out
//!
//! Each session owns its index and window; nothing is shared with the
//! consumer except the channel.

use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::thread;

use log::{debug, warn};

use super::pipe::{pipe, PipeReader, PipeWriter};
use super::source::ByteSource;
use crate::block::compress::MatchFinder;
use crate::block::decompress_core::{decode_tokens, DecompressError};
use crate::block::encode::StreamSink;
use crate::block::window::{DecodeWindow, EncodeWindow};
use crate::config::PipeConfig;

// ---------------------------------------------------------------------------
// Synchronous sessions
// ---------------------------------------------------------------------------

/// Counts bytes passed through to the inner writer.
struct Counted<W> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for Counted<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Compress everything `source` yields into `sink`.  Returns the number of
/// compressed bytes written.  Tokens are batched before they reach `sink`,
/// which is flushed once, after the terminal sequence.
pub fn compress_to<S: ByteSource, W: Write>(source: S, sink: W) -> io::Result<u64> {
    let mut window = EncodeWindow::new(source);
    let mut sink = StreamSink::new(BufWriter::new(Counted { inner: sink, count: 0 }));
    MatchFinder::new().run(&mut window, &mut sink)?;
    sink.flush()?;
    let written = sink.into_inner().get_ref().count;
    debug!("encoder finished: {written} bytes written");
    Ok(written)
}

/// Decompress the token stream in `source` into `sink`.  Returns the number
/// of decoded bytes.
pub fn decompress_to<S: ByteSource, W: Write>(mut source: S, sink: W) -> Result<u64, DecompressError> {
    decode_tokens(&mut source, DecodeWindow::new(sink))
}

// ---------------------------------------------------------------------------
// Background adapters
// ---------------------------------------------------------------------------

fn finish_producer(role: &str, writer: PipeWriter, result: io::Result<u64>) {
    match result {
        Ok(n) => {
            if let Err(e) = writer.close() {
                debug!("{role}: consumer gone after {n} bytes: {e}");
            }
        }
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("{role}: stopped on broken pipe: {e}");
            writer.close_with_error(e);
        }
        Err(e) => {
            warn!("{role}: aborted: {e}");
            writer.close_with_error(e);
        }
    }
}

/// Compress `reader` on a background thread; read the token stream from the
/// returned pipe.
pub fn encode_stream<R: Read + Send + 'static>(reader: R) -> io::Result<PipeReader> {
    encode_stream_with_config(reader, &PipeConfig::default())
}

pub fn encode_stream_with_config<R: Read + Send + 'static>(
    reader: R,
    config: &PipeConfig,
) -> io::Result<PipeReader> {
    let (mut writer, pipe_reader) = pipe(config);
    thread::Builder::new()
        .name("lz4pipe-encode".into())
        .spawn(move || {
            debug!("encoder started");
            let result = compress_to(BufReader::new(reader), &mut writer);
            finish_producer("encoder", writer, result);
        })?;
    Ok(pipe_reader)
}

/// Decompress `reader` on a background thread; read the decoded bytes from
/// the returned pipe.  A malformed or truncated stream surfaces as an
/// `InvalidData` error from the pipe.
pub fn decode_stream<R: Read + Send + 'static>(reader: R) -> io::Result<PipeReader> {
    decode_stream_with_config(reader, &PipeConfig::default())
}

pub fn decode_stream_with_config<R: Read + Send + 'static>(
    reader: R,
    config: &PipeConfig,
) -> io::Result<PipeReader> {
    let (mut writer, pipe_reader) = pipe(config);
    thread::Builder::new()
        .name("lz4pipe-decode".into())
        .spawn(move || {
            debug!("decoder started");
            let result = decompress_to(BufReader::new(reader), &mut writer).map_err(io::Error::from);
            finish_producer("decoder", writer, result);
        })?;
    Ok(pipe_reader)
}
