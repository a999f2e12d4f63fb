//! Byte sources consumed by the streaming encoder and decoder.

use std::io::{self, BufRead, ErrorKind};

/// A sequential byte source with a distinguished end of input.
///
/// `Ok(None)` means the input is exhausted; any `Err` is a genuine failure
/// and is propagated verbatim.
pub trait ByteSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Fill as much of `buf` as the source allows, stopping early only at end
    /// of input.  Returns the number of bytes written.
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        for (n, slot) in buf.iter_mut().enumerate() {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => return Ok(n),
            }
        }
        Ok(buf.len())
    }
}

impl<R: BufRead + ?Sized> ByteSource for R {
    #[inline]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(available) => {
                    let b = available[0];
                    self.consume(1);
                    return Ok(Some(b));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let available = match self.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }
            let n = available.len().min(buf.len() - filled);
            buf[filled..filled + n].copy_from_slice(&available[..n]);
            self.consume(n);
            filled += n;
        }
        Ok(filled)
    }
}
