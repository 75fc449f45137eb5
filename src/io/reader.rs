//! [`FrameReader`]: a [`Read`] adapter that decodes a framed stream.

use std::io::{self, Read};

use crate::config::MAX_CHUNK_SIZE;
use crate::frame::{FrameDecoder, FrameOptions};

/// Size of the compressed-input read buffer.
const READ_BUF_SIZE: usize = 64 * 1024;

/// Decompresses a framed stream read from `R`.
///
/// Decoded bytes are released one verified chunk at a time. Frame errors
/// surface as [`io::Error`]s: a stream cut off inside a chunk reads as
/// [`io::ErrorKind::UnexpectedEof`], every other violation as
/// [`io::ErrorKind::InvalidData`].
pub struct FrameReader<R: Read> {
    inner: R,
    decoder: FrameDecoder,
    buf: Box<[u8]>,
    /// Decoded bytes, `out[pos..]` not yet returned.
    out: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, &FrameOptions::default())
    }

    /// Only `opts.verify_checksums` applies to reading.
    pub fn with_options(inner: R, opts: &FrameOptions) -> Self {
        FrameReader {
            inner,
            decoder: FrameDecoder::with_options(opts),
            buf: vec![0u8; READ_BUF_SIZE].into_boxed_slice(),
            out: Vec::with_capacity(MAX_CHUNK_SIZE),
            pos: 0,
            eof: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Refills `out` from the inner reader. Returns `false` at clean end of
    /// stream.
    fn fill(&mut self) -> io::Result<bool> {
        self.out.clear();
        self.pos = 0;
        while self.out.is_empty() {
            if self.eof {
                return Ok(false);
            }
            let n = match self.inner.read(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if n == 0 {
                self.decoder.finish()?;
                self.eof = true;
            } else {
                self.decoder.decode(&self.buf[..n], &mut self.out)?;
            }
        }
        Ok(true)
    }
}

impl<R: Read> Read for FrameReader<R> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }
        if self.pos == self.out.len() && !self.fill()? {
            return Ok(0);
        }
        let n = dst.len().min(self.out.len() - self.pos);
        dst[..n].copy_from_slice(&self.out[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
