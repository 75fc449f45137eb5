//! [`FrameWriter`]: a [`Write`] adapter that frames and compresses.

use std::io::{self, Write};

use tracing::warn;

use crate::frame::{FrameEncoder, FrameError, FrameOptions};

/// Compresses everything written to it as one framed stream on `W`.
///
/// Chunks are forwarded to the inner writer as soon as they fill.
/// [`flush`](Write::flush) emits a short chunk for any buffered input.
/// Call [`finish`](Self::finish) to end the stream and recover the inner
/// writer; dropping the writer instead finishes it on a best-effort basis and
/// only logs a failure.
pub struct FrameWriter<W: Write> {
    inner: Option<W>,
    encoder: FrameEncoder,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        FrameWriter {
            inner: Some(inner),
            encoder: FrameEncoder::default(),
        }
    }

    pub fn with_options(inner: W, opts: FrameOptions) -> Result<Self, FrameError> {
        Ok(FrameWriter {
            inner: Some(inner),
            encoder: FrameEncoder::new(opts)?,
        })
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    /// Uncompressed bytes accepted so far.
    pub fn total_in(&self) -> u64 {
        self.encoder.total_in()
    }

    fn drain(&mut self) -> io::Result<()> {
        let out = self.encoder.take_output();
        match self.inner.as_mut() {
            Some(w) if !out.is_empty() => w.write_all(&out),
            _ => Ok(()),
        }
    }

    /// Writes the final chunk, flushes, and returns the inner writer.
    pub fn finish(mut self) -> Result<W, FrameError> {
        self.encoder.close()?;
        self.drain()?;
        let mut inner = self.inner.take().ok_or(FrameError::Poisoned)?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for FrameWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.inner.is_none() {
            return Err(FrameError::Poisoned.into());
        }
        self.encoder.write(buf)?;
        self.drain()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()?;
        self.drain()?;
        match self.inner.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for FrameWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_none() {
            return;
        }
        let result = self
            .encoder
            .close()
            .map_err(io::Error::from)
            .and_then(|()| self.drain())
            .and_then(|()| self.inner.as_mut().map_or(Ok(()), |w| w.flush()));
        if let Err(e) = result {
            warn!(error = %e, "failed to finish snappy frame on drop");
        }
    }
}
