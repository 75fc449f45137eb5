//! `std::io` integration for the framing format.
//!
//! - [`FrameWriter`] / [`FrameReader`] — adapters around any `Write` / `Read`
//! - [`compress_stream`] / [`decompress_stream`] — copy loops from a reader
//!   to a writer, the streaming counterparts of
//!   [`compress_frame`](crate::frame::compress_frame) and
//!   [`decompress_frame`](crate::frame::decompress_frame)

pub mod reader;
pub mod writer;

use std::io::{self, Read, Write};

use tracing::debug;

use crate::frame::{FrameDecoder, FrameEncoder, FrameError, FrameOptions};

pub use reader::FrameReader;
pub use writer::FrameWriter;

// Buffer size for the copy loops.
const STREAM_BUF_SIZE: usize = 64 * 1024;

/// Reads into `buf`, retrying on `Interrupted`.
fn read_some(src: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match src.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            r => return r,
        }
    }
}

/// Compresses everything readable from `src` as one framed stream on `dst`.
///
/// Returns the number of uncompressed bytes read.
pub fn compress_stream(
    src: &mut impl Read,
    dst: &mut impl Write,
    opts: &FrameOptions,
) -> Result<u64, FrameError> {
    let mut encoder = FrameEncoder::new(*opts)?;
    let mut buf = vec![0u8; STREAM_BUF_SIZE];
    loop {
        let n = read_some(src, &mut buf)?;
        if n == 0 {
            break;
        }
        encoder.write(&buf[..n])?;
        dst.write_all(&encoder.take_output())?;
    }
    let total_in = encoder.total_in();
    dst.write_all(&encoder.finish()?)?;
    dst.flush()?;
    debug!(total_in, "compressed stream");
    Ok(total_in)
}

/// Decompresses a framed stream from `src` onto `dst`.
///
/// Returns the number of decompressed bytes written. Output already written
/// before an error is not retracted.
pub fn decompress_stream(
    src: &mut impl Read,
    dst: &mut impl Write,
    opts: &FrameOptions,
) -> Result<u64, FrameError> {
    let mut decoder = FrameDecoder::with_options(opts);
    let mut buf = vec![0u8; STREAM_BUF_SIZE];
    let mut out = Vec::new();
    loop {
        let n = read_some(src, &mut buf)?;
        if n == 0 {
            break;
        }
        out.clear();
        decoder.decode(&buf[..n], &mut out)?;
        dst.write_all(&out)?;
    }
    decoder.finish()?;
    dst.flush()?;
    debug!(total_out = decoder.total_out(), "decompressed stream");
    Ok(decoder.total_out())
}
