//! Snappy frame compression.
//!
//! # Coverage
//! - Chunk construction: [`encode_chunk`] — checksum, block-compress, choose
//!   compressed vs. uncompressed storage
//! - One-shot: [`compress_frame`], [`compress_frame_append`]
//! - Incremental: [`FrameEncoder`] — buffers input up to one chunk and emits
//!   complete chunks as they fill
//!
//! Every stream starts with the identifier chunk. Each chunk covers at most
//! `chunk_size` input bytes and is compressed independently; a chunk whose
//! block saves less than 1/8 of its size is stored uncompressed. The
//! checksum always covers the original bytes.

use tracing::{debug, trace};

use crate::block::compress_append;
use crate::config::COMPRESSION_THRESHOLD_SHIFT;
use crate::crc32c::masked_crc32c;
use crate::frame::header::{compress_frame_bound, write_chunk_header};
use crate::frame::types::{
    ChunkType, FrameError, FrameOptions, CHECKSUM_SIZE, CHUNK_TYPE_COMPRESSED,
    CHUNK_TYPE_UNCOMPRESSED, STREAM_HEADER,
};

// ─────────────────────────────────────────────────────────────────────────────
// Chunk construction
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` when a block of `compressed_len` bytes is worth storing in
/// place of `raw_len` raw bytes.
#[inline]
pub fn worth_compressing(compressed_len: usize, raw_len: usize) -> bool {
    compressed_len < raw_len - (raw_len >> COMPRESSION_THRESHOLD_SHIFT)
}

/// Appends one data chunk for `raw` (at most 65536 bytes) to `out`.
///
/// `scratch` is a reusable buffer for the compressed block. Returns the type
/// of chunk written.
pub fn encode_chunk(raw: &[u8], scratch: &mut Vec<u8>, out: &mut Vec<u8>) -> Result<ChunkType, FrameError> {
    let checksum = masked_crc32c(raw);

    scratch.clear();
    compress_append(raw, scratch)?;

    let (chunk_type, body): (u8, &[u8]) = if worth_compressing(scratch.len(), raw.len()) {
        (CHUNK_TYPE_COMPRESSED, &scratch[..])
    } else {
        debug!(raw_len = raw.len(), compressed_len = scratch.len(), "storing chunk uncompressed");
        (CHUNK_TYPE_UNCOMPRESSED, raw)
    };

    write_chunk_header(out, chunk_type, CHECKSUM_SIZE + body.len());
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(body);

    trace!(chunk_type, raw_len = raw.len(), stored_len = body.len(), "encoded chunk");
    Ok(ChunkType::from_byte(chunk_type))
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

/// Compresses `input` as a complete framed stream and appends it to `out`.
///
/// Returns the number of bytes appended.
pub fn compress_frame_append(
    input: &[u8],
    opts: &FrameOptions,
    out: &mut Vec<u8>,
) -> Result<usize, FrameError> {
    opts.validate()?;
    let start = out.len();
    out.reserve(compress_frame_bound(input.len(), opts.chunk_size).min(input.len() + 1024));
    out.extend_from_slice(&STREAM_HEADER);

    let mut scratch = Vec::new();
    for raw in input.chunks(opts.chunk_size) {
        encode_chunk(raw, &mut scratch, out)?;
    }
    Ok(out.len() - start)
}

/// Compresses `input` as a complete framed stream.
pub fn compress_frame(input: &[u8], opts: &FrameOptions) -> Result<Vec<u8>, FrameError> {
    let mut out = Vec::new();
    compress_frame_append(input, opts, &mut out)?;
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameEncoder — incremental compression
// ─────────────────────────────────────────────────────────────────────────────

/// Incremental frame encoder.
///
/// Input handed to [`write`](Self::write) is buffered until a full chunk is
/// available; complete chunks accumulate in an output buffer the caller
/// drains with [`take_output`](Self::take_output) or receives from
/// [`finish`](Self::finish). The identifier chunk is written once, before
/// the first data chunk.
#[derive(Debug)]
pub struct FrameEncoder {
    opts: FrameOptions,
    /// Input not yet forming a complete chunk.
    pending: Vec<u8>,
    /// Encoded bytes not yet taken by the caller.
    out: Vec<u8>,
    scratch: Vec<u8>,
    wrote_identifier: bool,
    total_in: u64,
    total_out: u64,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::with_valid_options(FrameOptions::default())
    }
}

impl FrameEncoder {
    pub fn new(opts: FrameOptions) -> Result<Self, FrameError> {
        opts.validate()?;
        Ok(Self::with_valid_options(opts))
    }

    fn with_valid_options(opts: FrameOptions) -> Self {
        FrameEncoder {
            pending: Vec::with_capacity(opts.chunk_size),
            opts,
            out: Vec::new(),
            scratch: Vec::new(),
            wrote_identifier: false,
            total_in: 0,
            total_out: 0,
        }
    }

    pub fn options(&self) -> &FrameOptions {
        &self.opts
    }

    /// Uncompressed bytes accepted so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Framed bytes produced so far, including those not yet taken.
    pub fn total_out(&self) -> u64 {
        self.total_out + self.out.len() as u64
    }

    fn write_identifier(&mut self) {
        if !self.wrote_identifier {
            self.out.extend_from_slice(&STREAM_HEADER);
            self.wrote_identifier = true;
        }
    }

    /// Feeds `data`, emitting every chunk that fills up.
    pub fn write(&mut self, mut data: &[u8]) -> Result<(), FrameError> {
        let chunk_size = self.opts.chunk_size;
        self.total_in += data.len() as u64;

        if !self.pending.is_empty() {
            let take = (chunk_size - self.pending.len()).min(data.len());
            self.pending.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.pending.len() < chunk_size {
                return Ok(());
            }
            self.write_identifier();
            encode_chunk(&self.pending, &mut self.scratch, &mut self.out)?;
            self.pending.clear();
        }

        // Full chunks straight from the caller's buffer, no staging copy.
        while data.len() >= chunk_size {
            self.write_identifier();
            encode_chunk(&data[..chunk_size], &mut self.scratch, &mut self.out)?;
            data = &data[chunk_size..];
        }
        self.pending.extend_from_slice(data);
        Ok(())
    }

    /// Emits any buffered input as a (short) chunk.
    pub fn flush(&mut self) -> Result<(), FrameError> {
        if !self.pending.is_empty() {
            self.write_identifier();
            encode_chunk(&self.pending, &mut self.scratch, &mut self.out)?;
            self.pending.clear();
        }
        Ok(())
    }

    /// Returns the encoded bytes produced since the last call.
    pub fn take_output(&mut self) -> Vec<u8> {
        self.total_out += self.out.len() as u64;
        std::mem::take(&mut self.out)
    }

    /// Flushes and guarantees the identifier is present, leaving the encoder
    /// usable. An encoder that saw no input produces just the identifier.
    pub fn close(&mut self) -> Result<(), FrameError> {
        self.flush()?;
        self.write_identifier();
        Ok(())
    }

    /// Closes the encoder and returns all output not yet taken.
    pub fn finish(mut self) -> Result<Vec<u8>, FrameError> {
        self.close()?;
        Ok(self.out)
    }
}
