//! Chunk header codec, byte-order helpers, chunk parsing, and compress-bound.
//!
//! Covers:
//! - LE read/write helpers (`read_le24`, `read_le32`)
//! - [`write_chunk_header`] / [`read_chunk_header`] — `[type][len:24 LE]`
//! - [`parse_chunk`] — one complete chunk from an in-memory buffer
//! - [`compress_frame_bound`] — worst-case size of a framed stream

use crate::block::max_compress_len;
use crate::frame::types::{
    Chunk, ChunkType, FrameError, CHECKSUM_SIZE, CHUNK_HEADER_SIZE, MAX_CHUNK_LEN,
    STREAM_HEADER, STREAM_IDENTIFIER,
};

// ─────────────────────────────────────────────────────────────────────────────
// Byte-order helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Reads a little-endian 24-bit value from `src` at byte `offset`.
#[inline]
pub fn read_le24(src: &[u8], offset: usize) -> usize {
    src[offset] as usize | (src[offset + 1] as usize) << 8 | (src[offset + 2] as usize) << 16
}

/// Reads a little-endian `u32` from `src` at byte `offset`.
#[inline]
pub fn read_le32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([src[offset], src[offset + 1], src[offset + 2], src[offset + 3]])
}

// ─────────────────────────────────────────────────────────────────────────────
// Chunk header
// ─────────────────────────────────────────────────────────────────────────────

/// Appends a chunk header for a payload of `payload_len` bytes.
///
/// `payload_len` must fit in 24 bits; the frame encoder never builds larger
/// payloads.
#[inline]
pub fn write_chunk_header(out: &mut Vec<u8>, chunk_type: u8, payload_len: usize) {
    debug_assert!(payload_len <= MAX_CHUNK_LEN);
    let len = (payload_len as u32).to_le_bytes();
    out.extend_from_slice(&[chunk_type, len[0], len[1], len[2]]);
}

/// Decodes a 4-byte chunk header into its type and payload length.
///
/// Rejects lengths that exceed the maximum for the chunk type, so that no
/// caller allocates for an impossible payload.
pub fn read_chunk_header(header: &[u8; CHUNK_HEADER_SIZE]) -> Result<(ChunkType, usize), FrameError> {
    let chunk_type = ChunkType::from_byte(header[0]);
    let len = read_le24(header, 1);
    check_payload_len(chunk_type, len)?;
    Ok((chunk_type, len))
}

/// Validates a declared payload length against its chunk type.
fn check_payload_len(chunk_type: ChunkType, len: usize) -> Result<(), FrameError> {
    match chunk_type {
        ChunkType::Compressed | ChunkType::Uncompressed if len < CHECKSUM_SIZE => {
            Err(FrameError::CorruptInput("data chunk shorter than its checksum"))
        }
        ChunkType::StreamIdentifier if len != STREAM_IDENTIFIER.len() => {
            Err(FrameError::CorruptInput("bad stream identifier length"))
        }
        t => match t.max_payload_len() {
            Some(max) if len > max => Err(FrameError::CorruptInput("chunk length exceeds maximum")),
            _ => Ok(()),
        },
    }
}

/// Parses the chunk payload that follows a header.
pub fn chunk_from_payload(chunk_type: ChunkType, payload: &[u8]) -> Result<Chunk<'_>, FrameError> {
    Ok(match chunk_type {
        ChunkType::StreamIdentifier => {
            if payload != STREAM_IDENTIFIER {
                return Err(FrameError::CorruptInput("bad stream identifier"));
            }
            Chunk::Identifier
        }
        ChunkType::Compressed => Chunk::Compressed {
            checksum: read_le32(payload, 0),
            data: &payload[CHECKSUM_SIZE..],
        },
        ChunkType::Uncompressed => Chunk::Uncompressed {
            checksum: read_le32(payload, 0),
            data: &payload[CHECKSUM_SIZE..],
        },
        ChunkType::Padding => Chunk::Padding { len: payload.len() },
        ChunkType::Skippable(b) => Chunk::Skippable { chunk_type: b, data: payload },
        ChunkType::Unskippable(b) => Chunk::Unskippable { chunk_type: b },
    })
}

/// Parses one chunk from the front of `input`.
///
/// Returns `Ok(None)` when `input` is empty, and the chunk plus the number
/// of bytes it occupies otherwise. A header or payload cut short by the end
/// of `input` fails with [`FrameError::TruncatedChunk`]; the declared length
/// is checked against the remaining input before the payload is touched.
pub fn parse_chunk(input: &[u8]) -> Result<Option<(Chunk<'_>, usize)>, FrameError> {
    if input.is_empty() {
        return Ok(None);
    }
    if input.len() < CHUNK_HEADER_SIZE {
        return Err(FrameError::TruncatedChunk);
    }
    let mut header = [0u8; CHUNK_HEADER_SIZE];
    header.copy_from_slice(&input[..CHUNK_HEADER_SIZE]);
    let (chunk_type, len) = read_chunk_header(&header)?;
    if len > input.len() - CHUNK_HEADER_SIZE {
        return Err(FrameError::TruncatedChunk);
    }
    let end = CHUNK_HEADER_SIZE + len;
    let chunk = chunk_from_payload(chunk_type, &input[CHUNK_HEADER_SIZE..end])?;
    Ok(Some((chunk, end)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Bounds
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case framed size of `src_size` bytes split into `chunk_size` chunks.
///
/// Returns 0 for a `chunk_size` of 0.
pub fn compress_frame_bound(src_size: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    let full = src_size / chunk_size;
    let rest = src_size % chunk_size;
    let per_chunk = |n: usize| CHUNK_HEADER_SIZE + CHECKSUM_SIZE + max_compress_len(n).max(n);
    let mut bound = STREAM_HEADER.len() + full * per_chunk(chunk_size);
    if rest > 0 {
        bound += per_chunk(rest);
    }
    bound
}
