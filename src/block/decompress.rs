//! Snappy block decompression.
//!
//! # Security boundary
//!
//! This module is the **security-critical decompression path**. Every length
//! and offset read from the input is checked against the bytes remaining in
//! the source, the bytes produced so far, and the declared output length
//! before it is used. Malformed or truncated input returns a [`BlockError`];
//! it never panics and never reads or writes outside the caller's buffers.
//!
//! The decoder is bit-exact with the block format: it accepts every literal
//! length form and all three copy encodings, including copy-4 and copy
//! lengths below [`MIN_MATCH`] that this crate's encoder never produces.
//!
//! [`MIN_MATCH`]: super::types::MIN_MATCH

use super::types::{
    read_varint, BlockError, MAX_EXPANSION_RATIO, TAG_COPY_1, TAG_COPY_2, TAG_KIND_MASK,
    TAG_LITERAL,
};

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the uncompressed length declared by the block header.
///
/// Only the varint prefix is read; the body is not validated.
pub fn decompress_len(input: &[u8]) -> Result<usize, BlockError> {
    read_varint(input).map(|(len, _)| len as usize)
}

/// Reads the header and rejects declared lengths that the remaining input
/// could not expand to. Returns `(declared_len, header_len)`.
fn read_header(input: &[u8]) -> Result<(usize, usize), BlockError> {
    let (len, hdr) = read_varint(input)?;
    let len = len as usize;
    let body = input.len() - hdr;
    if len > body.saturating_mul(MAX_EXPANSION_RATIO) {
        return Err(BlockError::CorruptInput);
    }
    Ok((len, hdr))
}

// ─────────────────────────────────────────────────────────────────────────────
// Element decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Reads `n` (1..=4) little-endian bytes at `pos`.
#[inline(always)]
fn read_le(src: &[u8], pos: usize, n: usize) -> usize {
    let mut b = [0u8; 4];
    b[..n].copy_from_slice(&src[pos..pos + n]);
    u32::from_le_bytes(b) as usize
}

/// Copies `len` bytes starting `offset` bytes back from `d` to `d`.
///
/// Overlapping copies (`offset < len`) repeat the referenced pattern, as the
/// format requires.
#[inline(always)]
fn copy_back(dst: &mut [u8], d: usize, offset: usize, len: usize) -> Result<(), BlockError> {
    if offset == 0 || offset > d {
        return Err(BlockError::InvalidCopyOffset { offset, produced: d });
    }
    if len > dst.len() - d {
        return Err(BlockError::LengthMismatch { expected: dst.len(), actual: d + len });
    }
    let from = d - offset;
    if offset >= len {
        dst.copy_within(from..from + len, d);
    } else {
        for i in 0..len {
            dst[d + i] = dst[from + i];
        }
    }
    Ok(())
}

/// Decodes the elements in `src` into `dst`, which must be exactly the
/// declared length.
fn decode_body(src: &[u8], dst: &mut [u8]) -> Result<(), BlockError> {
    let mut s = 0usize;
    let mut d = 0usize;

    while s < src.len() {
        let tag = src[s];
        s += 1;

        match tag & TAG_KIND_MASK {
            TAG_LITERAL => {
                let mut len = (tag >> 2) as usize;
                if len >= 60 {
                    let extra = len - 59;
                    if extra > src.len() - s {
                        return Err(BlockError::CorruptInput);
                    }
                    len = read_le(src, s, extra);
                    s += extra;
                }
                let len = len.checked_add(1).ok_or(BlockError::CorruptInput)?;
                if len > src.len() - s {
                    return Err(BlockError::CorruptInput);
                }
                if len > dst.len() - d {
                    return Err(BlockError::LengthMismatch { expected: dst.len(), actual: d + len });
                }
                dst[d..d + len].copy_from_slice(&src[s..s + len]);
                s += len;
                d += len;
            }
            TAG_COPY_1 => {
                if s >= src.len() {
                    return Err(BlockError::CorruptInput);
                }
                let len = 4 + ((tag >> 2) & 0x07) as usize;
                let offset = ((tag as usize & 0xe0) << 3) | src[s] as usize;
                s += 1;
                copy_back(dst, d, offset, len)?;
                d += len;
            }
            TAG_COPY_2 => {
                if 2 > src.len() - s {
                    return Err(BlockError::CorruptInput);
                }
                let len = 1 + (tag >> 2) as usize;
                let offset = read_le(src, s, 2);
                s += 2;
                copy_back(dst, d, offset, len)?;
                d += len;
            }
            _ => {
                if 4 > src.len() - s {
                    return Err(BlockError::CorruptInput);
                }
                let len = 1 + (tag >> 2) as usize;
                let offset = read_le(src, s, 4);
                s += 4;
                copy_back(dst, d, offset, len)?;
                d += len;
            }
        }
    }

    if d != dst.len() {
        return Err(BlockError::LengthMismatch { expected: dst.len(), actual: d });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Decompresses one block into a new vector.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, BlockError> {
    let (len, hdr) = read_header(input)?;
    let mut out = vec![0u8; len];
    decode_body(&input[hdr..], &mut out)?;
    Ok(out)
}

/// Decompresses one block into `dst`, returning the number of bytes written.
///
/// Fails with [`BlockError::BufferTooSmall`] when `dst` is shorter than the
/// declared length. On any error the contents of `dst` are unspecified.
pub fn decompress_into(input: &[u8], dst: &mut [u8]) -> Result<usize, BlockError> {
    let (len, hdr) = read_header(input)?;
    if dst.len() < len {
        return Err(BlockError::BufferTooSmall { needed: len, available: dst.len() });
    }
    decode_body(&input[hdr..], &mut dst[..len])?;
    Ok(len)
}

/// Decompresses one block and appends it to `out`.
///
/// On error `out` is restored to its original length.
pub fn decompress_append(input: &[u8], out: &mut Vec<u8>) -> Result<usize, BlockError> {
    let (len, hdr) = read_header(input)?;
    let start = out.len();
    out.resize(start + len, 0);
    match decode_body(&input[hdr..], &mut out[start..]) {
        Ok(()) => Ok(len),
        Err(e) => {
            out.truncate(start);
            Err(e)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder
// ─────────────────────────────────────────────────────────────────────────────

/// Reusable block decoder, the counterpart of
/// [`Encoder`](super::compress::Encoder).
///
/// Holds only an output buffer whose allocation is kept between calls.
#[derive(Debug, Default, Clone)]
pub struct Decoder {
    buf: Vec<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder { buf: Vec::new() }
    }

    /// Decompresses `input` into the decoder's buffer and borrows the result.
    ///
    /// The previous result is overwritten; on error the buffer is left empty.
    pub fn decompress(&mut self, input: &[u8]) -> Result<&[u8], BlockError> {
        self.buf.clear();
        decompress_append(input, &mut self.buf)?;
        Ok(&self.buf)
    }
}
