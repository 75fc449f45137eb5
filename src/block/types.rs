//! Snappy block constants, error type, varint codec, and hash helpers.
//!
//! Covers the parts of the block format shared by the encoder and decoder:
//!   - Element tag constants and bit layout
//!   - The little-endian base-128 varint that prefixes every block
//!   - [`BlockError`]
//!   - Hash-table sizing and the 4-byte fingerprint hash used by the encoder

use thiserror::Error;

use crate::config::{MAX_BLOCK_SIZE, MAX_HASH_TABLE_BITS, MIN_HASH_TABLE_BITS};

// ─────────────────────────────────────────────────────────────────────────────
// Element tags
//
// The low two bits of every tag byte select the element kind; the upper six
// bits carry a length (literal, copy-2, copy-4) or length + offset high bits
// (copy-1).
// ─────────────────────────────────────────────────────────────────────────────

/// Literal run. Upper 6 bits are `len - 1` when `len <= 60`; values 60..=63
/// say that 1..=4 little-endian length bytes follow.
pub const TAG_LITERAL: u8 = 0x00;
/// Copy with an 11-bit offset and a length in 4..=11.
pub const TAG_COPY_1: u8 = 0x01;
/// Copy with a 16-bit little-endian offset and a length in 1..=64.
pub const TAG_COPY_2: u8 = 0x02;
/// Copy with a 32-bit little-endian offset and a length in 1..=64.
pub const TAG_COPY_4: u8 = 0x03;

/// Mask selecting the element kind from a tag byte.
pub const TAG_KIND_MASK: u8 = 0x03;

/// Longest literal whose length fits inline in the tag byte.
pub const MAX_INLINE_LITERAL: usize = 60;

/// Shortest match the encoder will turn into a copy.
pub const MIN_MATCH: usize = 4;

/// Longest length a single copy element can carry.
pub const MAX_COPY_LEN: usize = 64;

/// Copy-1 carries lengths in `MIN_MATCH..COPY_1_MAX_LEN`.
pub const COPY_1_MAX_LEN: usize = 12;

/// Copy-1 offsets must be below this value (11 bits).
pub const COPY_1_MAX_OFFSET: usize = 1 << 11;

/// Copy-2 offsets must be below this value (16 bits).
pub const COPY_2_MAX_OFFSET: usize = 1 << 16;

/// Encoded varint lengths are at most 5 bytes since lengths fit in a `u32`.
pub const MAX_VARINT_LEN: usize = 5;

/// Largest input a single block can describe.
pub const MAX_INPUT_SIZE: usize = u32::MAX as usize;

/// Upper bound on decoded bytes per encoded byte: a 3-byte copy-2 element can
/// produce 64 bytes. A declared length above `input * 22` is never valid.
pub const MAX_EXPANSION_RATIO: usize = 22;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by block compression and decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockError {
    /// Malformed varint, truncated element, or a declared length that the
    /// input could not possibly expand to.
    #[error("snappy: corrupt input")]
    CorruptInput,
    /// A copy pointed before the start of the output (offset 0 or beyond
    /// the bytes produced so far).
    #[error("snappy: invalid copy offset {offset} with {produced} bytes produced")]
    InvalidCopyOffset { offset: usize, produced: usize },
    /// The elements do not add up to the length declared in the header.
    #[error("snappy: decoded length {actual} does not match declared length {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    /// The caller-supplied destination is shorter than required.
    #[error("snappy: destination buffer too small ({available} < {needed})")]
    BufferTooSmall { needed: usize, available: usize },
    /// The input cannot be described by a 32-bit block length.
    #[error("snappy: input of {len} bytes exceeds the maximum block size")]
    InputTooLarge { len: usize },
}

// ─────────────────────────────────────────────────────────────────────────────
// Varint (little-endian base 128)
// ─────────────────────────────────────────────────────────────────────────────

/// Appends the varint encoding of `v` to `dst`; returns the number of bytes written.
pub fn write_varint(dst: &mut Vec<u8>, mut v: u32) -> usize {
    let start = dst.len();
    while v >= 0x80 {
        dst.push((v as u8) | 0x80);
        v >>= 7;
    }
    dst.push(v as u8);
    dst.len() - start
}

/// Number of bytes [`write_varint`] emits for `v`.
#[inline]
pub fn varint_len(v: u32) -> usize {
    match v {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0x0fff_ffff => 4,
        _ => 5,
    }
}

/// Decodes a varint from the front of `src`.
///
/// Returns the value and the number of bytes consumed. Fails with
/// [`BlockError::CorruptInput`] on truncation, on encodings longer than five
/// bytes, and on values that overflow a `u32`.
pub fn read_varint(src: &[u8]) -> Result<(u32, usize), BlockError> {
    let mut v: u64 = 0;
    for (i, &b) in src.iter().take(MAX_VARINT_LEN).enumerate() {
        v |= u64::from(b & 0x7f) << (7 * i);
        if b < 0x80 {
            return u32::try_from(v)
                .map(|v| (v, i + 1))
                .map_err(|_| BlockError::CorruptInput);
        }
    }
    Err(BlockError::CorruptInput)
}

// ─────────────────────────────────────────────────────────────────────────────
// Unaligned little-endian loads
// ─────────────────────────────────────────────────────────────────────────────

/// Reads a little-endian `u32` at `pos`. Caller guarantees `pos + 4 <= src.len()`.
#[inline(always)]
pub fn load32(src: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([src[pos], src[pos + 1], src[pos + 2], src[pos + 3]])
}

/// Reads a little-endian `u64` at `pos`. Caller guarantees `pos + 8 <= src.len()`.
#[inline(always)]
pub fn load64(src: &[u8], pos: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&src[pos..pos + 8]);
    u64::from_le_bytes(b)
}

// ─────────────────────────────────────────────────────────────────────────────
// Hash table
// ─────────────────────────────────────────────────────────────────────────────

/// Largest table the encoder allocates (entries).
pub const MAX_TABLE_SIZE: usize = 1 << MAX_HASH_TABLE_BITS;

/// Multiplicative hash constant.
const HASH_MUL: u32 = 0x1e35_a7bd;

/// Hashes a 4-byte window down to `table_bits` bits.
#[inline(always)]
pub fn hash4(bytes: u32, table_bits: u32) -> usize {
    (bytes.wrapping_mul(HASH_MUL) >> (32 - table_bits)) as usize
}

/// Picks the table size (as log2) for a fragment of `fragment_len` bytes:
/// the smallest power of two ≥ `fragment_len` within the configured bounds.
pub fn table_bits_for(fragment_len: usize) -> u32 {
    let mut bits = MIN_HASH_TABLE_BITS;
    while bits < MAX_HASH_TABLE_BITS && (1usize << bits) < fragment_len {
        bits += 1;
    }
    bits
}

/// Match-finder state for one fragment. Slots hold positions relative to the
/// fragment start, which fit in `u16` because fragments are ≤ [`MAX_BLOCK_SIZE`].
pub struct HashTable {
    slots: [u16; MAX_TABLE_SIZE],
    bits: u32,
}

const _: () = assert!(MAX_BLOCK_SIZE <= u16::MAX as usize + 1);

impl HashTable {
    /// Creates a zeroed table sized for `fragment_len`.
    pub fn new(fragment_len: usize) -> Self {
        HashTable {
            slots: [0u16; MAX_TABLE_SIZE],
            bits: table_bits_for(fragment_len),
        }
    }

    /// Number of hash bits in use.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Re-sizes and clears the active portion of the table for a new fragment.
    pub fn reset(&mut self, fragment_len: usize) {
        self.bits = table_bits_for(fragment_len);
        self.slots[..1usize << self.bits].fill(0);
    }

    /// Returns the previous candidate for `window` and records `pos` in its slot.
    #[inline(always)]
    pub fn swap(&mut self, window: u32, pos: usize) -> usize {
        let slot = &mut self.slots[hash4(window, self.bits)];
        let prev = *slot as usize;
        *slot = pos as u16;
        prev
    }

    /// Records `pos` as the most recent occurrence of `window`.
    #[inline(always)]
    pub fn insert(&mut self, window: u32, pos: usize) {
        self.slots[hash4(window, self.bits)] = pos as u16;
    }
}
