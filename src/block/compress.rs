//! Snappy block compression.
//!
//! | Function / type               | Output                               |
//! |-------------------------------|--------------------------------------|
//! | [`compress`]                  | new `Vec<u8>`                        |
//! | [`compress_into`]             | caller's `&mut [u8]`                 |
//! | [`compress_append`]           | end of caller's `Vec<u8>`            |
//! | [`max_compress_len`]          | worst-case output size               |
//! | [`Encoder`]                   | reusable scratch for `compress_into` |
//!
//! The input is cut into fragments of at most [`MAX_BLOCK_SIZE`] bytes. Each
//! fragment is scanned left to right with a fresh, call-local hash table that
//! maps 4-byte fingerprints to their most recent position. A candidate is
//! verified byte-for-byte before use (hash collisions are rejected), extended
//! as far as the data allows, and emitted as one or more copy elements; bytes
//! between matches are gathered into literal runs. A skip counter makes the
//! scan accelerate through data that is not matching.
//!
//! If the greedy result is larger than storing the input as one literal, the
//! block is rewritten as that literal, which bounds the output at
//! `input.len() + 10` bytes regardless of content.

use tracing::debug;

use super::types::{
    load32, load64, write_varint, BlockError, HashTable, COPY_1_MAX_LEN, COPY_1_MAX_OFFSET,
    MAX_COPY_LEN, MAX_INLINE_LITERAL, MAX_INPUT_SIZE, MAX_VARINT_LEN, MIN_MATCH, TAG_COPY_1,
    TAG_COPY_2, TAG_LITERAL,
};
use crate::config::MAX_BLOCK_SIZE;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Fragments shorter than this are emitted as a single literal; the match
/// loop also stops this many bytes before the fragment end so that every
/// 4-byte load stays in bounds.
const INPUT_MARGIN: usize = 15;

/// Initial value of the skip counter; `skip >> SKIP_SHIFT` bytes are
/// advanced after each miss.
const SKIP_START: u32 = 32;
const SKIP_SHIFT: u32 = 5;

/// Longest literal tag header: tag byte + 4 length bytes.
const MAX_LITERAL_HEADER: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Utility
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for an input of `input_len` bytes.
///
/// Returns 0 if `input_len` exceeds the 32-bit block length limit.
#[inline]
pub const fn max_compress_len(input_len: usize) -> usize {
    if input_len > MAX_INPUT_SIZE {
        0
    } else {
        input_len + MAX_VARINT_LEN + MAX_LITERAL_HEADER
    }
}

/// Size of the tag + length bytes that precede a literal of `len` bytes.
#[inline]
fn literal_header_len(len: usize) -> usize {
    match len {
        0 => 0,
        1..=MAX_INLINE_LITERAL => 1,
        _ => {
            let n = len - 1;
            1 + (4 - (n as u32).leading_zeros() as usize / 8)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Element emitters
// ─────────────────────────────────────────────────────────────────────────────

/// Appends a literal element holding `lit` (which must be non-empty).
fn emit_literal(out: &mut Vec<u8>, lit: &[u8]) {
    let n = lit.len() - 1;
    if lit.len() <= MAX_INLINE_LITERAL {
        out.push(((n as u8) << 2) | TAG_LITERAL);
    } else {
        let extra = literal_header_len(lit.len()) - 1;
        out.push((((59 + extra) as u8) << 2) | TAG_LITERAL);
        out.extend_from_slice(&(n as u32).to_le_bytes()[..extra]);
    }
    out.extend_from_slice(lit);
}

/// Appends one copy element; `len` must be in `MIN_MATCH..=MAX_COPY_LEN`.
#[inline]
fn emit_copy_upto64(out: &mut Vec<u8>, offset: usize, len: usize) {
    debug_assert!((MIN_MATCH..=MAX_COPY_LEN).contains(&len));
    if len < COPY_1_MAX_LEN && offset < COPY_1_MAX_OFFSET {
        out.push(TAG_COPY_1 | (((len - 4) as u8) << 2) | (((offset >> 8) as u8) << 5));
        out.push(offset as u8);
    } else {
        out.push(TAG_COPY_2 | (((len - 1) as u8) << 2));
        out.extend_from_slice(&(offset as u16).to_le_bytes());
    }
}

/// Appends copy elements for a match of any length ≥ [`MIN_MATCH`].
///
/// Long matches are split into 64-byte copies; when the remainder would drop
/// below [`MIN_MATCH`], a 60-byte copy is emitted first instead.
fn emit_copy(out: &mut Vec<u8>, offset: usize, mut len: usize) {
    while len >= MAX_COPY_LEN + MIN_MATCH {
        emit_copy_upto64(out, offset, MAX_COPY_LEN);
        len -= MAX_COPY_LEN;
    }
    if len > MAX_COPY_LEN {
        emit_copy_upto64(out, offset, 60);
        len -= 60;
    }
    emit_copy_upto64(out, offset, len);
}

// ─────────────────────────────────────────────────────────────────────────────
// Match finding
// ─────────────────────────────────────────────────────────────────────────────

/// Length of the common run starting at `a` and `b` (`a < b`), bounded by
/// the end of `src`.
#[inline]
fn common_len(src: &[u8], mut a: usize, mut b: usize) -> usize {
    let start = b;
    while b + 8 <= src.len() {
        let x = load64(src, a) ^ load64(src, b);
        if x != 0 {
            return b - start + (x.trailing_zeros() / 8) as usize;
        }
        a += 8;
        b += 8;
    }
    while b < src.len() && src[a] == src[b] {
        a += 1;
        b += 1;
    }
    b - start
}

/// Compresses one fragment (≤ [`MAX_BLOCK_SIZE`] bytes) and appends its
/// elements to `out`. `table` must already be reset for this fragment.
fn compress_fragment(src: &[u8], table: &mut HashTable, out: &mut Vec<u8>) {
    let n = src.len();
    let mut next_emit = 0usize;

    if n >= INPUT_MARGIN {
        let limit = n - INPUT_MARGIN;
        let mut ip = 0usize;
        let mut skip = SKIP_START;

        while ip <= limit {
            let window = load32(src, ip);
            let candidate = table.swap(window, ip);

            if candidate >= ip || load32(src, candidate) != window {
                ip += (skip >> SKIP_SHIFT) as usize;
                skip += 1;
                continue;
            }

            if next_emit < ip {
                emit_literal(out, &src[next_emit..ip]);
            }
            let len = MIN_MATCH + common_len(src, candidate + MIN_MATCH, ip + MIN_MATCH);
            emit_copy(out, ip - candidate, len);

            ip += len;
            next_emit = ip;
            skip = SKIP_START;

            // Seed the table with the last matched position so an immediately
            // following repeat is found.
            if ip <= limit {
                table.insert(load32(src, ip - 1), ip - 1);
            }
        }
    }

    if next_emit < n {
        emit_literal(out, &src[next_emit..]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Compresses `input` as one block and appends it to `out`.
///
/// Returns the number of bytes appended. Fails only with
/// [`BlockError::InputTooLarge`].
pub fn compress_append(input: &[u8], out: &mut Vec<u8>) -> Result<usize, BlockError> {
    if input.len() > MAX_INPUT_SIZE {
        return Err(BlockError::InputTooLarge { len: input.len() });
    }
    let start = out.len();
    write_varint(out, input.len() as u32);
    let body = out.len();

    if input.is_empty() {
        return Ok(body - start);
    }

    let literal_budget = body + literal_header_len(input.len()) + input.len();
    out.reserve(input.len() / 2 + MAX_LITERAL_HEADER);

    let mut table = HashTable::new(input.len().min(MAX_BLOCK_SIZE));
    for fragment in input.chunks(MAX_BLOCK_SIZE) {
        table.reset(fragment.len());
        compress_fragment(fragment, &mut table, out);
        if out.len() > literal_budget {
            break;
        }
    }

    if out.len() > literal_budget {
        debug!(input_len = input.len(), "block does not compress, storing as a single literal");
        out.truncate(body);
        emit_literal(out, input);
    }
    Ok(out.len() - start)
}

/// Compresses `input` into a new vector.
pub fn compress(input: &[u8]) -> Result<Vec<u8>, BlockError> {
    let mut out = Vec::with_capacity(max_compress_len(input.len()).min(input.len() / 2 + 64));
    compress_append(input, &mut out)?;
    Ok(out)
}

/// Compresses `input` into `dst`, returning the number of bytes written.
///
/// `dst` must hold at least [`max_compress_len`]`(input.len())` bytes,
/// otherwise [`BlockError::BufferTooSmall`] is returned and `dst` is untouched.
pub fn compress_into(input: &[u8], dst: &mut [u8]) -> Result<usize, BlockError> {
    Encoder::new().compress(input, dst)
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoder
// ─────────────────────────────────────────────────────────────────────────────

/// Reusable block encoder.
///
/// Holds only a scratch output buffer between calls; the hash table is
/// rebuilt for every call, so one encoder's calls are fully independent.
#[derive(Debug, Default)]
pub struct Encoder {
    scratch: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder { scratch: Vec::new() }
    }

    /// Compresses `input` into `dst`. See [`compress_into`].
    pub fn compress(&mut self, input: &[u8], dst: &mut [u8]) -> Result<usize, BlockError> {
        if input.len() > MAX_INPUT_SIZE {
            return Err(BlockError::InputTooLarge { len: input.len() });
        }
        let needed = max_compress_len(input.len());
        if dst.len() < needed {
            return Err(BlockError::BufferTooSmall { needed, available: dst.len() });
        }
        self.scratch.clear();
        let n = compress_append(input, &mut self.scratch)?;
        dst[..n].copy_from_slice(&self.scratch);
        Ok(n)
    }
}
