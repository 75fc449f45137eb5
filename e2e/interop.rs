//! Interoperability tests — hand-assembled wire data
//!
//! Other Snappy encoders use element forms this crate's encoder never
//! produces (copy-4, short copy-2, multi-byte literal lengths where one byte
//! would do, padding and skippable chunks). These tests build such streams
//! byte by byte and check they decode, and check the encoder's own output
//! against exact expected bytes.

extern crate snappy;

use snappy::crc32c::masked_crc32c;
use snappy::frame::{compress_frame, decompress_frame, FrameError, FrameOptions, STREAM_HEADER};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn chunk(chunk_type: u8, payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u32;
    let mut out = vec![chunk_type, len as u8, (len >> 8) as u8, (len >> 16) as u8];
    out.extend_from_slice(payload);
    out
}

fn data_chunk(chunk_type: u8, raw: &[u8], body: &[u8]) -> Vec<u8> {
    let mut payload = masked_crc32c(raw).to_le_bytes().to_vec();
    payload.extend_from_slice(body);
    chunk(chunk_type, &payload)
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Block elements from other encoders
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_copy_4_block() {
    let block = [0x09, 0x0c, b'a', b'b', b'c', b'd', 0x13, 0x04, 0x00, 0x00, 0x00];
    assert_eq!(snappy::decompress(&block).unwrap(), b"abcdabcda");
}

#[test]
fn test_short_copy_2_elements() {
    // "ab" then three 1-byte copies at offset 2, 1, 3.
    let block = [0x05, 0x04, b'a', b'b', 0x02, 0x02, 0x00, 0x02, 0x01, 0x00, 0x02, 0x03, 0x00];
    assert_eq!(snappy::decompress(&block).unwrap(), b"abaab");
}

#[test]
fn test_overlong_literal_length_encoding() {
    // 3-byte literal declared with a 4-byte length field.
    let block = [0x03, 0xfc, 0x02, 0x00, 0x00, 0x00, b'x', b'y', b'z'];
    assert_eq!(snappy::decompress(&block).unwrap(), b"xyz");
}

#[test]
fn test_adjacent_literals() {
    let block = [0x04, 0x04, b'a', b'b', 0x04, b'c', b'd'];
    assert_eq!(snappy::decompress(&block).unwrap(), b"abcd");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Exact encoder output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_exact_block_for_short_literal() {
    assert_eq!(snappy::compress(b"Hello").unwrap(), [0x05, 0x10, b'H', b'e', b'l', b'l', b'o']);
}

#[test]
fn test_exact_frame_for_short_input() {
    let framed = compress_frame(b"Hello", &FrameOptions::default()).unwrap();
    let mut expected = STREAM_HEADER.to_vec();
    expected.extend(data_chunk(0x01, b"Hello", b"Hello"));
    assert_eq!(framed, expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Framed streams from other encoders
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stream_with_every_ignorable_chunk() {
    let copy4 = [0x09, 0x0c, b'a', b'b', b'c', b'd', 0x13, 0x04, 0x00, 0x00, 0x00];
    let mut framed = STREAM_HEADER.to_vec();
    framed.extend(chunk(0xfe, &[0u8; 3]));
    framed.extend(data_chunk(0x00, b"abcdabcda", &copy4));
    framed.extend(chunk(0x80, b"arbitrary skippable payload"));
    framed.extend(STREAM_HEADER);
    framed.extend(chunk(0xfd, &[]));
    framed.extend(data_chunk(0x01, b"!", b"!"));
    assert_eq!(decompress_frame(&framed).unwrap(), b"abcdabcda!");
}

#[test]
fn test_unskippable_reserved_chunk() {
    let mut framed = STREAM_HEADER.to_vec();
    framed.extend(data_chunk(0x01, b"ok", b"ok"));
    framed.extend(chunk(0x10, b"future feature"));
    assert!(matches!(decompress_frame(&framed), Err(FrameError::UnsupportedChunkType(0x10))));
}

#[test]
fn test_full_size_uncompressed_chunk() {
    let raw: Vec<u8> = (0..65_536u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
    let mut framed = STREAM_HEADER.to_vec();
    framed.extend(data_chunk(0x01, &raw, &raw));
    assert_eq!(decompress_frame(&framed).unwrap(), raw);
}
