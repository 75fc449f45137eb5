// Integration tests for block compression
//
// Covers:
//   - exact output for empty and short inputs
//   - compress / compress_into / compress_append agree
//   - the literal fallback bounds output at input + 10 bytes
//   - error paths: BufferTooSmall, and max_compress_len past the 32-bit limit
//   - Encoder reuse is stateless between calls

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use snappy::block::{
    compress, compress_append, compress_into, decompress, max_compress_len, BlockError, Encoder,
    MAX_INPUT_SIZE,
};

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut buf);
    buf
}

// ─────────────────────────────────────────────────────────────────────────────
// Exact encodings
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_is_single_zero_byte() {
    assert_eq!(compress(b"").unwrap(), vec![0x00]);
}

#[test]
fn short_input_is_one_literal() {
    assert_eq!(compress(b"abc").unwrap(), vec![0x03, 0x08, b'a', b'b', b'c']);
}

#[test]
fn header_is_varint_of_length() {
    let data = vec![7u8; 300];
    let out = compress(&data).unwrap();
    assert_eq!(&out[..2], &[0xac, 0x02]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Compression effectiveness
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn repeated_byte_compresses_well() {
    let data = vec![b'a'; 100_000];
    let out = compress(&data).unwrap();
    assert!(out.len() < 6_000, "got {} bytes", out.len());
    assert_eq!(decompress(&out).unwrap(), data);
}

#[test]
fn text_compresses() {
    let data = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(200);
    let out = compress(&data).unwrap();
    assert!(out.len() < data.len() / 4);
    assert_eq!(decompress(&out).unwrap(), data);
}

#[test]
fn random_input_hits_literal_bound() {
    for &len in &[1usize, 15, 16, 61, 4_096, 65_536, 65_537, 200_000] {
        let data = random_bytes(len as u64, len);
        let out = compress(&data).unwrap();
        assert!(out.len() <= max_compress_len(len), "len {len}: {} bytes", out.len());
        assert_eq!(decompress(&out).unwrap(), data);
    }
}

#[test]
fn max_compress_len_values() {
    assert_eq!(max_compress_len(0), 10);
    assert_eq!(max_compress_len(1000), 1010);
    assert_eq!(max_compress_len(MAX_INPUT_SIZE + 1), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Output variants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn into_and_append_match_compress() {
    let data = b"abcabcabcabcabcabcabcabc-xyz-abcabcabc".repeat(40);
    let expected = compress(&data).unwrap();

    let mut dst = vec![0u8; max_compress_len(data.len())];
    let n = compress_into(&data, &mut dst).unwrap();
    assert_eq!(&dst[..n], &expected[..]);

    let mut out = b"prefix".to_vec();
    let m = compress_append(&data, &mut out).unwrap();
    assert_eq!(m, expected.len());
    assert_eq!(&out[..6], b"prefix");
    assert_eq!(&out[6..], &expected[..]);
}

#[test]
fn into_rejects_short_destination() {
    let data = vec![1u8; 100];
    let mut dst = vec![0u8; 50];
    assert_eq!(
        compress_into(&data, &mut dst),
        Err(BlockError::BufferTooSmall { needed: 110, available: 50 })
    );
}

#[test]
fn encoder_is_deterministic_across_calls() {
    let a = random_bytes(1, 10_000);
    let b = b"the same encoder, a second input, the same encoder".repeat(30);
    let mut enc = Encoder::new();
    let mut dst = vec![0u8; max_compress_len(a.len().max(b.len()))];

    let n = enc.compress(&a, &mut dst).unwrap();
    assert_eq!(&dst[..n], &compress(&a).unwrap()[..]);
    let n = enc.compress(&b, &mut dst).unwrap();
    assert_eq!(&dst[..n], &compress(&b).unwrap()[..]);
    let n = enc.compress(&a, &mut dst).unwrap();
    assert_eq!(&dst[..n], &compress(&a).unwrap()[..]);
}

#[test]
fn matches_across_fragment_boundary_round_trip() {
    // Pattern period straddles the 64 KiB fragment edge.
    let unit = random_bytes(9, 1_000);
    let data: Vec<u8> = unit.iter().cycle().take(200_000).copied().collect();
    let out = compress(&data).unwrap();
    assert!(out.len() < data.len() / 10);
    assert_eq!(decompress(&out).unwrap(), data);
}
