//! E2E Test Suite 01: Block One-Shot API
//!
//! Round-trips a spread of input shapes through the block compressor and
//! decompressor:
//! - empty, single-byte and sub-margin inputs
//! - sizes straddling the 64 KiB fragment boundary
//! - highly repetitive, text-like and random data
//! - all three output variants (new Vec, caller slice, append)
//! - 10 MB and 100 MB inputs (the latter `--ignored`)

extern crate snappy;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use snappy::block::{
    compress, compress_append, compress_into, decompress, decompress_append, decompress_into,
    max_compress_len,
};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

const SIZES: &[usize] = &[
    0, 1, 2, 14, 15, 16, 60, 61, 255, 256, 1_000, 10_000, 30_000, 44_895, 44_896, 50_000,
    65_535, 65_536, 65_537, 100_000, 1_000_000,
];

fn lorem(len: usize) -> Vec<u8> {
    const WORDS: &[&str] = &[
        "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
        "do", "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna",
    ];
    let mut rng = StdRng::seed_from_u64(len as u64);
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        out.extend_from_slice(WORDS[rng.gen_range(0..WORDS.len())].as_bytes());
        out.push(if rng.gen_bool(0.1) { b'.' } else { b' ' });
    }
    out.truncate(len);
    out
}

fn random(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    StdRng::seed_from_u64(!(len as u64)).fill_bytes(&mut out);
    out
}

fn assert_round_trip(data: &[u8]) {
    let c = compress(data).unwrap();
    assert!(
        c.len() <= max_compress_len(data.len()),
        "{} bytes compressed to {}",
        data.len(),
        c.len()
    );
    assert_eq!(decompress(&c).unwrap(), data, "round trip of {} bytes", data.len());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Round trips across sizes and data shapes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_round_trip_zeros() {
    for &n in SIZES {
        assert_round_trip(&vec![0u8; n]);
    }
}

#[test]
fn test_round_trip_text() {
    for &n in SIZES {
        assert_round_trip(&lorem(n));
    }
}

#[test]
fn test_round_trip_random() {
    for &n in SIZES {
        assert_round_trip(&random(n));
    }
}

#[test]
fn test_ten_repeated_bytes() {
    assert_round_trip(&[0x41; 10]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Compression ratio sanity
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_text_compresses_below_70_percent() {
    let data = lorem(100_000);
    let c = compress(&data).unwrap();
    assert!(c.len() * 10 < data.len() * 7, "ratio {} / {}", c.len(), data.len());
}

#[test]
fn test_random_expands_by_at_most_ten_bytes() {
    let data = random(1_000_000);
    assert!(compress(&data).unwrap().len() <= data.len() + 10);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Output variants agree
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_output_variants_agree() {
    let data = lorem(77_777);
    let c = compress(&data).unwrap();

    let mut slice = vec![0u8; max_compress_len(data.len())];
    let n = compress_into(&data, &mut slice).unwrap();
    assert_eq!(&slice[..n], &c[..]);

    let mut appended = Vec::new();
    compress_append(&data, &mut appended).unwrap();
    assert_eq!(appended, c);

    let mut dst = vec![0u8; data.len()];
    assert_eq!(decompress_into(&c, &mut dst).unwrap(), data.len());
    assert_eq!(dst, data);

    let mut out = Vec::new();
    decompress_append(&c, &mut out).unwrap();
    decompress_append(&c, &mut out).unwrap();
    assert_eq!(out.len(), 2 * data.len());
    assert_eq!(&out[data.len()..], &data[..]);
}

#[test]
fn test_compression_is_deterministic() {
    let data = lorem(200_000);
    assert_eq!(compress(&data).unwrap(), compress(&data).unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Large inputs
// ─────────────────────────────────────────────────────────────────────────────

fn large_round_trip(len: usize) -> anyhow::Result<()> {
    let mut data = lorem(len / 2);
    data.extend_from_slice(&random(len - data.len()));
    let c = compress(&data)?;
    anyhow::ensure!(c.len() <= max_compress_len(len), "{len} bytes compressed to {}", c.len());
    let back = decompress(&c)?;
    anyhow::ensure!(back == data, "round trip of {len} bytes differs");
    Ok(())
}

#[test]
fn test_round_trip_10mb() -> anyhow::Result<()> {
    large_round_trip(10_000_000)
}

#[test]
#[ignore = "100 MB round trip; run with --ignored"]
fn test_round_trip_100mb() -> anyhow::Result<()> {
    large_round_trip(100_000_000)
}
