//! E2E Test Suite 02: Frame Streaming API
//!
//! Validates the framed compress/decompress pipeline end to end:
//! - one-shot framing across sizes and chunk sizes
//! - incremental encoder fed in irregular pieces
//! - resumable decoder fed one byte at a time
//! - concatenated streams
//! - parallel compression equivalence
//! - 10 MB and 100 MB streams (the latter `--ignored`)

extern crate snappy;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snappy::frame::{
    compress_frame, decompress_frame, DecodeState, FrameDecoder, FrameEncoder, FrameOptions,
};

fn sample(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let alphabet = b"abcdefgh ";
    (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: One-shot round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_oneshot_sizes_and_chunk_sizes() {
    for &len in &[0usize, 1, 100, 65_535, 65_536, 65_537, 300_000] {
        for &chunk in &[1usize, 1_000, 65_536] {
            if chunk == 1 && len > 1_000 {
                continue;
            }
            let data = sample(len as u64, len);
            let opts = FrameOptions::new().chunk_size(chunk);
            let framed = compress_frame(&data, &opts).unwrap();
            assert_eq!(decompress_frame(&framed).unwrap(), data, "len {len} chunk {chunk}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Incremental encoder → resumable decoder
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_encoder_to_decoder_pipeline() {
    let data = sample(11, 500_000);
    let mut rng = StdRng::seed_from_u64(12);

    let mut enc = FrameEncoder::new(FrameOptions::default()).unwrap();
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();

    let mut rest = &data[..];
    while !rest.is_empty() {
        let n = rng.gen_range(1..=rest.len().min(40_000));
        enc.write(&rest[..n]).unwrap();
        dec.decode(&enc.take_output(), &mut out).unwrap();
        rest = &rest[n..];
    }
    dec.decode(&enc.finish().unwrap(), &mut out).unwrap();
    dec.finish().unwrap();

    assert_eq!(dec.state(), DecodeState::Done);
    assert_eq!(out, data);
}

#[test]
fn test_byte_at_a_time_decoding() {
    let data = sample(21, 70_000);
    let framed = compress_frame(&data, &FrameOptions::default()).unwrap();
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    for b in &framed {
        dec.decode(std::slice::from_ref(b), &mut out).unwrap();
    }
    dec.finish().unwrap();
    assert_eq!(out, data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Concatenated streams
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_concatenated_streams() {
    let a = sample(31, 80_000);
    let b = sample(32, 1_234);
    let mut framed = compress_frame(&a, &FrameOptions::default()).unwrap();
    framed.extend(compress_frame(&b, &FrameOptions::default()).unwrap());

    let mut expected = a.clone();
    expected.extend_from_slice(&b);
    assert_eq!(decompress_frame(&framed).unwrap(), expected);

    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    dec.decode(&framed, &mut out).unwrap();
    dec.finish().unwrap();
    assert_eq!(out, expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Parallel compression
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "multithread")]
#[test]
fn test_parallel_round_trip() {
    let data = sample(41, 2_000_000);
    let opts = FrameOptions::new().workers(4);
    let framed = snappy::compress_frame_parallel(&data, &opts).unwrap();
    assert_eq!(framed, compress_frame(&data, &opts).unwrap());
    assert_eq!(decompress_frame(&framed).unwrap(), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Large streams
// ─────────────────────────────────────────────────────────────────────────────

fn large_stream_round_trip(len: usize) -> anyhow::Result<()> {
    let data = sample(len as u64, len);
    let opts = FrameOptions::default();
    let framed = compress_frame(&data, &opts)?;
    anyhow::ensure!(decompress_frame(&framed)? == data, "one-shot round trip of {len} bytes");

    let mut dec = FrameDecoder::new();
    let mut out = Vec::with_capacity(len);
    for piece in framed.chunks(1 << 20) {
        dec.decode(piece, &mut out)?;
    }
    dec.finish()?;
    anyhow::ensure!(out == data, "resumable round trip of {len} bytes");
    Ok(())
}

#[test]
fn test_stream_round_trip_10mb() -> anyhow::Result<()> {
    large_stream_round_trip(10_000_000)
}

#[test]
#[ignore = "100 MB stream; run with --ignored"]
fn test_stream_round_trip_100mb() -> anyhow::Result<()> {
    large_stream_round_trip(100_000_000)
}
