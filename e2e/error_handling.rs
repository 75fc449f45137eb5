//! E2E Test Suite 03: Error Handling
//!
//! Feeds malformed input to every decoding entry point and checks that each
//! fails cleanly with the expected error and never panics:
//! - truncation at every possible position
//! - single-bit corruption anywhere in a stream
//! - adversarial length declarations
//! - error state is terminal for the resumable decoder

extern crate snappy;

use snappy::block::{decompress, BlockError};
use snappy::frame::{
    compress_frame, decompress_frame, DecodeState, FrameDecoder, FrameError, FrameOptions,
    STREAM_HEADER,
};

fn sample() -> Vec<u8> {
    b"error handling sample; error handling sample; 0123456789".repeat(40)
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Block truncation and corruption
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_block_truncated_everywhere() {
    let c = snappy::compress(&sample()).unwrap();
    for cut in 0..c.len() {
        assert!(decompress(&c[..cut]).is_err(), "cut at {cut} decoded");
    }
}

#[test]
fn test_block_bit_flips_never_panic() {
    let data = sample();
    let c = snappy::compress(&data).unwrap();
    for i in 0..c.len() {
        for bit in 0..8 {
            let mut bad = c.clone();
            bad[i] ^= 1 << bit;
            if let Ok(out) = decompress(&bad) {
                assert_eq!(out.len(), snappy::decompress_len(&bad).unwrap());
            }
        }
    }
}

#[test]
fn test_block_huge_declared_length() {
    // 4 GiB - 1 declared, one literal byte supplied.
    let block = [0xff, 0xff, 0xff, 0xff, 0x0f, 0x00, b'x'];
    assert_eq!(decompress(&block), Err(BlockError::CorruptInput));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Frame truncation and corruption
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_frame_truncated_everywhere() {
    let framed = compress_frame(&sample(), &FrameOptions::new().chunk_size(500)).unwrap();
    let boundaries: Vec<usize> = {
        let mut b = vec![0, STREAM_HEADER.len()];
        let mut pos = STREAM_HEADER.len();
        while pos < framed.len() {
            let len = framed[pos + 1] as usize
                | (framed[pos + 2] as usize) << 8
                | (framed[pos + 3] as usize) << 16;
            pos += 4 + len;
            b.push(pos);
        }
        b
    };
    for cut in 0..framed.len() {
        let res = decompress_frame(&framed[..cut]);
        if boundaries.contains(&cut) && cut > 0 {
            assert!(res.is_ok(), "cut at chunk boundary {cut} failed: {res:?}");
        } else if cut == 0 {
            assert!(matches!(res, Err(FrameError::MissingIdentifier)));
        } else {
            assert!(matches!(res, Err(FrameError::TruncatedChunk)), "cut {cut}: {res:?}");
        }
    }
}

#[test]
fn test_frame_bit_flips_detected() {
    let data = sample();
    let framed = compress_frame(&data, &FrameOptions::default()).unwrap();
    for i in STREAM_HEADER.len()..framed.len() {
        let mut bad = framed.clone();
        bad[i] ^= 0x04;
        match decompress_frame(&bad) {
            Ok(out) => assert_ne!(out, data, "flip at {i} went unnoticed"),
            Err(_) => {}
        }
    }
}

#[test]
fn test_frame_identifier_corruption() {
    for i in 0..STREAM_HEADER.len() {
        let mut bad = STREAM_HEADER.to_vec();
        bad[i] ^= 0x20;
        assert!(decompress_frame(&bad).is_err(), "identifier flip at {i} accepted");
    }
}

#[test]
fn test_frame_oversized_uncompressed_chunk() {
    let mut framed = STREAM_HEADER.to_vec();
    // 65541 bytes declared: 4 over the limit.
    framed.extend_from_slice(&[0x01, 0x05, 0x00, 0x01]);
    framed.extend(std::iter::repeat(0u8).take(65_541));
    assert!(matches!(decompress_frame(&framed), Err(FrameError::CorruptInput(_))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Resumable decoder error state
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decoder_error_is_terminal() {
    let mut bad = compress_frame(&sample(), &FrameOptions::default()).unwrap();
    bad[STREAM_HEADER.len() + 5] ^= 0xff; // inside the checksum
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    assert!(matches!(dec.decode(&bad, &mut out), Err(FrameError::ChecksumMismatch { .. })));
    assert!(out.is_empty());
    assert_eq!(dec.state(), DecodeState::Error);
    assert!(matches!(dec.decode(&STREAM_HEADER, &mut out), Err(FrameError::Poisoned)));
}

#[test]
fn test_decoder_truncated_at_finish() {
    let framed = compress_frame(&sample(), &FrameOptions::default()).unwrap();
    for cut in [1, 4, 9, 11, 14, framed.len() - 1] {
        let mut dec = FrameDecoder::new();
        let mut out = Vec::new();
        dec.decode(&framed[..cut], &mut out).unwrap();
        assert!(matches!(dec.finish(), Err(FrameError::TruncatedChunk)), "cut {cut}");
    }
}
