// Integration tests for incremental framing — FrameEncoder, FrameDecoder and
// parallel compression
//
// Covers:
//   - encoder output is independent of how input is split across writes
//   - decoder output is independent of how input is split across calls
//   - decoder state transitions and the poisoned state
//   - parallel compression is byte-identical to sequential

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snappy::frame::{
    compress_frame, decompress_frame, DecodeState, FrameDecoder, FrameEncoder, FrameError,
    FrameOptions, STREAM_HEADER,
};

fn mixed_data(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        if rng.gen_bool(0.5) {
            let b: u8 = rng.gen();
            let n = rng.gen_range(1..200);
            out.extend(std::iter::repeat(b).take(n));
        } else {
            let n = rng.gen_range(1..100);
            out.extend((0..n).map(|_| rng.gen::<u8>()));
        }
    }
    out.truncate(len);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameEncoder
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encoder_split_points_do_not_matter() {
    let data = mixed_data(1, 300_000);
    let opts = FrameOptions::default();
    let expected = compress_frame(&data, &opts).unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    let mut enc = FrameEncoder::new(opts).unwrap();
    let mut rest = &data[..];
    let mut collected = Vec::new();
    while !rest.is_empty() {
        let n = rng.gen_range(1..=rest.len().min(100_000));
        enc.write(&rest[..n]).unwrap();
        collected.extend(enc.take_output());
        rest = &rest[n..];
    }
    collected.extend(enc.finish().unwrap());
    assert_eq!(collected, expected);
}

#[test]
fn encoder_flush_emits_short_chunk() {
    let mut enc = FrameEncoder::new(FrameOptions::default()).unwrap();
    enc.write(b"abc").unwrap();
    assert!(enc.take_output().is_empty());
    enc.flush().unwrap();
    let out = enc.take_output();
    assert_eq!(&out[..10], &STREAM_HEADER);
    assert_eq!(decompress_frame(&out).unwrap(), b"abc");
    assert_eq!(enc.total_in(), 3);
    assert_eq!(enc.total_out(), out.len() as u64);
}

#[test]
fn encoder_without_input_finishes_with_identifier() {
    let enc = FrameEncoder::new(FrameOptions::default()).unwrap();
    assert_eq!(enc.finish().unwrap(), STREAM_HEADER);
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameDecoder
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decoder_split_points_do_not_matter() {
    let data = mixed_data(3, 200_000);
    let framed = compress_frame(&data, &FrameOptions::new().chunk_size(7_000)).unwrap();
    let mut rng = StdRng::seed_from_u64(4);

    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    let mut rest = &framed[..];
    while !rest.is_empty() {
        let n = rng.gen_range(1..=rest.len().min(9_000));
        assert_eq!(dec.decode(&rest[..n], &mut out).unwrap(), n);
        rest = &rest[n..];
    }
    dec.finish().unwrap();
    assert_eq!(out, data);
}

#[test]
fn decoder_state_transitions() {
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    assert_eq!(dec.state(), DecodeState::ExpectIdentifier);
    dec.decode(&STREAM_HEADER[..5], &mut out).unwrap();
    assert_eq!(dec.state(), DecodeState::ExpectIdentifier);
    assert!(!dec.at_chunk_boundary());
    dec.decode(&STREAM_HEADER[5..], &mut out).unwrap();
    assert_eq!(dec.state(), DecodeState::Streaming);
    dec.finish().unwrap();
    assert_eq!(dec.state(), DecodeState::Done);
}

#[test]
fn decoder_output_waits_for_whole_chunk() {
    let framed = compress_frame(b"whole chunks only", &FrameOptions::default()).unwrap();
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    dec.decode(&framed[..framed.len() - 1], &mut out).unwrap();
    assert!(out.is_empty());
    dec.decode(&framed[framed.len() - 1..], &mut out).unwrap();
    assert_eq!(out, b"whole chunks only");
}

#[test]
fn decoder_finish_without_input() {
    let mut dec = FrameDecoder::new();
    assert!(matches!(dec.finish(), Err(FrameError::MissingIdentifier)));
    assert_eq!(dec.state(), DecodeState::Error);
}

#[test]
fn decoder_rejects_unskippable_from_header_alone() {
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    dec.decode(&STREAM_HEADER, &mut out).unwrap();
    // Only the header; the declared payload never arrives.
    assert!(matches!(
        dec.decode(&[0x05, 0x10, 0x00, 0x00], &mut out),
        Err(FrameError::UnsupportedChunkType(0x05))
    ));
    assert!(matches!(dec.decode(b"more", &mut out), Err(FrameError::Poisoned)));
    assert!(matches!(dec.finish(), Err(FrameError::Poisoned)));
}

#[test]
fn decoder_skips_large_skippable_without_buffering_errors() {
    let mut framed = STREAM_HEADER.to_vec();
    framed.extend_from_slice(&[0x80, 0x00, 0x00, 0x01]); // 65536-byte skippable
    framed.extend(std::iter::repeat(0xaa).take(65_536));
    framed.extend_from_slice(&compress_frame(b"after", &FrameOptions::default()).unwrap()[10..]);

    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    for piece in framed.chunks(1_000) {
        dec.decode(piece, &mut out).unwrap();
    }
    dec.finish().unwrap();
    assert_eq!(out, b"after");
}

#[test]
fn decoder_reset_starts_new_stream() {
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    assert!(dec.decode(b"garbage!", &mut out).is_err());
    dec.reset();
    let framed = compress_frame(b"fresh", &FrameOptions::default()).unwrap();
    dec.decode(&framed, &mut out).unwrap();
    dec.finish().unwrap();
    assert_eq!(out, b"fresh");
    assert_eq!(dec.total_in(), framed.len() as u64);
}

// ─────────────────────────────────────────────────────────────────────────────
// Parallel compression
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "multithread")]
#[test]
fn parallel_is_byte_identical() {
    use snappy::frame::compress_frame_parallel;

    let data = mixed_data(5, 1_000_000);
    for workers in [0, 1, 2, 7] {
        let opts = FrameOptions::new().workers(workers).chunk_size(16_384);
        let par = compress_frame_parallel(&data, &opts).unwrap();
        assert_eq!(par, compress_frame(&data, &opts).unwrap(), "workers = {workers}");
    }
}

#[cfg(feature = "multithread")]
#[test]
fn parallel_rejects_bad_options() {
    use snappy::frame::compress_frame_parallel;

    assert!(matches!(
        compress_frame_parallel(b"x", &FrameOptions::new().chunk_size(0)),
        Err(FrameError::InvalidChunkSize(0))
    ));
}
