// Integration tests for one-shot frame decompression
//
// Covers:
//   - hand-built streams: uncompressed, compressed, padding, skippable chunks
//   - concatenated streams (repeated identifier)
//   - every error: missing identifier, bad identifier, checksum mismatch,
//     unsupported chunk type, truncation, oversized chunk content
//   - checksum verification can be disabled

use snappy::crc32c::masked_crc32c;
use snappy::frame::{
    compress_frame, decompress_frame, decompress_frame_with, FrameDecoder, FrameError, FrameOptions,
    STREAM_HEADER,
};

fn chunk(chunk_type: u8, payload: &[u8]) -> Vec<u8> {
    let len = (payload.len() as u32).to_le_bytes();
    let mut out = vec![chunk_type, len[0], len[1], len[2]];
    out.extend_from_slice(payload);
    out
}

fn data_chunk(chunk_type: u8, raw: &[u8], body: &[u8]) -> Vec<u8> {
    let mut payload = masked_crc32c(raw).to_le_bytes().to_vec();
    payload.extend_from_slice(body);
    chunk(chunk_type, &payload)
}

fn stream(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = STREAM_HEADER.to_vec();
    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Valid streams
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn identifier_only_is_empty() {
    assert_eq!(decompress_frame(&STREAM_HEADER).unwrap(), b"");
}

#[test]
fn hand_built_uncompressed_chunk() {
    let framed = stream(&[data_chunk(0x01, b"hello", b"hello")]);
    assert_eq!(decompress_frame(&framed).unwrap(), b"hello");
}

#[test]
fn hand_built_compressed_chunk() {
    let block = [9, 3 << 2, b'a', b'b', b'c', b'd', 0x02 | (4 << 2), 4, 0];
    let framed = stream(&[data_chunk(0x00, b"abcdabcda", &block)]);
    assert_eq!(decompress_frame(&framed).unwrap(), b"abcdabcda");
}

#[test]
fn padding_and_skippable_are_ignored() {
    let framed = stream(&[
        chunk(0xfe, &[0; 16]),
        data_chunk(0x01, b"one", b"one"),
        chunk(0x80, b"metadata"),
        chunk(0xfd, b""),
        data_chunk(0x01, b"two", b"two"),
    ]);
    assert_eq!(decompress_frame(&framed).unwrap(), b"onetwo");
}

#[test]
fn concatenated_streams() {
    let opts = FrameOptions::default();
    let mut framed = compress_frame(b"first|", &opts).unwrap();
    framed.extend_from_slice(&compress_frame(b"second", &opts).unwrap());
    assert_eq!(decompress_frame(&framed).unwrap(), b"first|second");
}

#[test]
fn verification_can_be_disabled() {
    let mut framed = stream(&[data_chunk(0x01, b"hello", b"hello")]);
    framed[14] ^= 0xff; // checksum byte
    assert!(matches!(decompress_frame(&framed), Err(FrameError::ChecksumMismatch { .. })));
    let opts = FrameOptions::new().verify_checksums(false);
    assert_eq!(decompress_frame_with(&framed, &opts).unwrap(), b"hello");
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_missing_identifier() {
    assert!(matches!(decompress_frame(b""), Err(FrameError::MissingIdentifier)));
}

#[test]
fn data_before_identifier() {
    let framed = data_chunk(0x01, b"x", b"x");
    assert!(matches!(decompress_frame(&framed), Err(FrameError::MissingIdentifier)));
}

#[test]
fn skippable_before_identifier() {
    let framed = chunk(0x80, b"x");
    assert!(matches!(decompress_frame(&framed), Err(FrameError::MissingIdentifier)));
}

#[test]
fn malformed_first_chunk_is_missing_identifier() {
    let cases: &[&[u8]] = &[
        &[0x00, 0x05, 0x00, 0x00],
        &[0x01, 0x02, 0x00, 0x00, 1, 2],
        &[0x10, 0x00, 0x00],
        &[0xfe],
    ];
    for &input in cases {
        assert!(
            matches!(decompress_frame(input), Err(FrameError::MissingIdentifier)),
            "one-shot on {input:02x?}"
        );
        let mut dec = FrameDecoder::new();
        let mut out = Vec::new();
        assert!(
            matches!(dec.decode(input, &mut out), Err(FrameError::MissingIdentifier)),
            "resumable on {input:02x?}"
        );
        assert!(out.is_empty());
    }
}

#[test]
fn corrupted_identifier() {
    let mut framed = STREAM_HEADER.to_vec();
    framed[4] = b'S';
    assert!(matches!(decompress_frame(&framed), Err(FrameError::CorruptInput(_))));
}

#[test]
fn checksum_mismatch_reports_both_values() {
    let mut payload = 0u32.to_le_bytes().to_vec();
    payload.extend_from_slice(b"data");
    let framed = stream(&[chunk(0x01, &payload)]);
    match decompress_frame(&framed) {
        Err(FrameError::ChecksumMismatch { expected, actual }) => {
            assert_eq!(expected, 0);
            assert_eq!(actual, masked_crc32c(b"data"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn flipped_data_byte_fails_checksum() {
    let data = b"flip a byte in the middle of this chunk".repeat(5);
    let mut framed = compress_frame(&data, &FrameOptions::default()).unwrap();
    let last = framed.len() - 1;
    framed[last] ^= 0x01;
    assert!(decompress_frame(&framed).is_err());
}

#[test]
fn unskippable_chunk_rejected() {
    let framed = stream(&[chunk(0x10, b"")]);
    assert!(matches!(decompress_frame(&framed), Err(FrameError::UnsupportedChunkType(0x10))));
    let framed = stream(&[chunk(0x7f, b"abc")]);
    assert!(matches!(decompress_frame(&framed), Err(FrameError::UnsupportedChunkType(0x7f))));
}

#[test]
fn truncated_payload() {
    let framed = compress_frame(b"truncate me please", &FrameOptions::default()).unwrap();
    let cut = &framed[..framed.len() - 3];
    assert!(matches!(decompress_frame(cut), Err(FrameError::TruncatedChunk)));
}

#[test]
fn truncated_header() {
    let mut framed = STREAM_HEADER.to_vec();
    framed.extend_from_slice(&[0x01, 0x05]);
    assert!(matches!(decompress_frame(&framed), Err(FrameError::TruncatedChunk)));
}

#[test]
fn data_chunk_without_room_for_checksum() {
    let framed = stream(&[chunk(0x01, &[1, 2])]);
    assert!(matches!(decompress_frame(&framed), Err(FrameError::CorruptInput(_))));
}

#[test]
fn compressed_chunk_over_64k_rejected() {
    let raw = vec![0u8; 65_537];
    let block = snappy::compress(&raw).unwrap();
    let framed = stream(&[data_chunk(0x00, &raw, &block)]);
    assert!(matches!(decompress_frame(&framed), Err(FrameError::CorruptInput(_))));
}

#[test]
fn corrupt_block_surfaces_block_error() {
    let framed = stream(&[data_chunk(0x00, b"", &[5, 0, b'a'])]);
    assert!(matches!(decompress_frame(&framed), Err(FrameError::Block(_))));
}
