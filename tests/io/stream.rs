// Integration tests for compress_stream / decompress_stream

use std::io::Cursor;

use snappy::frame::{compress_frame, FrameError, FrameOptions};
use snappy::io::{compress_stream, decompress_stream};

#[test]
fn stream_helpers_round_trip() {
    let data = b"stream helper payload, ".repeat(20_000);
    let mut framed = Vec::new();
    let read = compress_stream(&mut Cursor::new(&data), &mut framed, &FrameOptions::default()).unwrap();
    assert_eq!(read, data.len() as u64);

    let mut back = Vec::new();
    let written = decompress_stream(&mut framed.as_slice(), &mut back, &FrameOptions::default()).unwrap();
    assert_eq!(written, data.len() as u64);
    assert_eq!(back, data);
}

#[test]
fn compress_stream_matches_one_shot() {
    let data: Vec<u8> = (0..70_000u32).map(|i| (i * 31 % 211) as u8).collect();
    let opts = FrameOptions::new().chunk_size(5_000);
    let mut framed = Vec::new();
    compress_stream(&mut data.as_slice(), &mut framed, &opts).unwrap();
    assert_eq!(framed, compress_frame(&data, &opts).unwrap());
}

#[test]
fn decompress_stream_truncated() {
    let framed = compress_frame(b"cut short", &FrameOptions::default()).unwrap();
    let mut out = Vec::new();
    assert!(matches!(
        decompress_stream(&mut &framed[..framed.len() - 4], &mut out, &FrameOptions::default()),
        Err(FrameError::TruncatedChunk)
    ));
}
