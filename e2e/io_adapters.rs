//! E2E Test Suite 04: std::io Adapters
//!
//! Pipes data through `FrameWriter` → byte buffer → `FrameReader` and the
//! `compress_stream` / `decompress_stream` helpers, including:
//! - `io::copy` in both directions
//! - writers wrapped around `BufWriter` and readers around `BufReader`
//! - error propagation as `io::ErrorKind`

extern crate snappy;

use std::io::{self, BufReader, BufWriter, Read, Write};

use snappy::frame::{decompress_frame, FrameOptions};
use snappy::io::{compress_stream, decompress_stream, FrameReader, FrameWriter};

fn corpus() -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..20_000u32 {
        out.extend_from_slice(format!("record {i:05} value={} ", i * 37 % 1000).as_bytes());
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: io::copy through both adapters
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_io_copy_round_trip() {
    let data = corpus();

    let mut w = FrameWriter::new(Vec::new());
    io::copy(&mut data.as_slice(), &mut w).unwrap();
    let framed = w.finish().unwrap();
    assert!(framed.len() < data.len() / 2);

    let mut back = Vec::new();
    io::copy(&mut FrameReader::new(framed.as_slice()), &mut back).unwrap();
    assert_eq!(back, data);
}

#[test]
fn test_buffered_wrappers() {
    let data = corpus();

    let mut framed = Vec::new();
    {
        let mut w = FrameWriter::new(BufWriter::new(&mut framed));
        for line in data.chunks(81) {
            w.write_all(line).unwrap();
        }
        w.finish().unwrap().flush().unwrap();
    }
    assert_eq!(decompress_frame(&framed).unwrap(), data);

    let mut r = BufReader::new(FrameReader::new(framed.as_slice()));
    let mut back = String::new();
    r.read_to_string(&mut back).unwrap();
    assert_eq!(back.as_bytes(), &data[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Stream helpers interoperate with the adapters
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stream_helpers_and_adapters_agree() {
    let data = corpus();
    let opts = FrameOptions::new().chunk_size(20_000);

    let mut via_helper = Vec::new();
    compress_stream(&mut data.as_slice(), &mut via_helper, &opts).unwrap();

    let mut w = FrameWriter::with_options(Vec::new(), opts).unwrap();
    w.write_all(&data).unwrap();
    assert_eq!(w.finish().unwrap(), via_helper);

    let mut back = Vec::new();
    decompress_stream(&mut via_helper.as_slice(), &mut back, &opts).unwrap();
    assert_eq!(back, data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Error kinds
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reader_error_kinds() {
    let mut framed = Vec::new();
    compress_stream(&mut corpus().as_slice(), &mut framed, &FrameOptions::default()).unwrap();

    let mut sink = Vec::new();
    let truncated = FrameReader::new(&framed[..framed.len() - 1]).read_to_end(&mut sink);
    assert_eq!(truncated.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);

    let mut corrupt = framed.clone();
    corrupt[20] ^= 0xff;
    let err = FrameReader::new(corrupt.as_slice()).read_to_end(&mut sink).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);

    let err = FrameReader::new(&b"not snappy"[..]).read_to_end(&mut sink).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}
