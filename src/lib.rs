// snappyr — Snappy block and framing format codec

//! Two layers:
//!
//! - [`block`] — the raw block format: a varint length followed by literal
//!   and back-reference elements. One-shot, no checksums.
//! - [`frame`] — the framing format: a stream identifier followed by
//!   checksummed chunks of at most 64 KiB, each stored compressed or raw.
//!   [`io`] wraps it in `std::io` readers and writers.
//!
//! ```
//! let data = b"the quick brown fox jumps over the lazy dog, the quick brown fox".repeat(8);
//!
//! let block = snappy::compress(&data).unwrap();
//! assert_eq!(snappy::decompress(&block).unwrap(), data);
//!
//! let framed = snappy::compress_frame(&data, &snappy::FrameOptions::default()).unwrap();
//! assert_eq!(snappy::decompress_frame(&framed).unwrap(), data);
//! ```

pub mod block;
pub mod config;
pub mod crc32c;
pub mod frame;
pub mod io;

// ── Version constants ─────────────────────────────────────────────────────────
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_RELEASE: u32 = 0;
pub const VERSION_NUMBER: u32 = VERSION_MAJOR * 100 * 100 + VERSION_MINOR * 100 + VERSION_RELEASE;
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the version number (`major * 10000 + minor * 100 + release`).
pub fn version_number() -> u32 {
    VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::{
    compress, compress_into, decompress, decompress_into, decompress_len, max_compress_len,
    BlockError, Decoder, Encoder,
};
pub use frame::{
    compress_frame, decompress_frame, FrameDecoder, FrameEncoder, FrameError, FrameOptions,
};
#[cfg(feature = "multithread")]
pub use frame::compress_frame_parallel;
pub use io::{FrameReader, FrameWriter};
