//! Snappy block compression and decompression.
//!
//! A block is a varint-encoded uncompressed length followed by literal and
//! copy elements. This module is the leaf of the crate: it knows nothing
//! about framing or checksums.

pub mod compress;
pub mod decompress;
pub mod types;

// Re-export the most important public API items at the module level.
pub use compress::{compress, compress_append, compress_into, max_compress_len, Encoder};
pub use decompress::{decompress, decompress_append, decompress_into, decompress_len, Decoder};
pub use types::{BlockError, MAX_INPUT_SIZE};
