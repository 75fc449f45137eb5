//! Snappy framing format — chunked, checksummed streams of compressed blocks.
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`types`]      | chunk types, options, decode state, [`FrameError`]    |
//! | [`header`]     | chunk header codec, chunk parsing, compress bound     |
//! | [`compress`]   | one-shot and incremental frame compression            |
//! | [`decompress`] | one-shot and resumable frame decompression            |
//! | `parallel`     | multi-threaded compression (`multithread` feature)    |

pub mod compress;
pub mod decompress;
pub mod header;
#[cfg(feature = "multithread")]
pub mod parallel;
pub mod types;

pub use compress::{compress_frame, compress_frame_append, FrameEncoder};
pub use decompress::{chunks, decompress_frame, decompress_frame_with, Chunks, FrameDecoder};
pub use header::compress_frame_bound;
#[cfg(feature = "multithread")]
pub use parallel::compress_frame_parallel;
pub use types::{Chunk, ChunkType, DecodeState, FrameError, FrameOptions, STREAM_HEADER};
