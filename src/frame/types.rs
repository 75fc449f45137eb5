//! Snappy framing format types, constants, and error handling.
//!
//! Covers:
//! - Chunk-type constants and the reserved ranges
//! - [`ChunkType`] classification of the type byte
//! - [`Chunk`], the decoded form of one chunk
//! - [`FrameOptions`], the runtime knobs of the frame codec
//! - [`DecodeState`], the resumable decoder's state tag
//! - [`FrameError`]

use std::io;

use thiserror::Error;

use crate::block::{max_compress_len, BlockError};
use crate::config::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, NB_WORKERS_DEFAULT};

// ─────────────────────────────────────────────────────────────────────────────
// Wire constants
// ─────────────────────────────────────────────────────────────────────────────

/// Chunk header size: 1 type byte + 3-byte little-endian length.
pub const CHUNK_HEADER_SIZE: usize = 4;

/// Size of the masked CRC-32C that opens every data chunk payload.
pub const CHECKSUM_SIZE: usize = 4;

/// Largest payload a 24-bit length can describe.
pub const MAX_CHUNK_LEN: usize = (1 << 24) - 1;

/// Payload of the stream identifier chunk.
pub const STREAM_IDENTIFIER: [u8; 6] = *b"sNaPpY";

/// The complete identifier chunk as it appears at the start of every stream.
pub const STREAM_HEADER: [u8; 10] = [0xff, 0x06, 0x00, 0x00, b's', b'N', b'a', b'P', b'p', b'Y'];

pub const CHUNK_TYPE_COMPRESSED: u8 = 0x00;
pub const CHUNK_TYPE_UNCOMPRESSED: u8 = 0x01;
pub const CHUNK_TYPE_PADDING: u8 = 0xfe;
pub const CHUNK_TYPE_STREAM_IDENTIFIER: u8 = 0xff;

/// First and last reserved unskippable chunk types.
pub const UNSKIPPABLE_FIRST: u8 = 0x02;
pub const UNSKIPPABLE_LAST: u8 = 0x7f;

/// First and last reserved skippable chunk types.
pub const SKIPPABLE_FIRST: u8 = 0x80;
pub const SKIPPABLE_LAST: u8 = 0xfd;

/// Largest payload of an uncompressed-data chunk.
pub const MAX_UNCOMPRESSED_CHUNK_LEN: usize = CHECKSUM_SIZE + MAX_CHUNK_SIZE;

/// Largest payload of a compressed-data chunk: checksum + worst-case block.
pub const MAX_COMPRESSED_CHUNK_LEN: usize = CHECKSUM_SIZE + max_compress_len(MAX_CHUNK_SIZE);

// ─────────────────────────────────────────────────────────────────────────────
// Chunk types
// ─────────────────────────────────────────────────────────────────────────────

/// Classification of a chunk type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    StreamIdentifier,
    Compressed,
    Uncompressed,
    Padding,
    /// `0x80..=0xfd`: must be skipped by decoders that do not know it.
    Skippable(u8),
    /// `0x02..=0x7f`: must be rejected by decoders that do not know it.
    Unskippable(u8),
}

impl ChunkType {
    pub fn from_byte(b: u8) -> Self {
        match b {
            CHUNK_TYPE_COMPRESSED => ChunkType::Compressed,
            CHUNK_TYPE_UNCOMPRESSED => ChunkType::Uncompressed,
            CHUNK_TYPE_PADDING => ChunkType::Padding,
            CHUNK_TYPE_STREAM_IDENTIFIER => ChunkType::StreamIdentifier,
            SKIPPABLE_FIRST..=SKIPPABLE_LAST => ChunkType::Skippable(b),
            _ => ChunkType::Unskippable(b),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            ChunkType::Compressed => CHUNK_TYPE_COMPRESSED,
            ChunkType::Uncompressed => CHUNK_TYPE_UNCOMPRESSED,
            ChunkType::Padding => CHUNK_TYPE_PADDING,
            ChunkType::StreamIdentifier => CHUNK_TYPE_STREAM_IDENTIFIER,
            ChunkType::Skippable(b) | ChunkType::Unskippable(b) => b,
        }
    }

    /// Largest payload length this chunk type may declare. `None` when only
    /// the 24-bit field limits it.
    pub fn max_payload_len(self) -> Option<usize> {
        match self {
            ChunkType::StreamIdentifier => Some(STREAM_IDENTIFIER.len()),
            ChunkType::Compressed => Some(MAX_COMPRESSED_CHUNK_LEN),
            ChunkType::Uncompressed => Some(MAX_UNCOMPRESSED_CHUNK_LEN),
            _ => None,
        }
    }
}

/// One decoded chunk. Data payloads borrow from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk<'a> {
    Identifier,
    /// Masked checksum of the uncompressed bytes + the compressed block.
    Compressed { checksum: u32, data: &'a [u8] },
    /// Masked checksum + the raw bytes.
    Uncompressed { checksum: u32, data: &'a [u8] },
    Padding { len: usize },
    Skippable { chunk_type: u8, data: &'a [u8] },
    Unskippable { chunk_type: u8 },
}

impl Chunk<'_> {
    pub fn chunk_type(&self) -> ChunkType {
        match self {
            Chunk::Identifier => ChunkType::StreamIdentifier,
            Chunk::Compressed { .. } => ChunkType::Compressed,
            Chunk::Uncompressed { .. } => ChunkType::Uncompressed,
            Chunk::Padding { .. } => ChunkType::Padding,
            Chunk::Skippable { chunk_type, .. } => ChunkType::Skippable(*chunk_type),
            Chunk::Unskippable { chunk_type } => ChunkType::Unskippable(*chunk_type),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime options for frame compression and decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    /// Uncompressed bytes per data chunk, 1..=65536.
    pub chunk_size: usize,
    /// Verify each data chunk's CRC-32C while decoding.
    pub verify_checksums: bool,
    /// Worker threads for parallel compression; 0 = one per logical CPU.
    pub workers: usize,
}

impl Default for FrameOptions {
    fn default() -> Self {
        FrameOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            verify_checksums: true,
            workers: NB_WORKERS_DEFAULT,
        }
    }
}

impl FrameOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Checks that `chunk_size` is within 1..=65536.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(FrameError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder state
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level state of a frame decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeState {
    /// No chunk seen yet; the next one must be the stream identifier.
    #[default]
    ExpectIdentifier,
    /// Identifier seen; data, padding and skippable chunks are accepted.
    Streaming,
    /// Input ended on a chunk boundary after the identifier.
    Done,
    /// A violation was found; the decoder accepts no further input.
    Error,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by frame compression and decompression.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A compressed chunk's block failed to decode.
    #[error(transparent)]
    Block(#[from] BlockError),
    /// The stream did not start with the `sNaPpY` identifier chunk.
    #[error("snappy frame: missing stream identifier")]
    MissingIdentifier,
    /// A data chunk's CRC-32C does not match its contents.
    #[error("snappy frame: checksum mismatch (stored {expected:#010x}, computed {actual:#010x})")]
    ChecksumMismatch { expected: u32, actual: u32 },
    /// A reserved unskippable chunk type was encountered.
    #[error("snappy frame: unsupported chunk type {0:#04x}")]
    UnsupportedChunkType(u8),
    /// A chunk is structurally invalid (bad length, oversized contents,
    /// wrong identifier payload).
    #[error("snappy frame: corrupt input: {0}")]
    CorruptInput(&'static str),
    /// Input ended inside a chunk header or payload.
    #[error("snappy frame: input ends inside a chunk")]
    TruncatedChunk,
    /// `chunk_size` is outside 1..=65536.
    #[error("snappy frame: invalid chunk size {0}")]
    InvalidChunkSize(usize),
    /// The decoder already failed and accepts no further input.
    #[error("snappy frame: decoder is in the error state")]
    Poisoned,
    /// I/O failure in a reader/writer adapter.
    #[error("snappy frame: i/o error: {0}")]
    Io(#[from] io::Error),
}

impl From<FrameError> for io::Error {
    fn from(e: FrameError) -> io::Error {
        match e {
            FrameError::Io(inner) => inner,
            FrameError::TruncatedChunk => io::Error::new(io::ErrorKind::UnexpectedEof, e),
            FrameError::InvalidChunkSize(_) => io::Error::new(io::ErrorKind::InvalidInput, e),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
