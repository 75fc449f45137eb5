//! Snappy frame decompression.
//!
//! Two entry points share one chunk-handling routine ([`apply_chunk`]):
//!
//! - [`decompress_frame`] — one-shot, over a complete in-memory stream;
//!   all-or-nothing.
//! - [`FrameDecoder`] — resumable, push-style state machine for input that
//!   arrives in pieces. Between calls it keeps only the state tag, the
//!   partially read chunk header, and the partially read payload.
//!
//! State machine: `ExpectIdentifier → Streaming → Done`, with `Error`
//! terminal on any violation. Data chunks are checksum-verified before their
//! bytes are appended; padding and skippable chunks are consumed silently;
//! reserved unskippable chunks are rejected.

use tracing::{debug, trace};

use crate::block::{decompress_append, decompress_len};
use crate::config::MAX_CHUNK_SIZE;
use crate::crc32c::masked_crc32c;
use crate::frame::header::{chunk_from_payload, parse_chunk, read_chunk_header};
use crate::frame::types::{
    Chunk, ChunkType, DecodeState, FrameError, FrameOptions, CHUNK_HEADER_SIZE,
    CHUNK_TYPE_STREAM_IDENTIFIER,
};

// ─────────────────────────────────────────────────────────────────────────────
// Chunk handling
// ─────────────────────────────────────────────────────────────────────────────

/// Checks a stored masked checksum against `data`.
#[inline]
fn verify_checksum(stored: u32, data: &[u8]) -> Result<(), FrameError> {
    let actual = masked_crc32c(data);
    if actual != stored {
        return Err(FrameError::ChecksumMismatch { expected: stored, actual });
    }
    Ok(())
}

/// Whether the type byte of the next chunk already rules out a stream
/// identifier where one is required.
#[inline]
fn misses_identifier(state: DecodeState, type_byte: u8) -> bool {
    state == DecodeState::ExpectIdentifier && type_byte != CHUNK_TYPE_STREAM_IDENTIFIER
}

/// Applies one parsed chunk to the decode state, appending any data to `out`.
///
/// On error `out` is left as it was on entry.
pub fn apply_chunk(
    state: &mut DecodeState,
    chunk: &Chunk<'_>,
    verify_checksums: bool,
    out: &mut Vec<u8>,
) -> Result<(), FrameError> {
    match *state {
        DecodeState::ExpectIdentifier => {
            if *chunk != Chunk::Identifier {
                return Err(FrameError::MissingIdentifier);
            }
            *state = DecodeState::Streaming;
            return Ok(());
        }
        DecodeState::Error => return Err(FrameError::Poisoned),
        DecodeState::Streaming | DecodeState::Done => {}
    }

    match *chunk {
        // A later identifier marks a concatenated stream.
        Chunk::Identifier => {}
        Chunk::Compressed { checksum, data } => {
            if decompress_len(data)? > MAX_CHUNK_SIZE {
                return Err(FrameError::CorruptInput("chunk decompresses past 65536 bytes"));
            }
            let start = out.len();
            decompress_append(data, out)?;
            if verify_checksums {
                if let Err(e) = verify_checksum(checksum, &out[start..]) {
                    out.truncate(start);
                    return Err(e);
                }
            }
            trace!(stored_len = data.len(), raw_len = out.len() - start, "decoded compressed chunk");
        }
        Chunk::Uncompressed { checksum, data } => {
            if verify_checksums {
                verify_checksum(checksum, data)?;
            }
            out.extend_from_slice(data);
            trace!(raw_len = data.len(), "decoded uncompressed chunk");
        }
        Chunk::Padding { len } => trace!(len, "skipped padding chunk"),
        Chunk::Skippable { chunk_type, data } => {
            debug!(chunk_type, len = data.len(), "skipped reserved chunk");
        }
        Chunk::Unskippable { chunk_type } => return Err(FrameError::UnsupportedChunkType(chunk_type)),
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

/// Iterator over the chunks of an in-memory stream.
///
/// Yields each chunk in order; stops after the first error.
pub struct Chunks<'a> {
    input: &'a [u8],
    failed: bool,
}

/// Returns an iterator over the chunks in `input` without decoding them.
pub fn chunks(input: &[u8]) -> Chunks<'_> {
    Chunks { input, failed: false }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match parse_chunk(self.input) {
            Ok(Some((chunk, used))) => {
                self.input = &self.input[used..];
                Some(Ok(chunk))
            }
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decompresses a complete framed stream with checksum verification.
pub fn decompress_frame(input: &[u8]) -> Result<Vec<u8>, FrameError> {
    decompress_frame_with(input, &FrameOptions::default())
}

/// Decompresses a complete framed stream.
///
/// Only `opts.verify_checksums` is consulted. Returns an error, and no
/// partial output, if any chunk is invalid.
pub fn decompress_frame_with(input: &[u8], opts: &FrameOptions) -> Result<Vec<u8>, FrameError> {
    let mut state = DecodeState::ExpectIdentifier;
    if input.first().is_some_and(|&b| misses_identifier(state, b)) {
        return Err(FrameError::MissingIdentifier);
    }
    let mut out = Vec::new();
    for chunk in chunks(input) {
        apply_chunk(&mut state, &chunk?, opts.verify_checksums, &mut out)?;
    }
    if state == DecodeState::ExpectIdentifier {
        return Err(FrameError::MissingIdentifier);
    }
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameDecoder — resumable decompression
// ─────────────────────────────────────────────────────────────────────────────

/// Progress through the chunk currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Gathering the 4-byte header; `got` bytes are in `header`.
    Header { got: usize },
    /// Gathering a payload of `len` bytes; `got` so far.
    Payload { chunk_type: ChunkType, len: usize, got: usize },
}

/// Resumable frame decoder.
///
/// Feed input with [`decode`](Self::decode) in pieces of any size, then call
/// [`finish`](Self::finish) once the input is exhausted. Output is appended
/// one verified chunk at a time. Padding and skippable payloads are counted
/// off without being buffered; data payloads are buffered only as their
/// bytes arrive, after their declared length has passed the per-type limit.
#[derive(Debug)]
pub struct FrameDecoder {
    state: DecodeState,
    stage: Stage,
    verify_checksums: bool,
    header: [u8; CHUNK_HEADER_SIZE],
    payload: Vec<u8>,
    total_in: u64,
    total_out: u64,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_options(&FrameOptions::default())
    }

    pub fn with_options(opts: &FrameOptions) -> Self {
        FrameDecoder {
            state: DecodeState::ExpectIdentifier,
            stage: Stage::Header { got: 0 },
            verify_checksums: opts.verify_checksums,
            header: [0u8; CHUNK_HEADER_SIZE],
            payload: Vec::new(),
            total_in: 0,
            total_out: 0,
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// `true` when no chunk is partially read.
    pub fn at_chunk_boundary(&self) -> bool {
        self.stage == Stage::Header { got: 0 }
    }

    /// Framed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Decoded bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Returns the decoder to its initial state for a new stream.
    pub fn reset(&mut self) {
        self.state = DecodeState::ExpectIdentifier;
        self.stage = Stage::Header { got: 0 };
        self.payload.clear();
        self.total_in = 0;
        self.total_out = 0;
    }

    /// Consumes all of `input`, appending decoded bytes to `out`.
    ///
    /// Returns the number of bytes consumed (always `input.len()` on
    /// success). After an error the decoder is in [`DecodeState::Error`] and
    /// rejects further input with [`FrameError::Poisoned`].
    pub fn decode(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<usize, FrameError> {
        match self.state {
            DecodeState::Error => return Err(FrameError::Poisoned),
            DecodeState::Done if !input.is_empty() => self.state = DecodeState::Streaming,
            _ => {}
        }
        let before = out.len();
        let result = self.decode_inner(input, out);
        self.total_out += (out.len() - before) as u64;
        match result {
            Ok(()) => {
                self.total_in += input.len() as u64;
                Ok(input.len())
            }
            Err(e) => {
                self.state = DecodeState::Error;
                Err(e)
            }
        }
    }

    fn decode_inner(&mut self, mut input: &[u8], out: &mut Vec<u8>) -> Result<(), FrameError> {
        while !input.is_empty() {
            match self.stage {
                Stage::Header { got } => {
                    if got == 0 && misses_identifier(self.state, input[0]) {
                        return Err(FrameError::MissingIdentifier);
                    }
                    let take = (CHUNK_HEADER_SIZE - got).min(input.len());
                    self.header[got..got + take].copy_from_slice(&input[..take]);
                    input = &input[take..];
                    if got + take < CHUNK_HEADER_SIZE {
                        self.stage = Stage::Header { got: got + take };
                        continue;
                    }
                    let (chunk_type, len) = self.start_chunk()?;
                    self.payload.clear();
                    self.stage = Stage::Payload { chunk_type, len, got: 0 };
                    if len == 0 {
                        self.end_chunk(chunk_type, out)?;
                    }
                }
                Stage::Payload { chunk_type, len, got } => {
                    let take = (len - got).min(input.len());
                    if !matches!(chunk_type, ChunkType::Padding | ChunkType::Skippable(_)) {
                        self.payload.extend_from_slice(&input[..take]);
                    }
                    input = &input[take..];
                    self.stage = Stage::Payload { chunk_type, len, got: got + take };
                    if got + take == len {
                        self.end_chunk(chunk_type, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Validates a completed header before any payload is read.
    fn start_chunk(&mut self) -> Result<(ChunkType, usize), FrameError> {
        let (chunk_type, len) = read_chunk_header(&self.header)?;
        if self.state == DecodeState::ExpectIdentifier && chunk_type != ChunkType::StreamIdentifier {
            return Err(FrameError::MissingIdentifier);
        }
        if let ChunkType::Unskippable(b) = chunk_type {
            return Err(FrameError::UnsupportedChunkType(b));
        }
        Ok((chunk_type, len))
    }

    /// Applies the fully read chunk and returns to header reading.
    fn end_chunk(&mut self, chunk_type: ChunkType, out: &mut Vec<u8>) -> Result<(), FrameError> {
        let chunk = match chunk_type {
            ChunkType::Padding => Chunk::Padding { len: self.stage_len() },
            ChunkType::Skippable(b) => Chunk::Skippable { chunk_type: b, data: &[] },
            t => chunk_from_payload(t, &self.payload)?,
        };
        apply_chunk(&mut self.state, &chunk, self.verify_checksums, out)?;
        self.stage = Stage::Header { got: 0 };
        Ok(())
    }

    fn stage_len(&self) -> usize {
        match self.stage {
            Stage::Payload { len, .. } => len,
            Stage::Header { .. } => 0,
        }
    }

    /// Signals end of input.
    ///
    /// Succeeds, moving to [`DecodeState::Done`], only when the identifier
    /// has been seen and no chunk is partially read.
    pub fn finish(&mut self) -> Result<(), FrameError> {
        let result = match self.state {
            DecodeState::Error => Err(FrameError::Poisoned),
            DecodeState::ExpectIdentifier if self.at_chunk_boundary() => Err(FrameError::MissingIdentifier),
            _ if !self.at_chunk_boundary() => Err(FrameError::TruncatedChunk),
            _ => Ok(()),
        };
        self.state = if result.is_ok() { DecodeState::Done } else { DecodeState::Error };
        result
    }
}
