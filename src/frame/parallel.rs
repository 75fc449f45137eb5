//! Multi-threaded frame compression.
//!
//! Chunks of a framed stream are independent, so a batch of them can be
//! compressed concurrently and concatenated in input order:
//!
//! 1. The input is split into `chunk_size` pieces.
//! 2. Each batch of `workers × BATCH_CHUNKS_PER_WORKER` pieces is encoded
//!    on a dedicated [`rayon`] pool, each piece into its own buffer, which
//!    bounds peak memory by the batch rather than the input.
//! 3. The buffers are appended in their original order.
//!
//! The result is byte-identical to [`compress_frame`](super::compress::compress_frame)
//! with the same options.

use rayon::prelude::*;
use tracing::debug;

use crate::config::effective_workers;
use crate::frame::compress::{compress_frame_append, encode_chunk};
use crate::frame::header::compress_frame_bound;
use crate::frame::types::{FrameError, FrameOptions, STREAM_HEADER};

/// Chunks handed to each worker per batch.
const BATCH_CHUNKS_PER_WORKER: usize = 4;

/// Compresses `input` as a framed stream using `opts.workers` threads.
///
/// A worker count of 0 uses one per logical CPU. Inputs that fit in a single
/// chunk, or a worker count that resolves to 1, take the sequential path.
pub fn compress_frame_parallel(input: &[u8], opts: &FrameOptions) -> Result<Vec<u8>, FrameError> {
    opts.validate()?;
    let workers = effective_workers(opts.workers);
    let mut out = Vec::new();

    if workers == 1 || input.len() <= opts.chunk_size {
        compress_frame_append(input, opts, &mut out)?;
        return Ok(out);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| FrameError::Io(std::io::Error::other(e)))?;

    out.reserve(compress_frame_bound(input.len(), opts.chunk_size).min(input.len() + 1024));
    out.extend_from_slice(&STREAM_HEADER);

    let chunks: Vec<&[u8]> = input.chunks(opts.chunk_size).collect();
    let batch_len = workers * BATCH_CHUNKS_PER_WORKER;

    for (batch_no, batch) in chunks.chunks(batch_len).enumerate() {
        debug!(batch = batch_no, chunks = batch.len(), workers, "compressing batch");
        let encoded: Vec<Result<Vec<u8>, FrameError>> = pool.install(|| {
            batch
                .par_iter()
                .map(|raw| -> Result<Vec<u8>, FrameError> {
                    let mut buf = Vec::with_capacity(raw.len() + 16);
                    encode_chunk(raw, &mut Vec::new(), &mut buf)?;
                    Ok(buf)
                })
                .collect()
        });
        for chunk in encoded {
            out.extend_from_slice(&chunk?);
        }
    }
    Ok(out)
}
