// config.rs — Compile-time configuration constants.
//
// Runtime knobs (chunk size, checksum verification, worker count) live in
// `frame::FrameOptions`; everything here is fixed at build time.

// Largest slice of input compressed against a single hash table.
// At 64 KiB every back-reference fits in a copy-2 element and table slots
// fit in u16.
pub const MAX_BLOCK_SIZE: usize = 1 << 16;

// Maximum number of uncompressed bytes carried by one data chunk.
pub const MAX_CHUNK_SIZE: usize = 65_536;

// Default chunk size used by `FrameOptions::default()`.
pub const DEFAULT_CHUNK_SIZE: usize = MAX_CHUNK_SIZE;

// Hash-table sizing bounds (log2 of entry count). The table grows with the
// fragment length between these bounds.
pub const MIN_HASH_TABLE_BITS: u32 = 8;
pub const MAX_HASH_TABLE_BITS: u32 = 14;

// A chunk is stored uncompressed unless compression removes at least
// len >> COMPRESSION_THRESHOLD_SHIFT bytes (12.5 %).
pub const COMPRESSION_THRESHOLD_SHIFT: u32 = 3;

// Whether parallel frame compression is compiled in.
pub const MULTITHREAD: bool = cfg!(feature = "multithread");

// Default number of compression workers; 0 = one per logical CPU.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Upper bound on workers accepted by `FrameOptions::workers`.
pub const NB_WORKERS_MAX: usize = 200;

/// Resolves a requested worker count to the number of threads actually used.
///
/// `0` selects one worker per logical CPU; values above [`NB_WORKERS_MAX`]
/// are clamped.
pub fn effective_workers(requested: usize) -> usize {
    let n = if requested == 0 { num_cpus::get() } else { requested };
    n.clamp(1, NB_WORKERS_MAX)
}
