//! Thin wrapper around the `crc` crate providing the CRC-32C API used by the
//! framing layer.
//!
//! Snappy frames carry the Castagnoli CRC of each chunk's *uncompressed*
//! bytes, passed through a rotate-and-add mask.

use crc::{Crc, Digest, CRC_32_ISCSI};

/// CRC-32C (iSCSI / Castagnoli) engine. The lookup table is built at compile time.
pub static CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// Constant added after rotation by [`mask`].
pub const MASK_DELTA: u32 = 0xa282_ead8;

/// Streaming CRC-32C state, for callers hashing a chunk in several pieces.
pub type Crc32cState = Digest<'static, u32>;

/// One-shot CRC-32C.
///
/// # Parity vectors
/// * `crc32c(b"")` == `0x0000_0000`
/// * `crc32c(b"123456789")` == `0xE306_9283`
#[inline]
pub fn crc32c(data: &[u8]) -> u32 {
    CASTAGNOLI.checksum(data)
}

/// Starts a streaming CRC-32C computation.
#[inline]
pub fn crc32c_state() -> Crc32cState {
    CASTAGNOLI.digest()
}

/// Applies Snappy's checksum mask: rotate right by 15, then add [`MASK_DELTA`].
#[inline]
pub fn mask(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Inverse of [`mask`].
#[inline]
pub fn unmask(masked: u32) -> u32 {
    masked.wrapping_sub(MASK_DELTA).rotate_left(15)
}

/// CRC-32C of `data`, masked. This is the value stored in data chunks.
#[inline]
pub fn masked_crc32c(data: &[u8]) -> u32 {
    mask(crc32c(data))
}
