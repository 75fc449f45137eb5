// Integration tests for block::types — varints, tag constants, hash table
//
// Covers:
//   - varint encode/decode at every byte-length boundary
//   - rejection of truncated, overlong and overflowing varints
//   - tag constants and element limits
//   - hash-table sizing bounds
//   - BlockError display strings

use snappy::block::types::{
    hash4, read_varint, table_bits_for, varint_len, write_varint, BlockError, HashTable,
    COPY_1_MAX_OFFSET, MAX_COPY_LEN, MAX_EXPANSION_RATIO, MAX_INLINE_LITERAL, MAX_INPUT_SIZE,
    MAX_VARINT_LEN, MIN_MATCH, TAG_COPY_1, TAG_COPY_2, TAG_COPY_4, TAG_LITERAL,
};
use snappy::config::{MAX_HASH_TABLE_BITS, MIN_HASH_TABLE_BITS};

// ─────────────────────────────────────────────────────────────────────────────
// Varint
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn varint_known_encodings() {
    let cases: &[(u32, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (300, &[0xac, 0x02]),
        (16_384, &[0x80, 0x80, 0x01]),
        (u32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
    ];
    for &(v, bytes) in cases {
        let mut buf = Vec::new();
        write_varint(&mut buf, v);
        assert_eq!(buf, bytes, "encoding of {v}");
        assert_eq!(read_varint(bytes), Ok((v, bytes.len())));
    }
}

#[test]
fn varint_len_never_exceeds_five() {
    assert_eq!(varint_len(u32::MAX), MAX_VARINT_LEN);
    assert_eq!(varint_len(0), 1);
}

#[test]
fn varint_ignores_trailing_bytes() {
    assert_eq!(read_varint(&[0x05, 0xaa, 0xbb]), Ok((5, 1)));
}

#[test]
fn varint_truncated() {
    assert_eq!(read_varint(&[]), Err(BlockError::CorruptInput));
    assert_eq!(read_varint(&[0x80]), Err(BlockError::CorruptInput));
    assert_eq!(read_varint(&[0xff, 0xff]), Err(BlockError::CorruptInput));
}

#[test]
fn varint_longer_than_five_bytes() {
    assert_eq!(
        read_varint(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
        Err(BlockError::CorruptInput)
    );
}

#[test]
fn varint_overflowing_u32() {
    assert_eq!(read_varint(&[0xff, 0xff, 0xff, 0xff, 0x1f]), Err(BlockError::CorruptInput));
}

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn tag_kinds_are_distinct_low_bits() {
    assert_eq!([TAG_LITERAL, TAG_COPY_1, TAG_COPY_2, TAG_COPY_4], [0, 1, 2, 3]);
}

#[test]
fn element_limits() {
    assert_eq!(MAX_INLINE_LITERAL, 60);
    assert_eq!(MIN_MATCH, 4);
    assert_eq!(MAX_COPY_LEN, 64);
    assert_eq!(COPY_1_MAX_OFFSET, 2048);
    assert_eq!(MAX_INPUT_SIZE, u32::MAX as usize);
    assert_eq!(MAX_EXPANSION_RATIO, 22);
}

// ─────────────────────────────────────────────────────────────────────────────
// Hash table
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn table_bits_bounded() {
    assert_eq!(table_bits_for(0), MIN_HASH_TABLE_BITS);
    assert_eq!(table_bits_for(256), 8);
    assert_eq!(table_bits_for(257), 9);
    assert_eq!(table_bits_for(1 << 16), MAX_HASH_TABLE_BITS);
}

#[test]
fn hash_fits_table() {
    for bits in MIN_HASH_TABLE_BITS..=MAX_HASH_TABLE_BITS {
        for w in [0u32, 1, 0xdead_beef, u32::MAX] {
            assert!(hash4(w, bits) < 1 << bits);
        }
    }
}

#[test]
fn table_swap_returns_previous() {
    let mut t = HashTable::new(1000);
    assert_eq!(t.bits(), 10);
    assert_eq!(t.swap(0x6162_6364, 17), 0);
    assert_eq!(t.swap(0x6162_6364, 42), 17);
    t.reset(1000);
    assert_eq!(t.swap(0x6162_6364, 5), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn error_display() {
    assert_eq!(BlockError::CorruptInput.to_string(), "snappy: corrupt input");
    let e = BlockError::BufferTooSmall { needed: 20, available: 3 };
    assert!(e.to_string().contains("3 < 20"));
}
