#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let compressed = snappy::compress(data).expect("input under 4 GiB always compresses");
    assert!(compressed.len() <= snappy::max_compress_len(data.len()));

    let recovered = snappy::decompress(&compressed).unwrap_or_else(|e| {
        panic!(
            "block round-trip: self-compressed data failed to decode ({e}); \
             input {} bytes, compressed {} bytes",
            data.len(),
            compressed.len()
        )
    });
    assert_eq!(recovered, data);
});
