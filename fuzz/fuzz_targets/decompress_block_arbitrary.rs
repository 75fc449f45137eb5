#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes: errors are fine, panics are not.
    if let Ok(out) = snappy::decompress(data) {
        assert_eq!(Ok(out.len()), snappy::decompress_len(data));
    }

    // Fixed-size destinations, including one too small for most claims.
    for size in [0usize, 64, 4096] {
        let mut dst = vec![0u8; size];
        let _ = snappy::decompress_into(data, &mut dst);
    }
});
