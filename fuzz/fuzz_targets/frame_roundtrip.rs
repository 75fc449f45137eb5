#![no_main]
use libfuzzer_sys::fuzz_target;
use snappy::frame::{compress_frame, decompress_frame, FrameOptions};

fuzz_target!(|data: &[u8]| {
    // First byte picks a chunk size so short chunks get exercised too.
    let chunk_size = data.first().map_or(65_536, |&b| 1 + (b as usize) * 257);
    let opts = FrameOptions::new().chunk_size(chunk_size);

    let framed = compress_frame(data, &opts).expect("valid chunk size");
    let recovered = decompress_frame(&framed).unwrap_or_else(|e| {
        panic!(
            "frame round-trip: self-compressed stream failed to decode ({e}); \
             input {} bytes, framed {} bytes",
            data.len(),
            framed.len()
        )
    });
    assert_eq!(recovered, data);
});
