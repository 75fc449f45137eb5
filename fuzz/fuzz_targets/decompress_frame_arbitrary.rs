#![no_main]
use libfuzzer_sys::fuzz_target;
use snappy::frame::{decompress_frame, FrameDecoder};

fuzz_target!(|data: &[u8]| {
    let one_shot = decompress_frame(data);

    // The resumable decoder must agree with the one-shot path on success,
    // whatever the split points.
    let mut dec = FrameDecoder::new();
    let mut out = Vec::new();
    let mut ok = true;
    for piece in data.chunks(7) {
        if dec.decode(piece, &mut out).is_err() {
            ok = false;
            break;
        }
    }
    let resumable = if ok { dec.finish().map(|()| out) } else { Err(snappy::FrameError::Poisoned) };

    match (one_shot, resumable) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Ok(_), Err(e)) => panic!("resumable decoder rejected a valid stream: {e}"),
        (Err(_), Ok(_)) => panic!("resumable decoder accepted an invalid stream"),
        (Err(_), Err(_)) => {}
    }
});
