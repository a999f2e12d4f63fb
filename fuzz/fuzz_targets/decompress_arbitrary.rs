#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes: errors are expected, panics are not.  Output is bounded
    // by roughly 255 bytes per input byte, so a Vec sink cannot blow up.
    let _ = lz4pipe::decompress_to_vec(data);

    let mut out = Vec::new();
    let _ = lz4pipe::decompress_to(data, &mut out);
});
