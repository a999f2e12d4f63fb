#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Streaming encoder on the calling thread, block decoder on the result.
    let mut compressed = Vec::new();
    lz4pipe::compress_to(data, &mut compressed).expect("in-memory sink cannot fail");

    let recovered = lz4pipe::decompress_to_vec(&compressed).expect("valid stream rejected");
    assert_eq!(recovered, data, "stream round-trip mismatch");
});
