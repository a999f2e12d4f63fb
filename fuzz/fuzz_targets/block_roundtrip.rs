#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let compressed = lz4pipe::compress_to_vec(data).expect("fuzz inputs are far below the size limit");
    assert!(
        compressed.len() <= lz4pipe::compress_bound(data.len()),
        "compressed {} bytes to {} (bound {})",
        data.len(),
        compressed.len(),
        lz4pipe::compress_bound(data.len())
    );

    let recovered = lz4pipe::decompress_to_vec(&compressed).expect("valid stream rejected");
    assert_eq!(recovered, data, "block round-trip mismatch");
});
