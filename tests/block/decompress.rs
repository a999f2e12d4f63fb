// Unit tests for token-stream decoding (block/decompress_core.rs, decompress_api.rs)
//
// Covers:
//   - hand-built streams: literals only, matches, length continuations
//   - short offsets 1, 2, 3 (the overlap-correction path)
//   - where end of input is and is not a legal termination
//   - back-references reaching before the first decoded byte

use lz4pipe::block::decompress_api::{decompress_into_writer, decompress_to_vec};
use lz4pipe::block::decompress_core::DecompressError;

// token 0x10 (ll=1, ml=0 → terminal), literal 'A'
const STREAM_A: &[u8] = &[0x10, b'A'];

// token 0x50 (ll=5, ml=0 → terminal), literals "Hello"
const STREAM_HELLO: &[u8] = &[0x50, b'H', b'e', b'l', b'l', b'o'];

// ─────────────────────────────────────────────────────────────────────────────
// Valid streams
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn literal_only_streams() {
    assert_eq!(decompress_to_vec(STREAM_A).unwrap(), b"A");
    assert_eq!(decompress_to_vec(STREAM_HELLO).unwrap(), b"Hello");
}

#[test]
fn empty_stream_and_empty_terminal() {
    assert!(decompress_to_vec(&[]).unwrap().is_empty());
    assert!(decompress_to_vec(&[0x00]).unwrap().is_empty());
}

#[test]
fn several_sequences_then_clean_end_before_a_token() {
    // "xyz0" + 5 bytes at offset 4, then "!" + 4 bytes at offset 1, no terminal.
    let stream = [
        0x41, b'x', b'y', b'z', b'0', 4, 0, //
        0x10, b'!', 1, 0,
    ];
    assert_eq!(decompress_to_vec(&stream).unwrap(), b"xyz0xyz0x!!!!!");
}

#[test]
fn literal_length_continuation() {
    // 15 + 255 + 10 = 280 literals.
    let mut stream = vec![0xF0, 255, 10];
    let literals: Vec<u8> = (0..280u32).map(|i| (i * 7) as u8).collect();
    stream.extend_from_slice(&literals);
    assert_eq!(decompress_to_vec(&stream).unwrap(), literals);
}

#[test]
fn match_length_continuation() {
    // 4 literals, then 4 + 15 + 255 + 255 + 3 = 532 bytes from offset 4.
    let stream = [0x4F, b'w', b'x', b'y', b'z', 4, 0, 255, 255, 3];
    let out = decompress_to_vec(&stream).unwrap();
    assert_eq!(out.len(), 4 + 532);
    assert!(out.chunks(4).all(|c| c == &b"wxyz"[..c.len()]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Short offsets
// ─────────────────────────────────────────────────────────────────────────────

fn short_offset_stream(seed: &[u8], extra: u8) -> Vec<u8> {
    let mut stream = vec![((seed.len() as u8) << 4) | extra];
    stream.extend_from_slice(seed);
    stream.extend_from_slice(&[seed.len() as u8, 0]);
    stream
}

#[test]
fn offset_one_repeats_a_byte() {
    let out = decompress_to_vec(&short_offset_stream(b"a", 11)).unwrap();
    assert_eq!(out, b"aaaaaaaaaaaaaaaa");
}

#[test]
fn offset_two_repeats_a_pair() {
    let out = decompress_to_vec(&short_offset_stream(b"ab", 8)).unwrap();
    assert_eq!(out, b"ababababababab");
}

#[test]
fn offset_three_repeats_a_triple() {
    for extra in 0..15u8 {
        let out = decompress_to_vec(&short_offset_stream(b"abc", extra)).unwrap();
        let expected: Vec<u8> = b"abc".iter().copied().cycle().take(3 + 4 + extra as usize).collect();
        assert_eq!(out, expected, "extra {extra}");
    }
}

#[test]
fn short_offset_after_longer_history() {
    // Offset 2 pointing into the tail of a longer literal run.
    let stream = [0x64, b'q', b'r', b's', b't', b'u', b'v', 2, 0];
    assert_eq!(decompress_to_vec(&stream).unwrap(), b"qrstuvuvuvuvuv");
}

// ─────────────────────────────────────────────────────────────────────────────
// Termination and corruption
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn end_inside_literals_is_truncated() {
    let err = decompress_to_vec(&[0x50, b'H', b'e']).unwrap_err();
    assert!(matches!(err, DecompressError::Truncated), "{err:?}");
}

#[test]
fn end_before_offset_of_a_match_token_is_truncated() {
    // Match nibble 3 promises an offset; it never arrives.
    let err = decompress_to_vec(&[0x23, b'a', b'b']).unwrap_err();
    assert!(matches!(err, DecompressError::Truncated), "{err:?}");
}

#[test]
fn end_before_offset_of_a_terminal_token_is_clean() {
    assert_eq!(decompress_to_vec(&[0x20, b'a', b'b']).unwrap(), b"ab");
}

#[test]
fn end_inside_offset_is_truncated() {
    let err = decompress_to_vec(&[0x20, b'a', b'b', 1]).unwrap_err();
    assert!(matches!(err, DecompressError::Truncated), "{err:?}");
}

#[test]
fn end_inside_match_continuation_is_truncated() {
    let err = decompress_to_vec(&[0x1F, b'a', 1, 0, 255]).unwrap_err();
    assert!(matches!(err, DecompressError::Truncated), "{err:?}");
}

#[test]
fn reference_before_first_byte_is_malformed() {
    let err = decompress_to_vec(&[0x20, b'a', b'b', 3, 0]).unwrap_err();
    assert!(matches!(err, DecompressError::MalformedInput), "{err:?}");

    let err = decompress_to_vec(&[0x00, 1, 0]).unwrap_err();
    assert!(matches!(err, DecompressError::MalformedInput), "{err:?}");
}

#[test]
fn zero_offset_is_malformed() {
    let err = decompress_to_vec(&[0x40, b'a', b'b', b'c', b'd', 0, 0]).unwrap_err();
    assert!(matches!(err, DecompressError::MalformedInput), "{err:?}");
}

#[test]
fn partial_output_reaches_writer_before_error() {
    // 200_000 literals, then a zero offset.  The literal run overflows the
    // window, so its head is flushed before the corruption is seen.
    let literals: Vec<u8> = (0..200_000u32).map(|i| (i % 253) as u8).collect();
    let mut stream = vec![0xF1];
    let mut rem = literals.len() - 15;
    while rem > 254 {
        stream.push(255);
        rem -= 255;
    }
    stream.push(rem as u8);
    stream.extend_from_slice(&literals);
    stream.extend_from_slice(&[0, 0]);

    let mut out = Vec::new();
    let err = decompress_into_writer(&stream, &mut out).unwrap_err();
    assert!(matches!(err, DecompressError::MalformedInput), "{err:?}");
    assert!(out.len() >= 64 * 1024, "only {} bytes flushed", out.len());
    assert_eq!(&out[..], &literals[..out.len()]);
}

#[test]
fn errors_display() {
    assert_eq!(DecompressError::MalformedInput.to_string(), "malformed token stream");
    assert_eq!(DecompressError::Truncated.to_string(), "token stream truncated mid-sequence");
}
