// Unit tests for the streaming windows (block/window.rs)
//
// Covers:
//   - EncodeWindow: read-ahead, exhaustion, compaction at the threshold
//   - DecodeWindow: literal and match copies, overlap, far references across
//     a flush, byte accounting
//   - The streaming encoder driven directly through MatchFinder

use lz4pipe::block::compress::{MatchFinder, SearchWindow};
use lz4pipe::block::decompress_api::decompress_to_vec;
use lz4pipe::block::decompress_core::DecompressError;
use lz4pipe::block::encode::StreamSink;
use lz4pipe::block::window::{DecodeWindow, EncodeWindow, PERIOD};
use lz4pipe::config::{BUFFER_SIZE, PREFETCH_SIZE};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 241) as u8 ^ (i / 4099) as u8).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// EncodeWindow
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_window_reads_only_what_is_asked() {
    let data = pattern(10_000);
    let mut window = EncodeWindow::new(&data[..]);
    assert_eq!(window.cached(), 0);
    assert!(window.fill_to(16).unwrap());
    assert_eq!(window.cached(), 16);
    assert!(window.fill_to(8).unwrap(), "already cached");
    assert_eq!(window.cached(), 16);
    assert_eq!(window.data(), &data[..16]);
}

#[test]
fn encode_window_capacity_is_the_buffer_size() {
    let window = EncodeWindow::new(&b""[..]);
    assert_eq!(window.capacity(), BUFFER_SIZE);
}

#[test]
fn encode_window_exhaustion_is_sticky() {
    let mut window = EncodeWindow::new(&b"xyz"[..]);
    assert!(!window.fill_to(4).unwrap());
    assert!(!window.fill_to(4).unwrap());
    assert!(window.fill_to(3).unwrap());
    assert_eq!(window.data(), b"xyz");
}

#[test]
fn encode_window_compaction_drops_bytes_before_anchor() {
    let data = pattern(BUFFER_SIZE);
    let mut window = EncodeWindow::new(&data[..]);
    let end = BUFFER_SIZE - PREFETCH_SIZE + 100;
    window.fill_to(end).unwrap();
    let anchor = 50_000;
    let shift = window.compact(anchor, anchor + 10);
    assert_eq!(shift, anchor);
    assert_eq!(window.cached(), end - anchor);
    assert_eq!(window.data(), &data[anchor..end]);
    let [spilled, run] = window.literals(0, 10);
    assert!(spilled.is_empty());
    assert_eq!(run, &data[anchor..anchor + 10]);
}

// ─────────────────────────────────────────────────────────────────────────────
// DecodeWindow
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn period_table_keeps_the_pattern_aligned() {
    for offset in 1..4 {
        let trail = offset + PERIOD[offset];
        assert!(trail >= 4, "offset {offset}");
        assert_eq!(trail % offset, 0, "offset {offset}");
    }
}

#[test]
fn literals_then_overlapping_match() {
    let mut out = Vec::new();
    let mut window = DecodeWindow::new(&mut out);
    let mut src: &[u8] = b"abcde";
    window.copy_literals(&mut src, 5).unwrap();
    // offset 5, length 4 + 8 = 12, overlapping its own output
    window.copy_match(5, 8).unwrap();
    assert_eq!(window.produced(), 17);
    assert_eq!(window.finish().unwrap(), 17);
    assert_eq!(out, b"abcdeabcdeabcdeab");
}

#[test]
fn every_offset_up_to_sixteen_repeats_its_period() {
    for offset in 1..=16usize {
        let seed: Vec<u8> = (0..offset as u8).map(|i| b'A' + i).collect();
        let mut out = Vec::new();
        let mut window = DecodeWindow::new(&mut out);
        let mut src = &seed[..];
        window.copy_literals(&mut src, offset).unwrap();
        window.copy_match(offset, 37).unwrap();
        window.finish().unwrap();
        let expected: Vec<u8> = seed.iter().copied().cycle().take(offset + 41).collect();
        assert_eq!(out, expected, "offset {offset}");
    }
}

#[test]
fn match_longer_than_the_window_is_copied_in_chunks() {
    let mut out = Vec::new();
    let mut window = DecodeWindow::new(&mut out);
    let mut src: &[u8] = b"0123456789";
    window.copy_literals(&mut src, 10).unwrap();
    let extra = 3 * BUFFER_SIZE;
    window.copy_match(10, extra).unwrap();
    let total = 10 + 4 + extra;
    assert_eq!(window.finish().unwrap(), total as u64);
    assert_eq!(out.len(), total);
    assert!(out.chunks(10).all(|c| c == &b"0123456789"[..c.len()]));
}

#[test]
fn literal_run_longer_than_the_window() {
    let data = pattern(5 * BUFFER_SIZE / 2);
    let mut out = Vec::new();
    let mut window = DecodeWindow::new(&mut out);
    let mut src = &data[..];
    window.copy_literals(&mut src, data.len()).unwrap();
    window.finish().unwrap();
    assert_eq!(out, data);
}

#[test]
fn maximum_distance_survives_repeated_flushes() {
    // Every piece is long enough that a 65535-byte reference is legal.
    let data = pattern(2 * BUFFER_SIZE + 12_345);
    let mut out = Vec::new();
    let mut window = DecodeWindow::new(&mut out);
    let mut src = &data[..];
    for piece in data.chunks(66_000) {
        window.copy_literals(&mut src, piece.len()).unwrap();
        window.copy_match(65_535, 0).unwrap();
    }
    window.finish().unwrap();

    let mut expected = Vec::new();
    for piece in data.chunks(66_000) {
        expected.extend_from_slice(piece);
        let start = expected.len() - 65_535;
        for i in 0..4 {
            expected.push(expected[start + i]);
        }
    }
    assert_eq!(out, expected);
}

#[test]
fn out_of_range_offset_is_rejected_without_writing() {
    let mut out = Vec::new();
    let mut window = DecodeWindow::new(&mut out);
    let mut src: &[u8] = b"abc";
    window.copy_literals(&mut src, 3).unwrap();
    assert!(matches!(window.copy_match(4, 0), Err(DecompressError::MalformedInput)));
    assert_eq!(window.produced(), 3);
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoder over a window
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn finder_over_encode_window_matches_block_output_for_small_inputs() {
    // Inputs shorter than the window never compact, so the streaming and
    // block encoders make identical choices.
    let data = pattern(60_000);
    let mut window = EncodeWindow::new(&data[..]);
    let mut sink = StreamSink::new(Vec::new());
    MatchFinder::new().run(&mut window, &mut sink).unwrap();
    let streamed = sink.into_inner();
    assert_eq!(streamed, lz4pipe::compress_to_vec(&data).unwrap());
    assert_eq!(decompress_to_vec(&streamed).unwrap(), data);
}
