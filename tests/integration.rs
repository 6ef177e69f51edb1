//! End-to-end tests for the round-trip harness.
//!
//! Drives every filter through the public entry point and through the
//! codec and stream APIs directly.

use std::io::{BufRead, Read, Seek, SeekFrom, Write};
use std::num::NonZeroU8;

use roundtrip_harness::filters::ppmd::PPMD_MIN_MEM_SIZE;
use roundtrip_harness::filters::{
    crc32, crc64, lzma_decode, BranchArch, BranchConverter, DeltaState, LzmaEncoder,
    LzmaEncoderProps, LzmaStatus, PpmdDecoder, PpmdEncoder, PPMD_MIN_ORDER,
};
use roundtrip_harness::harness::{branch, delta, lzma, ppmd};
use roundtrip_harness::stream::{
    ByteCursor, ByteSink, GrowableSink, LookInStream, LookWindow, SeekOrigin, SeqCursor,
};
use roundtrip_harness::{
    dispatch_all, dispatch_selector, fuzz_one_input, Error, Filter, HarnessConfig, SkipReason,
    TrialOutcome,
};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Generate random data using a simple PRNG
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        // Simple xorshift PRNG
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate code-like data dense in branch opcodes for every architecture
fn generate_code_like_data(size: usize) -> Vec<u8> {
    let noise = generate_random_data(size, 0x5EED);
    noise
        .iter()
        .enumerate()
        .map(|(i, &b)| match i % 16 {
            0 => 0xE8,
            4 => 0x00,
            7 => 0xEB,
            9 => 0xF0,
            11 => 0xF8,
            12 => 0x48,
            15 => 0x01,
            _ => b,
        })
        .collect()
}

/// Generate text with long repeats (good compression)
fn generate_text_data(size: usize) -> Vec<u8> {
    let sentence = b"It was the best of times, it was the worst of times. ";
    sentence.iter().cycle().take(size).copied().collect()
}

/// Prefix a payload with a selector byte and parameter bytes
fn fuzz_input(selector: u8, params: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(1 + params.len() + payload.len());
    input.push(selector);
    input.extend_from_slice(params);
    input.extend_from_slice(payload);
    input
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn test_delta_distance_one_constant_run() {
    let original = [5u8, 5, 5, 5];
    let distance = NonZeroU8::new(1).unwrap();

    let mut data = original;
    DeltaState::new().encode(distance, &mut data);
    DeltaState::new().decode(distance, &mut data);
    assert_eq!(data, original);

    assert!(delta::run(&[1, 5, 5, 5, 5]).is_completed());
}

#[test]
fn test_branch_below_instruction_width_is_noop() {
    for arch in [BranchArch::Arm, BranchArch::Sparc, BranchArch::X86, BranchArch::Ia64] {
        let original = vec![0xEBu8; arch.min_size() - 1];
        let mut data = original.clone();
        BranchConverter::new(arch).encode(&mut data, 0);
        assert_eq!(data, original);
        BranchConverter::new(arch).decode(&mut data, 0);
        assert_eq!(data, original);
    }
}

#[test]
fn test_growable_sink_doubles_past_initial_capacity() {
    let mut sink = GrowableSink::new();
    sink.write(&[0x42; 200]);
    assert_eq!(sink.size(), 200);
    assert!(sink.capacity() >= 256);
    assert_eq!(sink.data(), &[0x42; 200][..]);
}

#[test]
fn test_lzma_level0_fifty_identical_bytes() {
    let data = [b'#'; 50];
    let mut props = LzmaEncoderProps { level: 0, ..Default::default() };
    props.normalize(data.len() as u64);

    let mut encoder = LzmaEncoder::new(&props).unwrap();
    let mut sink = GrowableSink::new();
    encoder.encode(&mut SeqCursor::new(&data), &mut sink).unwrap();

    let mut window = LookWindow::new(sink.data());
    let decoded = lzma_decode(&encoder.properties(), &mut window, data.len()).unwrap();
    assert!(matches!(
        decoded.status,
        LzmaStatus::FinishedWithMark | LzmaStatus::MaybeFinishedWithoutMark
    ));
    assert_eq!(decoded.data, data);
}

#[test]
fn test_ppmd_min_order_single_byte() {
    let mut encoder = PpmdEncoder::new(ByteSink::new(), PPMD_MIN_ORDER, PPMD_MIN_MEM_SIZE).unwrap();
    encoder.encode_symbol(0xC3).unwrap();
    let sink = encoder.finish().unwrap();

    let mut decoder =
        PpmdDecoder::new(ByteCursor::new(sink.data()), PPMD_MIN_ORDER, PPMD_MIN_MEM_SIZE).unwrap();
    let symbol = decoder.decode_symbol();
    assert!(symbol >= 0);
    assert_eq!(symbol, 0xC3);
}

// ============================================================================
// Entry Point Tests
// ============================================================================

#[test]
fn test_entry_point_returns_zero() {
    let config = HarnessConfig::default();
    assert_eq!(fuzz_one_input(&[], &config), 0);
    assert_eq!(fuzz_one_input(&[200, 1, 2, 3], &config), 0);
    assert_eq!(fuzz_one_input(&fuzz_input(8, &[3], b"delta payload"), &config), 0);
}

#[test]
fn test_entry_point_every_selector() {
    let config = HarnessConfig::default();
    let payload = generate_code_like_data(2048);
    for selector in 0..=255u8 {
        // Reasonable LZMA parameters so selector 9 does real work
        let input = fuzz_input(selector, &[4, 3, 0, 2, 1, 27, 1, 2, 15, 0], &payload);
        assert_eq!(fuzz_one_input(&input, &config), 0);
    }
}

#[test]
fn test_exhaustive_mode_over_random_inputs() {
    let config = HarnessConfig::exhaustive();
    for seed in 1..=8u64 {
        let input = generate_random_data(300 * seed as usize, seed);
        assert_eq!(fuzz_one_input(&input, &config), 0);
    }
}

#[test]
fn test_selector_outcomes() {
    let config = HarnessConfig::default();

    let (filter, outcome) = dispatch_selector(&fuzz_input(0, &[], b"123456789"), &config).unwrap();
    assert_eq!((filter, outcome), (Filter::Crc32, TrialOutcome::Completed));

    let (filter, outcome) = dispatch_selector(&fuzz_input(8, &[0], b"abc"), &config).unwrap();
    assert_eq!((filter, outcome), (Filter::Delta, TrialOutcome::Skipped(SkipReason::ZeroDistance)));

    let (filter, outcome) = dispatch_selector(&fuzz_input(10, &[99], b"abc"), &config).unwrap();
    assert_eq!(
        (filter, outcome),
        (Filter::Ppmd, TrialOutcome::Skipped(SkipReason::OrderOutOfRange(99)))
    );

    assert!(dispatch_selector(&[11], &config).is_none());
}

#[test]
fn test_exhaustive_order_matches_selector_table() {
    let config = HarnessConfig::default();
    let results = dispatch_all(b"exhaustive", &config);
    for (selector, (filter, _)) in results.iter().enumerate() {
        assert_eq!(Filter::from_selector(selector as u8), Some(*filter));
    }
}

// ============================================================================
// Per-Filter Harness Tests
// ============================================================================

#[test]
fn test_branch_harness_code_like_data() {
    let data = generate_code_like_data(64 * 1024);
    for arch in [
        BranchArch::Arm,
        BranchArch::ArmThumb,
        BranchArch::Ia64,
        BranchArch::PowerPc,
        BranchArch::Sparc,
        BranchArch::X86,
    ] {
        assert!(branch::run(arch, &data).is_completed(), "{}", arch.name());
    }
}

#[test]
fn test_branch_encode_changes_code_like_data() {
    let original = generate_code_like_data(4096);
    let mut data = original.clone();
    BranchConverter::new(BranchArch::X86).encode(&mut data, 0);
    assert_ne!(data, original);
}

#[test]
fn test_delta_harness_random_data() {
    let payload = generate_random_data(10_000, 42);
    for distance in [1u8, 2, 4, 7, 16, 128, 255] {
        let mut input = vec![distance];
        input.extend_from_slice(&payload);
        assert!(delta::run(&input).is_completed());
    }
}

#[test]
fn test_lzma_harness_parameter_sweep() {
    let payload = generate_text_data(5000);
    let dict = HarnessConfig::default().lzma_dict_size;
    for level in [0u8, 1, 5, 9] {
        for (algo, bt) in [(0u8, 0u8), (0, 1), (1, 0), (1, 1)] {
            let params = [level, 3, 0, 2, algo, 27, bt, 2, 15, 1];
            let mut input = params.to_vec();
            input.extend_from_slice(&payload);
            assert!(lzma::run(&input, dict).is_completed(), "level {level} algo {algo} bt {bt}");
        }
    }
}

#[test]
fn test_lzma_harness_incompressible() {
    let mut input = vec![3, 0, 0, 0, 1, 40, 1, 1, 8, 0];
    input.extend(generate_random_data(20_000, 7));
    assert!(lzma::run(&input, 1 << 16).is_completed());
}

#[test]
fn test_ppmd_harness_orders() {
    let payload = generate_text_data(4000);
    for order in [2u8, 3, 6, 16, 64] {
        let mut input = vec![order];
        input.extend_from_slice(&payload);
        assert!(ppmd::run(&input, 1 << 20).is_completed(), "order {order}");
    }
}

// ============================================================================
// Checksum Tests
// ============================================================================

#[test]
fn test_checksums_deterministic() {
    for data in [Vec::new(), vec![0x61], generate_random_data(8192, 99)] {
        assert_eq!(crc32(&data), crc32(&data));
        assert_eq!(crc64(&data), crc64(&data));
    }
}

#[test]
fn test_checksums_distinguish_inputs() {
    assert_ne!(crc32(b"abc"), crc32(b"abd"));
    assert_ne!(crc64(b"abc"), crc64(b"abd"));
}

// ============================================================================
// Stream Adapter Tests
// ============================================================================

#[test]
fn test_window_seek_clamps() {
    let data = generate_random_data(40, 3);
    let n = data.len() as i64;
    let mut window = LookWindow::new(&data);

    assert_eq!(window.seek(-5, SeekOrigin::Start), 0);
    assert_eq!(window.seek(n + 100, SeekOrigin::Start), n as u64);
    assert_eq!(window.seek(0, SeekOrigin::End), n as u64);
    assert_eq!(window.seek(-(n + 1), SeekOrigin::End), 0);
}

#[test]
fn test_window_invalid_origin() {
    let data = [1u8, 2, 3];
    let mut window = LookWindow::new(&data);
    window.skip(2);
    assert!(matches!(window.seek_raw(0, 3), Err(Error::InvalidSeekOrigin(3))));
    assert_eq!(window.position(), 2);
}

#[test]
fn test_window_through_trait_object() {
    let data = b"look ahead".to_vec();
    let mut window = LookWindow::new(&data);
    let stream: &mut dyn LookInStream = &mut window;

    assert_eq!(stream.look(4), b"look");
    stream.skip(5);
    let mut buf = [0u8; 16];
    assert_eq!(stream.read(&mut buf), 5);
    assert_eq!(&buf[..5], b"ahead");
}

#[test]
fn test_window_std_io() {
    let data = b"line one\nline two\n".to_vec();
    let mut window = LookWindow::new(&data);

    let mut line = String::new();
    window.read_line(&mut line).unwrap();
    assert_eq!(line, "line one\n");

    Seek::seek(&mut window, SeekFrom::End(-4)).unwrap();
    let mut rest = Vec::new();
    window.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"two\n");
}

#[test]
fn test_sinks_as_writers() {
    let mut sink = GrowableSink::new();
    for _ in 0..100 {
        sink.write_all(b"0123456789").unwrap();
    }
    assert_eq!(sink.size(), 1000);
    assert_eq!(sink.capacity(), 1024);

    let mut bytes = ByteSink::new();
    write!(bytes, "{}-{}", 12, 34).unwrap();
    assert_eq!(bytes.data(), b"12-34");
}

#[test]
fn test_cursors_drain_exactly() {
    let data = generate_random_data(1000, 11);

    let mut cursor = SeqCursor::new(&data);
    let mut collected = Vec::new();
    let mut buf = [0u8; 77];
    loop {
        let n = cursor.read(&mut buf);
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..n]);
    }
    assert_eq!(&collected, &data);
    assert_eq!(cursor.read(&mut buf), 0);

    let mut bytes = ByteCursor::new(&data[..3]);
    let first_three = [bytes.read_byte(), bytes.read_byte(), bytes.read_byte()];
    assert_eq!(first_three, [data[0], data[1], data[2]]);
    assert!(bytes.is_exhausted());
    assert_eq!(bytes.read_byte(), 0);
}
