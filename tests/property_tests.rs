use proptest::prelude::*;
use roundtrip_harness::filters::{
    crc32, crc64, crc64_update, BranchArch, BranchConverter, DeltaState,
};
use roundtrip_harness::stream::{GrowableSink, LookWindow, SeekOrigin, SeqCursor};
use roundtrip_harness::{fuzz_one_input, HarnessConfig};
use std::num::NonZeroU8;

fn arch_strategy() -> impl Strategy<Value = BranchArch> {
    prop_oneof![
        Just(BranchArch::Arm),
        Just(BranchArch::ArmThumb),
        Just(BranchArch::Ia64),
        Just(BranchArch::PowerPc),
        Just(BranchArch::Sparc),
        Just(BranchArch::X86),
    ]
}

proptest! {
    #[test]
    fn test_sink_concatenates_chunks(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 0..20),
    ) {
        let mut sink = GrowableSink::new();
        for chunk in &chunks {
            prop_assert_eq!(sink.write(chunk), chunk.len());
        }

        let expected: Vec<u8> = chunks.concat();
        prop_assert_eq!(sink.size(), expected.len());
        prop_assert_eq!(sink.data(), &expected[..]);

        // Capacity is 0 or a power-of-two multiple of the first allocation
        let capacity = sink.capacity();
        prop_assert!(capacity == 0 || (capacity % 128 == 0 && (capacity / 128).is_power_of_two()));
    }

    #[test]
    fn test_cursor_reads_sum_to_length(
        data in prop::collection::vec(any::<u8>(), 0..2000),
        sizes in prop::collection::vec(1..200usize, 1..50),
    ) {
        let mut cursor = SeqCursor::new(&data);
        let mut collected = Vec::new();
        let mut total = 0;
        for size in sizes.iter().cycle().take(data.len() + 1) {
            let mut buf = vec![0u8; *size];
            let n = cursor.read(&mut buf);
            if n == 0 {
                break;
            }
            total += n;
            collected.extend_from_slice(&buf[..n]);
        }
        prop_assert_eq!(total, data.len());
        prop_assert_eq!(&collected, &data);
        prop_assert_eq!(cursor.read(&mut [0u8; 8]), 0);
    }

    #[test]
    fn test_seek_always_within_bounds(
        len in 0..500usize,
        start in 0..600i64,
        offset in any::<i64>(),
        origin in 0..3u32,
    ) {
        let data = vec![0u8; len];
        let mut window = LookWindow::new(&data);
        window.seek(start, SeekOrigin::Start);
        let position = window.seek_raw(offset, origin).unwrap();
        prop_assert!(position <= len as u64);
        prop_assert_eq!(position, window.position());
    }

    #[test]
    fn test_branch_roundtrip(
        arch in arch_strategy(),
        data in prop::collection::vec(any::<u8>(), 0..1024),
    ) {
        let mut work = data.clone();
        BranchConverter::new(arch).encode(&mut work, 0);
        BranchConverter::new(arch).decode(&mut work, 0);
        prop_assert_eq!(work, data);
    }

    #[test]
    fn test_delta_roundtrip(
        distance in 1..=255u8,
        data in prop::collection::vec(any::<u8>(), 0..1024),
    ) {
        let distance = NonZeroU8::new(distance).unwrap();
        let mut work = data.clone();
        DeltaState::new().encode(distance, &mut work);
        DeltaState::new().decode(distance, &mut work);
        prop_assert_eq!(work, data);
    }

    #[test]
    fn test_checksums_deterministic(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        prop_assert_eq!(crc32(&data), crc32(&data));
        prop_assert_eq!(crc64(&data), crc64(&data));
    }

    #[test]
    fn test_crc64_split_invariant(
        data in prop::collection::vec(any::<u8>(), 0..512),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(data.len() + 1);
        let (a, b) = data.split_at(at);
        prop_assert_eq!(crc64_update(crc64(a), b), crc64(&data));
    }

    #[test]
    fn test_entry_point_never_fails(data in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(fuzz_one_input(&data, &HarnessConfig::default()), 0);
        prop_assert_eq!(fuzz_one_input(&data, &HarnessConfig::exhaustive()), 0);
    }
}
