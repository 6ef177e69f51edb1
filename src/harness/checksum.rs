use super::TrialOutcome;
use crate::filters::checksum::{crc32, crc64};
use std::hint::black_box;

/// CRC-32 over the whole input; only checks that nothing panics
pub fn run_crc32(data: &[u8]) -> TrialOutcome {
    black_box(crc32(black_box(data)));
    TrialOutcome::Completed
}

/// CRC-64 over the whole input; only checks that nothing panics
pub fn run_crc64(data: &[u8]) -> TrialOutcome {
    black_box(crc64(black_box(data)));
    TrialOutcome::Completed
}
