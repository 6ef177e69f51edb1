#![no_main]

use libfuzzer_sys::fuzz_target;
use roundtrip_harness::filters::BranchArch;
use roundtrip_harness::harness::branch;

fuzz_target!(|data: &[u8]| {
    branch::run(BranchArch::Sparc, data);
});
