#![no_main]

use libfuzzer_sys::fuzz_target;
use roundtrip_harness::harness::ppmd;
use roundtrip_harness::HarnessConfig;

fuzz_target!(|data: &[u8]| {
    ppmd::run(data, HarnessConfig::default().ppmd_mem_size);
});
