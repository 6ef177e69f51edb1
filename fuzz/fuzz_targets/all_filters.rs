#![no_main]

use libfuzzer_sys::fuzz_target;
use roundtrip_harness::{fuzz_one_input, HarnessConfig};

fuzz_target!(|data: &[u8]| {
    fuzz_one_input(data, &HarnessConfig::exhaustive());
});
