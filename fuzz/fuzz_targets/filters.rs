#![no_main]

use libfuzzer_sys::fuzz_target;
use roundtrip_harness::{fuzz_one_input, HarnessConfig};

// First byte selects the filter; unassigned selectors do nothing
fuzz_target!(|data: &[u8]| {
    fuzz_one_input(data, &HarnessConfig::default());
});
