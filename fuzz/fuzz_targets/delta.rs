#![no_main]

use libfuzzer_sys::fuzz_target;
use roundtrip_harness::harness::delta;

fuzz_target!(|data: &[u8]| {
    delta::run(data);
});
