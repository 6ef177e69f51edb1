#![no_main]

use libfuzzer_sys::fuzz_target;
use roundtrip_harness::harness::lzma;
use roundtrip_harness::HarnessConfig;

fuzz_target!(|data: &[u8]| {
    // Ten parameter bytes, then the payload
    lzma::run(data, HarnessConfig::default().lzma_dict_size);
});
