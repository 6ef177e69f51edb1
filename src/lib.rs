//! Differential round-trip fuzzing for reversible byte filters.
//!
//! Each fuzz input is turned into one or more trials: a filter runs forward
//! and backward over a copy of the input and the harness panics when the
//! original bytes don't come back. libFuzzer records the panic as a crash.
//!
//! ```
//! use roundtrip_harness::{fuzz_one_input, HarnessConfig};
//!
//! // Selector 8 is the delta filter, distance 1
//! assert_eq!(fuzz_one_input(&[8, 1, 5, 5, 5, 5], &HarnessConfig::default()), 0);
//! ```

pub mod dispatch;
pub mod error;
pub mod filters;
pub mod harness;
pub mod stream;

pub use dispatch::{dispatch, dispatch_all, dispatch_selector};
pub use error::{Error, Result};
pub use harness::{Filter, SkipReason, TrialOutcome};

use filters::ppmd::PPMD_MIN_MEM_SIZE;

/// How an input is routed to trials
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// First byte picks one filter, the rest is its input
    #[default]
    Selector,
    /// Every filter runs over the full input
    Exhaustive,
}

/// Configuration for a fuzzing session
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Routing of inputs to trials (default: selector byte)
    pub mode: DispatchMode,
    /// LZMA dictionary before it is shrunk to fit the payload (default: 16 MiB)
    pub lzma_dict_size: u32,
    /// PPMd model memory (default: the smallest the model accepts)
    pub ppmd_mem_size: u32,
}

impl HarnessConfig {
    pub fn exhaustive() -> Self {
        Self { mode: DispatchMode::Exhaustive, ..Self::default() }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Selector,
            lzma_dict_size: 1 << 24,
            ppmd_mem_size: PPMD_MIN_MEM_SIZE,
        }
    }
}

/// Fuzz entry point; always returns 0
///
/// Deterministic for a given input and config. Round-trip failures panic
/// instead of returning.
pub fn fuzz_one_input(data: &[u8], config: &HarnessConfig) -> i32 {
    dispatch(data, config);
    0
}
