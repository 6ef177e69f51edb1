//! Round-trip trials, one per filter family.
//!
//! A trial derives its parameters from a fixed prefix of the input, runs the
//! filter forward and backward on a private copy of the rest, and panics if
//! the original bytes are not recovered. Inputs that cannot form a trial are
//! skipped, never reported.

pub mod branch;
pub mod checksum;
pub mod delta;
pub mod lzma;
pub mod ppmd;

use crate::filters::BranchArch;
use crate::HarnessConfig;
use tracing::{debug, trace};

/// Every filter the harness knows, in selector order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Crc32,
    Crc64,
    Branch(BranchArch),
    Delta,
    Lzma,
    Ppmd,
}

impl Filter {
    /// Fixed run order for exhaustive dispatch; index is the selector byte
    pub const ALL: [Filter; 11] = [
        Filter::Crc32,
        Filter::Crc64,
        Filter::Branch(BranchArch::Arm),
        Filter::Branch(BranchArch::ArmThumb),
        Filter::Branch(BranchArch::Ia64),
        Filter::Branch(BranchArch::PowerPc),
        Filter::Branch(BranchArch::Sparc),
        Filter::Branch(BranchArch::X86),
        Filter::Delta,
        Filter::Lzma,
        Filter::Ppmd,
    ];

    /// Filter for a selector byte, or `None` for unassigned values
    pub fn from_selector(selector: u8) -> Option<Self> {
        Self::ALL.get(usize::from(selector)).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Crc32 => "crc32",
            Self::Crc64 => "crc64",
            Self::Branch(arch) => arch.name(),
            Self::Delta => "delta",
            Self::Lzma => "lzma",
            Self::Ppmd => "ppmd",
        }
    }

    /// Run one trial over `data`
    ///
    /// # Panics
    ///
    /// When the filter fails to reproduce its input, or a codec reports an
    /// error or status a valid round trip never produces.
    pub fn run(&self, data: &[u8], config: &HarnessConfig) -> TrialOutcome {
        let outcome = match self {
            Self::Crc32 => checksum::run_crc32(data),
            Self::Crc64 => checksum::run_crc64(data),
            Self::Branch(arch) => branch::run(*arch, data),
            Self::Delta => delta::run(data),
            Self::Lzma => lzma::run(data, config.lzma_dict_size),
            Self::Ppmd => ppmd::run(data, config.ppmd_mem_size),
        };

        match &outcome {
            TrialOutcome::Completed => {
                trace!(filter = self.name(), len = data.len(), "trial completed");
            }
            TrialOutcome::Skipped(reason) => {
                debug!(filter = self.name(), len = data.len(), ?reason, "trial skipped");
            }
        }
        outcome
    }
}

/// Result of a trial that did not panic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialOutcome {
    Completed,
    Skipped(SkipReason),
}

impl TrialOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Why an input carried no test value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer bytes than the parameter prefix needs
    MissingParameters { needed: usize, got: usize },
    /// Nothing left to transform after the prefix
    EmptyPayload,
    ZeroDistance,
    OrderOutOfRange(u32),
    /// Configured PPMd model memory the backend can't allocate
    MemoryOutOfRange(u32),
    /// The codec refused the derived parameter combination
    ParametersRejected,
}

/// Split a fixed-size parameter prefix off the input
pub(crate) fn split_params<const N: usize>(data: &[u8]) -> Result<([u8; N], &[u8]), SkipReason> {
    if data.len() < N {
        return Err(SkipReason::MissingParameters { needed: N, got: data.len() });
    }
    let (head, payload) = data.split_at(N);
    let mut params = [0u8; N];
    params.copy_from_slice(head);
    Ok((params, payload))
}

/// Panic unless `recovered` matches `original` byte for byte
pub(crate) fn assert_recovered(filter: Filter, original: &[u8], recovered: &[u8]) {
    if original == recovered {
        return;
    }
    let offset = original
        .iter()
        .zip(recovered)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| original.len().min(recovered.len()));
    panic!(
        "{} round trip diverged at offset {offset}: original {} bytes, recovered {} bytes",
        filter.name(),
        original.len(),
        recovered.len()
    );
}
