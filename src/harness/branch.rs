use super::{assert_recovered, Filter, SkipReason, TrialOutcome};
use crate::filters::{BranchArch, BranchConverter};

/// Start address for both passes; ARM-family converters assume aligned code
const START_IP: u32 = 0;

/// Encode then decode the whole input with a fresh converter per pass
pub fn run(arch: BranchArch, data: &[u8]) -> TrialOutcome {
    if data.is_empty() {
        return TrialOutcome::Skipped(SkipReason::EmptyPayload);
    }

    let mut work = data.to_vec();
    BranchConverter::new(arch).encode(&mut work, START_IP);
    BranchConverter::new(arch).decode(&mut work, START_IP);
    assert_recovered(Filter::Branch(arch), data, &work);
    TrialOutcome::Completed
}
