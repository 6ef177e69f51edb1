use super::{assert_recovered, split_params, Filter, SkipReason, TrialOutcome};
use crate::filters::DeltaState;
use std::num::NonZeroU8;

/// First byte is the distance, the rest is the payload
pub fn run(data: &[u8]) -> TrialOutcome {
    let ([distance], payload) = match split_params::<1>(data) {
        Ok(split) => split,
        Err(reason) => return TrialOutcome::Skipped(reason),
    };
    let Some(distance) = NonZeroU8::new(distance) else {
        return TrialOutcome::Skipped(SkipReason::ZeroDistance);
    };
    if payload.is_empty() {
        return TrialOutcome::Skipped(SkipReason::EmptyPayload);
    }

    let mut work = payload.to_vec();
    DeltaState::new().encode(distance, &mut work);
    DeltaState::new().decode(distance, &mut work);
    assert_recovered(Filter::Delta, payload, &work);
    TrialOutcome::Completed
}
