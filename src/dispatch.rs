//! Routing fuzz inputs to trials.

use crate::harness::{Filter, TrialOutcome};
use crate::{DispatchMode, HarnessConfig};
use tracing::debug;

/// Run the trial chosen by the first byte against the rest of the input
///
/// Returns `None` when the input is empty or the selector is unassigned.
pub fn dispatch_selector(data: &[u8], config: &HarnessConfig) -> Option<(Filter, TrialOutcome)> {
    let (&selector, payload) = data.split_first()?;
    let Some(filter) = Filter::from_selector(selector) else {
        debug!(selector, "unknown selector");
        return None;
    };
    Some((filter, filter.run(payload, config)))
}

/// Run every trial against the full input, in selector order
pub fn dispatch_all(data: &[u8], config: &HarnessConfig) -> Vec<(Filter, TrialOutcome)> {
    Filter::ALL.iter().map(|filter| (*filter, filter.run(data, config))).collect()
}

/// Dispatch according to `config.mode`, discarding the outcomes
pub fn dispatch(data: &[u8], config: &HarnessConfig) {
    match config.mode {
        DispatchMode::Selector => {
            dispatch_selector(data, config);
        }
        DispatchMode::Exhaustive => {
            dispatch_all(data, config);
        }
    }
}
