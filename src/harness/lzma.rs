use super::{assert_recovered, split_params, Filter, SkipReason, TrialOutcome};
use crate::filters::lzma::LCLP_MAX;
use crate::filters::{lzma_decode, LzmaEncoder, LzmaEncoderProps};
use crate::stream::{GrowableSink, LookWindow, SeqCursor};
use tracing::debug;

/// Bytes of encoder tuning taken from the front of the input
pub const LZMA_PARAM_BYTES: usize = 10;

/// Map the raw parameter prefix onto encoder properties
///
/// Every prefix maps to a combination the backend accepts.
///
/// | byte | property                        |
/// |------|---------------------------------|
/// | 0    | level, at most 9                |
/// | 1    | lc, `b % 5`                     |
/// | 2    | lp, at most `4 - lc`            |
/// | 3    | pb, at most 4                   |
/// | 4    | normal parsing if non-zero      |
/// | 5    | fast bytes, `5 + b`             |
/// | 6    | binary tree if non-zero         |
/// | 7    | hash bytes, `2 + b % 3`         |
/// | 8    | match cycles, `1 + b`           |
/// | 9    | unused, every stream is marked  |
pub fn props_from_params(params: &[u8; LZMA_PARAM_BYTES], dict_size: u32) -> LzmaEncoderProps {
    let lc = u32::from(params[1]) % (LCLP_MAX + 1);
    LzmaEncoderProps {
        level: u32::from(params[0].min(9)),
        lc,
        lp: u32::from(params[2]).min(LCLP_MAX - lc),
        pb: u32::from(params[3].min(4)),
        algo: u32::from(params[4] != 0),
        fb: 5 + u32::from(params[5]),
        bt_mode: params[6] != 0,
        num_hash_bytes: 2 + u32::from(params[7] % 3),
        mc: 1 + u32::from(params[8]),
        dict_size,
    }
}

/// Compress the payload after the parameter prefix and decompress it again
pub fn run(data: &[u8], dict_size: u32) -> TrialOutcome {
    let (params, payload) = match split_params::<LZMA_PARAM_BYTES>(data) {
        Ok(split) => split,
        Err(reason) => return TrialOutcome::Skipped(reason),
    };
    if payload.is_empty() {
        return TrialOutcome::Skipped(SkipReason::EmptyPayload);
    }

    let mut props = props_from_params(&params, dict_size);
    props.normalize(payload.len() as u64);

    let mut encoder = match LzmaEncoder::new(&props) {
        Ok(encoder) => encoder,
        Err(e) => {
            debug!(?props, error = %e, "encoder rejected parameters");
            return TrialOutcome::Skipped(SkipReason::ParametersRejected);
        }
    };

    let mut sink = GrowableSink::new();
    let written = encoder
        .encode(&mut SeqCursor::new(payload), &mut sink)
        .unwrap_or_else(|e| panic!("lzma encode failed with {props:?}: {e}"));
    assert!(written > 0, "lzma encoder produced no output for {} bytes", payload.len());

    let properties = encoder.properties();
    let compressed = sink.data();
    let mut window = LookWindow::new(compressed);
    let decoded = lzma_decode(&properties, &mut window, payload.len())
        .unwrap_or_else(|e| panic!("lzma decode failed with {props:?}: {e}"));

    assert!(
        decoded.status.is_finished(),
        "lzma decoder stopped with {:?} after {} of {} bytes",
        decoded.status,
        decoded.data.len(),
        payload.len()
    );
    assert_eq!(
        decoded.consumed,
        compressed.len(),
        "lzma decoder left compressed bytes unread"
    );
    assert_recovered(Filter::Lzma, payload, &decoded.data);
    TrialOutcome::Completed
}
