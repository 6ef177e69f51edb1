use super::{split_params, SkipReason, TrialOutcome};
use crate::filters::ppmd::{
    mem_size_in_range, PpmdDecoder, PpmdEncoder, PPMD_MAX_ORDER, PPMD_MIN_ORDER,
};
use crate::stream::{ByteCursor, ByteSink};

/// Range coder output is never shorter than its flushed low register
const MIN_COMPRESSED_SIZE: usize = 5;

/// First byte is the model order, the rest is fed one symbol at a time
pub fn run(data: &[u8], mem_size: u32) -> TrialOutcome {
    let ([order], payload) = match split_params::<1>(data) {
        Ok(split) => split,
        Err(reason) => return TrialOutcome::Skipped(reason),
    };
    let order = u32::from(order);
    if !(PPMD_MIN_ORDER..=PPMD_MAX_ORDER).contains(&order) {
        return TrialOutcome::Skipped(SkipReason::OrderOutOfRange(order));
    }
    if payload.is_empty() {
        return TrialOutcome::Skipped(SkipReason::EmptyPayload);
    }
    if !mem_size_in_range(mem_size) {
        return TrialOutcome::Skipped(SkipReason::MemoryOutOfRange(mem_size));
    }

    let mut encoder = PpmdEncoder::new(ByteSink::new(), order, mem_size)
        .unwrap_or_else(|e| panic!("ppmd encoder init failed (order {order}): {e}"));
    for &symbol in payload {
        encoder
            .encode_symbol(symbol)
            .unwrap_or_else(|e| panic!("ppmd encode failed (order {order}): {e}"));
    }
    let sink = encoder
        .finish()
        .unwrap_or_else(|e| panic!("ppmd flush failed (order {order}): {e}"));
    assert!(
        sink.size() >= MIN_COMPRESSED_SIZE,
        "ppmd output is {} bytes, expected at least {MIN_COMPRESSED_SIZE}",
        sink.size()
    );

    let mut decoder = PpmdDecoder::new(ByteCursor::new(sink.data()), order, mem_size)
        .unwrap_or_else(|e| panic!("ppmd decoder init failed (order {order}): {e}"));
    for (offset, &expected) in payload.iter().enumerate() {
        let symbol = decoder.decode_symbol();
        assert!(symbol >= 0, "ppmd returned invalid symbol at offset {offset} (order {order})");
        assert_eq!(
            symbol,
            i32::from(expected),
            "ppmd round trip diverged at offset {offset} (order {order})"
        );
    }
    TrialOutcome::Completed
}
