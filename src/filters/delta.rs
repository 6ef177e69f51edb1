use std::num::NonZeroU8;

/// Size of the delta history, enough for any distance
pub const DELTA_STATE_SIZE: usize = 256;

/// History of the last `distance` bytes seen by a delta encoder or decoder
///
/// A new state is all zeros; encode and decode each need their own fresh one.
#[derive(Clone, Debug)]
pub struct DeltaState {
    history: [u8; DELTA_STATE_SIZE],
}

impl DeltaState {
    pub fn new() -> Self {
        Self { history: [0u8; DELTA_STATE_SIZE] }
    }

    /// Replace each byte with its difference from the byte `distance` back
    pub fn encode(&mut self, distance: NonZeroU8, data: &mut [u8]) {
        self.apply(distance, data, |history, b| {
            let out = b.wrapping_sub(*history);
            *history = b;
            out
        });
    }

    /// Undo [`DeltaState::encode`]
    pub fn decode(&mut self, distance: NonZeroU8, data: &mut [u8]) {
        self.apply(distance, data, |history, b| {
            let out = b.wrapping_add(*history);
            *history = out;
            out
        });
    }

    fn apply<F>(&mut self, distance: NonZeroU8, data: &mut [u8], mut step: F)
    where
        F: FnMut(&mut u8, u8) -> u8,
    {
        let delta = distance.get() as usize;
        let mut buf = [0u8; DELTA_STATE_SIZE];
        buf[..delta].copy_from_slice(&self.history[..delta]);

        let mut j = 0;
        for chunk in data.chunks_mut(delta) {
            j = 0;
            for b in chunk.iter_mut() {
                *b = step(&mut buf[j], *b);
                j += 1;
            }
        }

        // Rotate so the oldest byte is first again for the next call
        if j == delta {
            j = 0;
        }
        self.history[..delta - j].copy_from_slice(&buf[j..delta]);
        self.history[delta - j..delta].copy_from_slice(&buf[..j]);
    }
}

impl Default for DeltaState {
    fn default() -> Self {
        Self::new()
    }
}
