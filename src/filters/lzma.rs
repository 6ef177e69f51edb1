use crate::error::{Error, Result};
use crate::stream::{LookWindow, SeqInStream, SeqOutStream};
use xz2::stream::{Action, LzmaOptions, MatchFinder, Mode, Status, Stream};

/// Size of the serialized properties blob (lc/lp/pb byte + dictionary size)
pub const LZMA_PROPS_SIZE: usize = 5;

/// `.lzma` container header: properties plus a 64-bit uncompressed size
const LZMA_HEADER_SIZE: usize = LZMA_PROPS_SIZE + 8;

/// Smallest dictionary the backend accepts
pub const LZMA_DICT_MIN: u32 = 1 << 12;

/// Largest `lc + lp` the backend accepts
pub const LCLP_MAX: u32 = 4;

/// Largest value of the packed lc/lp/pb byte
const LCLPPB_MAX: u8 = 9 * 5 * 5 - 1;

/// Bytes moved per backend call in either direction
const CHUNK_SIZE: usize = 1 << 16;

/// Encoder tuning parameters
///
/// `algo` selects fast (0) or normal (1) parsing, `fb` is the number of
/// fast bytes, `mc` the match-finder cycle count. `lc + lp` may not exceed
/// [`LCLP_MAX`]. Every stream is closed with an end marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LzmaEncoderProps {
    pub level: u32,
    pub lc: u32,
    pub lp: u32,
    pub pb: u32,
    pub algo: u32,
    pub fb: u32,
    pub bt_mode: bool,
    pub num_hash_bytes: u32,
    pub mc: u32,
    pub dict_size: u32,
}

impl Default for LzmaEncoderProps {
    fn default() -> Self {
        Self {
            level: 5,
            lc: 3,
            lp: 0,
            pb: 2,
            algo: 1,
            fb: 32,
            bt_mode: true,
            num_hash_bytes: 4,
            mc: 32,
            dict_size: 1 << 24,
        }
    }
}

impl LzmaEncoderProps {
    /// Clamp out-of-range values and shrink the dictionary to fit `data_len`
    ///
    /// The dictionary becomes the smallest `2 << i` or `3 << i` (at least
    /// 4 KiB) that covers the data, so short inputs don't pay for a 16 MiB
    /// match finder.
    pub fn normalize(&mut self, data_len: u64) {
        self.level = self.level.min(9);
        self.algo = self.algo.min(1);
        self.num_hash_bytes = self.num_hash_bytes.clamp(2, 4);

        if data_len < u64::from(self.dict_size) {
            for i in 11..=30 {
                if data_len <= 2u64 << i {
                    self.dict_size = 2 << i;
                    break;
                }
                if data_len <= 3u64 << i {
                    self.dict_size = 3 << i;
                    break;
                }
            }
        }
        self.dict_size = self.dict_size.max(LZMA_DICT_MIN);
    }

    fn match_finder(&self) -> MatchFinder {
        match (self.bt_mode, self.num_hash_bytes) {
            (true, 2) => MatchFinder::BinaryTree2,
            (true, 3) => MatchFinder::BinaryTree3,
            (true, _) => MatchFinder::BinaryTree4,
            (false, 4) => MatchFinder::HashChain4,
            (false, _) => MatchFinder::HashChain3,
        }
    }

    fn to_options(&self) -> Result<LzmaOptions> {
        let mut options = LzmaOptions::new_preset(self.level)?;
        options
            .dict_size(self.dict_size)
            .literal_context_bits(self.lc)
            .literal_position_bits(self.lp)
            .position_bits(self.pb)
            .mode(if self.algo == 0 { Mode::Fast } else { Mode::Normal })
            .nice_len(self.fb)
            .match_finder(self.match_finder())
            .depth(self.mc);
        Ok(options)
    }

    /// Serialized properties the decoder needs
    pub fn properties(&self) -> [u8; LZMA_PROPS_SIZE] {
        let mut blob = [0u8; LZMA_PROPS_SIZE];
        blob[0] = ((self.pb * 5 + self.lp) * 9 + self.lc) as u8;
        blob[1..].copy_from_slice(&self.dict_size.to_le_bytes());
        blob
    }
}

/// Decoder view of a properties blob
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LzmaProperties {
    pub lc: u32,
    pub lp: u32,
    pub pb: u32,
    pub dict_size: u32,
}

impl LzmaProperties {
    pub fn parse(blob: &[u8; LZMA_PROPS_SIZE]) -> Result<Self> {
        let packed = blob[0];
        if packed > LCLPPB_MAX {
            return Err(Error::InvalidProperties(packed));
        }
        let packed = u32::from(packed);
        Ok(Self {
            lc: packed % 9,
            lp: (packed / 9) % 5,
            pb: packed / 45,
            dict_size: u32::from_le_bytes([blob[1], blob[2], blob[3], blob[4]]),
        })
    }
}

/// Streaming LZMA encoder reading from a pull source and writing to a push sink
///
/// The sink receives the bare compressed stream; the properties travel
/// separately through [`LzmaEncoder::properties`].
pub struct LzmaEncoder {
    props: LzmaEncoderProps,
    stream: Stream,
    /// Container header bytes still to be dropped from the backend output
    header_remaining: usize,
}

impl LzmaEncoder {
    /// Fails when the backend rejects the parameter combination
    pub fn new(props: &LzmaEncoderProps) -> Result<Self> {
        let options = props.to_options()?;
        let stream = Stream::new_lzma_encoder(&options)?;
        Ok(Self { props: props.clone(), stream, header_remaining: LZMA_HEADER_SIZE })
    }

    pub fn properties(&self) -> [u8; LZMA_PROPS_SIZE] {
        self.props.properties()
    }

    /// Compress everything `input` yields into `output`
    ///
    /// Returns the number of compressed bytes written.
    pub fn encode<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<u64>
    where
        R: SeqInStream + ?Sized,
        W: SeqOutStream + ?Sized,
    {
        let mut in_buf = vec![0u8; CHUNK_SIZE];
        let mut out_buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            let n = input.read(&mut in_buf);
            let finishing = n == 0;
            let mut pending = &in_buf[..n];

            loop {
                let action = if finishing { Action::Finish } else { Action::Run };
                let before_in = self.stream.total_in();
                let before_out = self.stream.total_out();
                let status = self.stream.process(pending, &mut out_buf, action)?;
                let consumed = (self.stream.total_in() - before_in) as usize;
                let produced = (self.stream.total_out() - before_out) as usize;

                pending = &pending[consumed..];

                let header = self.header_remaining.min(produced);
                self.header_remaining -= header;
                written += output.write(&out_buf[header..produced]) as u64;

                if matches!(status, Status::StreamEnd) {
                    return Ok(written);
                }
                if !finishing && pending.is_empty() {
                    break;
                }
                if consumed == 0 && produced == 0 && matches!(status, Status::MemNeeded) {
                    return Err(Error::LzmaStalled);
                }
            }
        }
    }
}

/// Completion state reported by [`lzma_decode`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LzmaStatus {
    /// An end marker closed the stream
    FinishedWithMark,
    /// Exactly the expected bytes were produced and the input is used up
    MaybeFinishedWithoutMark,
    /// Input remains, or output went past the expected length
    NotFinished,
    /// Input ran out before the expected length was reached
    NeedsMoreInput,
}

impl LzmaStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::FinishedWithMark | Self::MaybeFinishedWithoutMark)
    }
}

#[derive(Debug)]
pub struct LzmaDecoded {
    pub data: Vec<u8>,
    /// Compressed bytes taken from the window
    pub consumed: usize,
    pub status: LzmaStatus,
}

/// Decode a raw LZMA stream from `input` expecting `expected_len` bytes
pub fn lzma_decode(
    properties: &[u8; LZMA_PROPS_SIZE],
    input: &mut LookWindow<'_>,
    expected_len: usize,
) -> Result<LzmaDecoded> {
    LzmaProperties::parse(properties)?;
    let mut stream = Stream::new_lzma_decoder(u64::MAX)?;

    let start = input.position();
    // One spare byte so output past the expected length is visible
    let mut data = Vec::with_capacity(expected_len + 1);

    // Unknown-size header: the stream must end with a marker or run dry
    let mut header = [0xFFu8; LZMA_HEADER_SIZE];
    header[..LZMA_PROPS_SIZE].copy_from_slice(properties);
    let mut pending = &header[..];
    while !pending.is_empty() {
        let before_in = stream.total_in();
        stream.process_vec(pending, &mut data, Action::Run)?;
        let used = (stream.total_in() - before_in) as usize;
        if used == 0 {
            return Err(Error::LzmaStalled);
        }
        pending = &pending[used..];
    }

    let status = loop {
        let chunk = input.look(CHUNK_SIZE);
        let before_in = stream.total_in();
        let before_out = data.len();
        let status = stream.process_vec(chunk, &mut data, Action::Run)?;
        let consumed = (stream.total_in() - before_in) as usize;
        input.skip(consumed);

        if matches!(status, Status::StreamEnd) {
            break if data.len() > expected_len {
                LzmaStatus::NotFinished
            } else {
                LzmaStatus::FinishedWithMark
            };
        }
        if data.len() > expected_len {
            break LzmaStatus::NotFinished;
        }
        if consumed == 0 && data.len() == before_out {
            break if input.remaining() > 0 {
                LzmaStatus::NotFinished
            } else if data.len() == expected_len {
                LzmaStatus::MaybeFinishedWithoutMark
            } else {
                LzmaStatus::NeedsMoreInput
            };
        }
    };

    Ok(LzmaDecoded { data, consumed: (input.position() - start) as usize, status })
}
