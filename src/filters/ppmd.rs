use crate::error::{Error, Result};
use ppmd_rust::{Ppmd7Decoder, Ppmd7Encoder};
use std::io::{Read, Write};

pub use ppmd_rust::{
    PPMD7_MAX_MEM_SIZE as PPMD_MAX_MEM_SIZE, PPMD7_MAX_ORDER as PPMD_MAX_ORDER,
    PPMD7_MIN_MEM_SIZE as PPMD_MIN_MEM_SIZE, PPMD7_MIN_ORDER as PPMD_MIN_ORDER,
};

/// Returned by [`PpmdDecoder::decode_symbol`] when no symbol could be decoded
pub const PPMD_INVALID_SYMBOL: i32 = -1;

fn check_order(order: u32) -> Result<()> {
    if !(PPMD_MIN_ORDER..=PPMD_MAX_ORDER).contains(&order) {
        return Err(Error::InvalidOrder { order, min: PPMD_MIN_ORDER, max: PPMD_MAX_ORDER });
    }
    Ok(())
}

/// Whether the model can be allocated with `mem_size` bytes
pub fn mem_size_in_range(mem_size: u32) -> bool {
    (PPMD_MIN_MEM_SIZE..=PPMD_MAX_MEM_SIZE).contains(&mem_size)
}

fn check_mem_size(size: u32) -> Result<()> {
    if !mem_size_in_range(size) {
        return Err(Error::InvalidMemSize {
            size,
            min: PPMD_MIN_MEM_SIZE,
            max: PPMD_MAX_MEM_SIZE,
        });
    }
    Ok(())
}

fn backend<E: std::fmt::Debug>(err: E) -> Error {
    Error::Ppmd(format!("{err:?}"))
}

/// Symbol-at-a-time PPMd encoder writing through a range coder into `W`
pub struct PpmdEncoder<W: Write> {
    inner: Ppmd7Encoder<W>,
}

impl<W: Write> PpmdEncoder<W> {
    pub fn new(sink: W, order: u32, mem_size: u32) -> Result<Self> {
        check_order(order)?;
        check_mem_size(mem_size)?;
        let inner = Ppmd7Encoder::new(sink, order, mem_size).map_err(backend)?;
        Ok(Self { inner })
    }

    pub fn encode_symbol(&mut self, symbol: u8) -> Result<()> {
        self.inner.write_all(std::slice::from_ref(&symbol))?;
        Ok(())
    }

    /// Flush the range coder and hand back the sink
    pub fn finish(self) -> Result<W> {
        self.inner.finish(false).map_err(backend)
    }
}

/// Symbol-at-a-time PPMd decoder pulling bytes from `R`
pub struct PpmdDecoder<R: Read> {
    inner: Ppmd7Decoder<R>,
}

impl<R: Read> PpmdDecoder<R> {
    /// Fails when the range coder header is invalid
    pub fn new(source: R, order: u32, mem_size: u32) -> Result<Self> {
        check_order(order)?;
        check_mem_size(mem_size)?;
        let inner = Ppmd7Decoder::new(source, order, mem_size).map_err(backend)?;
        Ok(Self { inner })
    }

    /// Next symbol in `0..=255`, or [`PPMD_INVALID_SYMBOL`]
    pub fn decode_symbol(&mut self) -> i32 {
        let mut symbol = [0u8; 1];
        match self.inner.read(&mut symbol) {
            Ok(1) => i32::from(symbol[0]),
            _ => PPMD_INVALID_SYMBOL,
        }
    }
}
