//! Flat in-memory buffers exposed through the stream protocols codecs consume.
//!
//! Each protocol is a trait with one adapter per buffer kind. Codecs take the
//! adapter directly (`&mut impl SeqInStream`, or through the `std::io` impls),
//! so there is no owner recovery from an embedded function table.

pub mod cursor;
pub mod sink;
pub mod window;

pub use cursor::{ByteCursor, SeqCursor};
pub use sink::{ByteSink, GrowableSink};
pub use window::LookWindow;

use crate::error::{Error, Result};

/// Push-based bulk output
pub trait SeqOutStream {
    /// Append `data`, returning the number of bytes accepted (always `data.len()`)
    fn write(&mut self, data: &[u8]) -> usize;
}

/// Push-based single-byte output
pub trait ByteOutStream {
    fn write_byte(&mut self, byte: u8);
}

/// Pull-based bulk input
pub trait SeqInStream {
    /// Copy up to `buf.len()` bytes, returning how many were copied (0 once exhausted)
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

/// Pull-based single-byte input
pub trait ByteInStream {
    /// Next byte, or 0 once exhausted
    fn read_byte(&mut self) -> u8;
}

/// Input with lookahead and seeking
///
/// All positions saturate into `[0, len]`; none of these operations fail.
pub trait LookInStream {
    /// View up to `max_size` bytes at the current position without consuming them
    fn look(&self, max_size: usize) -> &[u8];

    /// Advance by `offset`, stopping at the end
    fn skip(&mut self, offset: usize);

    /// Copy up to `buf.len()` bytes and advance past them
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Move to `offset` relative to `origin`, returning the new absolute position
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> u64;
}

/// Reference point for [`LookInStream::seek`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum SeekOrigin {
    Start = 0,
    Current = 1,
    End = 2,
}

impl TryFrom<u32> for SeekOrigin {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            other => Err(Error::InvalidSeekOrigin(other)),
        }
    }
}

impl<T: SeqOutStream + ?Sized> SeqOutStream for &mut T {
    fn write(&mut self, data: &[u8]) -> usize {
        (**self).write(data)
    }
}

impl<T: ByteOutStream + ?Sized> ByteOutStream for &mut T {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }
}

impl<T: SeqInStream + ?Sized> SeqInStream for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        (**self).read(buf)
    }
}

impl<T: ByteInStream + ?Sized> ByteInStream for &mut T {
    fn read_byte(&mut self) -> u8 {
        (**self).read_byte()
    }
}
