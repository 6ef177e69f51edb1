use super::{LookInStream, SeekOrigin};
use crate::error::Result;
use std::io;

/// Seekable read window over a borrowed byte range
///
/// Out-of-range seeks and skips saturate to the nearest end of the range
/// instead of failing. The only reported error is an unknown origin code.
pub struct LookWindow<'a> {
    data: &'a [u8],
    /// Absolute position, always in `0..=data.len()`
    position: usize,
}

impl<'a> LookWindow<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// View up to `max_size` bytes at the current position
    pub fn look(&self, max_size: usize) -> &'a [u8] {
        let data: &'a [u8] = self.data;
        let available = data.len() - self.position;
        &data[self.position..self.position + max_size.min(available)]
    }

    pub fn skip(&mut self, offset: usize) {
        let available = self.data.len() - self.position;
        self.position += offset.min(available);
    }

    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let chunk = self.look(buf.len());
        let n = chunk.len();
        buf[..n].copy_from_slice(chunk);
        self.position += n;
        n
    }

    /// Seek with clamping; the result is always in `[0, len]`
    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> u64 {
        let len = self.data.len() as u64;
        let target = match origin {
            SeekOrigin::Start => clamp_offset(offset, 0, len),
            SeekOrigin::Current => clamp_offset(offset, self.position as u64, len),
            SeekOrigin::End if offset >= 0 => len,
            SeekOrigin::End => clamp_offset(offset, len, len),
        };
        self.position = target as usize;
        target
    }

    /// Seek with a raw origin code (0 = start, 1 = current, 2 = end)
    pub fn seek_raw(&mut self, offset: i64, origin: u32) -> Result<u64> {
        let origin = SeekOrigin::try_from(origin)?;
        Ok(self.seek(offset, origin))
    }

    pub fn position(&self) -> u64 {
        self.position as u64
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

/// `base + offset` saturated into `[0, len]`
fn clamp_offset(offset: i64, base: u64, len: u64) -> u64 {
    let magnitude = offset.unsigned_abs();
    if offset < 0 {
        base.saturating_sub(magnitude)
    } else {
        base.saturating_add(magnitude).min(len)
    }
}

impl LookInStream for LookWindow<'_> {
    fn look(&self, max_size: usize) -> &[u8] {
        LookWindow::look(self, max_size)
    }

    fn skip(&mut self, offset: usize) {
        LookWindow::skip(self, offset)
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        LookWindow::read(self, buf)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> u64 {
        LookWindow::seek(self, offset, origin)
    }
}

impl io::Read for LookWindow<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(LookWindow::read(self, buf))
    }
}

impl io::BufRead for LookWindow<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(LookWindow::look(self, usize::MAX))
    }

    fn consume(&mut self, amt: usize) {
        self.skip(amt)
    }
}

/// Clamps like [`LookWindow::seek`] rather than rejecting negative targets
impl io::Seek for LookWindow<'_> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let target = match pos {
            io::SeekFrom::Start(p) => {
                LookWindow::seek(self, i64::try_from(p).unwrap_or(i64::MAX), SeekOrigin::Start)
            }
            io::SeekFrom::Current(off) => LookWindow::seek(self, off, SeekOrigin::Current),
            io::SeekFrom::End(off) => LookWindow::seek(self, off, SeekOrigin::End),
        };
        Ok(target)
    }
}
