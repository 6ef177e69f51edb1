use super::{ByteInStream, SeqInStream};
use std::io;

/// Sequential reader over a borrowed byte range
///
/// The remaining range shrinks from the front as bytes are consumed.
pub struct SeqCursor<'a> {
    remaining: &'a [u8],
}

impl<'a> SeqCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { remaining: data }
    }

    /// Copy `min(buf.len(), remaining)` bytes into `buf`
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.remaining.len());
        if n > 0 {
            let (head, tail) = self.remaining.split_at(n);
            buf[..n].copy_from_slice(head);
            self.remaining = tail;
        }
        n
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

impl SeqInStream for SeqCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        SeqCursor::read(self, buf)
    }
}

impl io::Read for SeqCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(SeqCursor::read(self, buf))
    }
}

/// Single-byte reader over a borrowed byte range
///
/// Once exhausted every read yields 0. There is no separate end-of-stream
/// signal; consumers that care track their own expected length.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub fn read_byte(&mut self) -> u8 {
        match self.data.get(self.position) {
            Some(&b) => {
                self.position += 1;
                b
            }
            None => 0,
        }
    }

    /// Bytes handed out so far (never counts the zero padding)
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == self.data.len()
    }
}

impl ByteInStream for ByteCursor<'_> {
    #[inline]
    fn read_byte(&mut self) -> u8 {
        ByteCursor::read_byte(self)
    }
}

/// Fills the whole buffer, zero-padded past the end like `read_byte`
impl io::Read for ByteCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        for b in buf.iter_mut() {
            *b = self.read_byte();
        }
        Ok(buf.len())
    }
}
