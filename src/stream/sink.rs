use super::{ByteOutStream, SeqOutStream};
use std::io;

/// Capacity of the first allocation made by a sink
pub const INITIAL_CAPACITY: usize = 128;

/// Append-only output buffer for bulk writers
///
/// Capacity starts at [`INITIAL_CAPACITY`] and doubles until the pending
/// write fits, so growth boundaries are the same on every allocator.
pub struct GrowableSink {
    /// Backing storage; its length is the logical capacity
    buffer: Box<[u8]>,
    /// Bytes written so far
    position: usize,
}

impl GrowableSink {
    pub fn new() -> Self {
        Self { buffer: Box::default(), position: 0 }
    }

    /// Append all of `data`
    pub fn write(&mut self, data: &[u8]) -> usize {
        let available = self.buffer.len() - self.position;
        if available < data.len() {
            let mut capacity = self.buffer.len().max(INITIAL_CAPACITY);
            while capacity - self.position < data.len() {
                capacity = capacity.checked_mul(2).expect("sink capacity overflow");
            }
            self.reallocate(capacity);
        }

        self.buffer[self.position..self.position + data.len()].copy_from_slice(data);
        self.position += data.len();
        data.len()
    }

    fn reallocate(&mut self, capacity: usize) {
        let mut grown = vec![0u8; capacity].into_boxed_slice();
        grown[..self.position].copy_from_slice(&self.buffer[..self.position]);
        self.buffer = grown;
    }

    /// Written bytes; valid until the next write
    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    pub fn size(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Consume the sink, keeping only the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        let mut bytes = self.buffer.into_vec();
        bytes.truncate(self.position);
        bytes
    }
}

impl Default for GrowableSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SeqOutStream for GrowableSink {
    fn write(&mut self, data: &[u8]) -> usize {
        GrowableSink::write(self, data)
    }
}

impl io::Write for GrowableSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(GrowableSink::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Append-only output buffer for codecs that emit one byte per call
///
/// Same growth policy as [`GrowableSink`], applied when the buffer is full.
pub struct ByteSink {
    buffer: Box<[u8]>,
    position: usize,
}

impl ByteSink {
    pub fn new() -> Self {
        Self { buffer: Box::default(), position: 0 }
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        if self.position == self.buffer.len() {
            let capacity = if self.buffer.is_empty() {
                INITIAL_CAPACITY
            } else {
                self.buffer.len().checked_mul(2).expect("sink capacity overflow")
            };
            let mut grown = vec![0u8; capacity].into_boxed_slice();
            grown[..self.position].copy_from_slice(&self.buffer[..self.position]);
            self.buffer = grown;
        }

        self.buffer[self.position] = byte;
        self.position += 1;
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    pub fn size(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    pub fn into_inner(self) -> Vec<u8> {
        let mut bytes = self.buffer.into_vec();
        bytes.truncate(self.position);
        bytes
    }
}

impl Default for ByteSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteOutStream for ByteSink {
    #[inline]
    fn write_byte(&mut self, byte: u8) {
        ByteSink::write_byte(self, byte)
    }
}

/// Bulk writes are split into single-byte pushes
impl io::Write for ByteSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            self.write_byte(b);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
