//! Growable output buffer for the encoder.

use bytes::{BufMut, BytesMut};

/// An append-only byte buffer; all multi-byte values go out big-endian.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: BytesMut,
}

impl ByteWriter {
    /// Creates a writer with a small initial capacity.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(64),
        }
    }

    /// Returns the written bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer and returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clears the buffer, removing all written data.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Appends a single byte.
    pub fn put_u8(&mut self, v: u8) {
        self.buffer.put_u8(v);
    }

    /// Appends a 16-bit unsigned integer in big-endian order.
    pub fn put_u16(&mut self, v: u16) {
        self.buffer.put_u16(v);
    }

    /// Appends a 32-bit unsigned integer in big-endian order.
    pub fn put_u32(&mut self, v: u32) {
        self.buffer.put_u32(v);
    }

    /// Appends a 64-bit unsigned integer in big-endian order.
    pub fn put_u64(&mut self, v: u64) {
        self.buffer.put_u64(v);
    }

    /// Appends raw bytes.
    pub fn put_slice(&mut self, v: &[u8]) {
        self.buffer.put_slice(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_writer_is_empty() {
        let writer = ByteWriter::new();
        assert!(writer.is_empty());
        assert_eq!(writer.len(), 0);
    }

    #[test]
    fn test_put_u8() {
        let mut writer = ByteWriter::new();
        writer.put_u8(0x42);
        assert_eq!(writer.as_bytes(), &[0x42]);
    }

    #[test]
    fn test_put_u16_big_endian() {
        let mut writer = ByteWriter::new();
        writer.put_u16(0x0102);
        assert_eq!(writer.as_bytes(), &[0x01, 0x02]);
    }

    #[test]
    fn test_put_u32_big_endian() {
        let mut writer = ByteWriter::new();
        writer.put_u32(0x01020304);
        assert_eq!(writer.as_bytes(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_put_u64_big_endian() {
        let mut writer = ByteWriter::new();
        writer.put_u64(0x0102030405060708);
        assert_eq!(
            writer.as_bytes(),
            &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
    }

    #[test]
    fn test_put_slice_and_clear() {
        let mut writer = ByteWriter::new();
        writer.put_slice(&[1, 2, 3]);
        assert_eq!(writer.len(), 3);
        writer.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_into_bytes() {
        let mut writer = ByteWriter::new();
        writer.put_u32(42);
        assert_eq!(writer.into_bytes(), vec![0, 0, 0, 42]);
    }
}
