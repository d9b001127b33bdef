//! Byte cursor over a decoder's input buffer.

use crate::error::{HessianError, Result};
use bytes::Buf;
use std::io::Cursor;

/// A non-owning byte cursor with peek, unread and rune primitives.
///
/// All multi-byte values are read in big-endian byte order. The cursor
/// requires the complete encoded value to be present in the buffer; running
/// off the end yields [`HessianError::ShortRead`].
#[derive(Debug)]
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Returns the number of bytes remaining to be read.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Returns true if the cursor has consumed the whole buffer.
    pub fn is_empty(&self) -> bool {
        !self.cursor.has_remaining()
    }

    /// Returns the current position in the buffer.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.cursor.remaining() < n {
            Err(HessianError::ShortRead {
                need: n,
                have: self.cursor.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Returns the next byte without advancing, if one is available.
    pub fn peek_byte(&self) -> Option<u8> {
        self.cursor.chunk().first().copied()
    }

    /// Returns up to `n` upcoming bytes without advancing.
    pub fn peek(&self, n: usize) -> &[u8] {
        let chunk = self.cursor.chunk();
        &chunk[..n.min(chunk.len())]
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.get_u8())
    }

    /// Steps back exactly one byte.
    ///
    /// Only valid immediately after a successful `read_byte`; the enum
    /// mis-tag recovery path depends on this being a single-byte rewind.
    pub fn unread_byte(&mut self) {
        let pos = self.cursor.position();
        self.cursor.set_position(pos.saturating_sub(1));
    }

    /// Reads a 16-bit unsigned integer in big-endian order.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.get_u16())
    }

    /// Reads a 32-bit unsigned integer in big-endian order.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.get_u32())
    }

    /// Reads a 64-bit unsigned integer in big-endian order.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.cursor.get_u64())
    }

    /// Reads exactly `len` raw bytes.
    pub fn read_exact(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure(len)?;
        let mut buf = vec![0u8; len];
        self.cursor.copy_to_slice(&mut buf);
        Ok(buf)
    }

    /// Decodes one UTF-8 code point, advancing by its byte width.
    pub fn read_rune(&mut self) -> Result<char> {
        let first = self.read_byte()?;
        let width = match first {
            0x00..=0x7f => return Ok(first as char),
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => {
                return Err(HessianError::TypeMismatch(format!(
                    "invalid UTF-8 lead byte 0x{first:02x}"
                )))
            }
        };
        self.ensure(width - 1)?;
        let mut buf = [first, 0, 0, 0];
        self.cursor.copy_to_slice(&mut buf[1..width]);
        let s = std::str::from_utf8(&buf[..width])
            .map_err(|e| HessianError::TypeMismatch(format!("invalid UTF-8 sequence: {e}")))?;
        // from_utf8 guarantees at least one char for a non-empty slice
        Ok(s.chars().next().unwrap())
    }
}
