//! String codec with code-point length semantics and chunking.
//!
//! ```text
//! string ::= 'S' b1 b0 <utf8-data>  # final frame
//!        ::= x52 b1 b0 <utf8-data> string  # chunk, another frame follows
//!        ::= [x00-x1f] <utf8-data>  # length 0-31
//!        ::= [x30-x33] b0 <utf8-data>  # length 0-1023
//! ```
//!
//! Lengths count Unicode code points, not bytes; payloads are UTF-8. Frames
//! longer than [`CHUNK_SIZE`] code points are split into chunk frames ending
//! in one final frame.

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};

impl Decoder<'_> {
    /// Reads a string, consuming its tag. A null tag yields the empty string.
    pub fn read_string(&mut self) -> Result<String> {
        let tag = self.reader.read_byte()?;
        if tag == BC_NULL {
            return Ok(String::new());
        }
        self.read_string_tag(tag)
    }

    pub(crate) fn read_string_tag(&mut self, tag: u8) -> Result<String> {
        let mut out = String::new();
        let mut tag = tag;
        loop {
            let (len, last) = match tag {
                0x00..=0x1f => (usize::from(tag), true),
                0x30..=0x33 => {
                    let b0 = self.reader.read_byte()?;
                    ((usize::from(tag - BC_STRING_SHORT) << 8) | usize::from(b0), true)
                }
                BC_STRING => (usize::from(self.reader.read_u16()?), true),
                BC_STRING_CHUNK => (usize::from(self.reader.read_u16()?), false),
                _ => return Err(HessianError::InvalidTag(tag)),
            };
            for _ in 0..len {
                out.push(self.reader.read_rune()?);
            }
            if last {
                return Ok(out);
            }
            tag = self.reader.read_byte()?;
        }
    }
}

impl Encoder {
    /// Writes a string in its most compact form, chunking long values.
    pub fn write_string(&mut self, v: &str) -> Result<()> {
        let mut rest = v;
        let mut rest_len = v.chars().count();
        while rest_len > CHUNK_SIZE {
            // split at the CHUNK_SIZE-th code point, not byte
            let split = rest
                .char_indices()
                .nth(CHUNK_SIZE)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let (chunk, tail) = rest.split_at(split);
            self.writer.put_u8(BC_STRING_CHUNK);
            self.writer.put_u16(CHUNK_SIZE as u16);
            self.writer.put_slice(chunk.as_bytes());
            rest = tail;
            rest_len -= CHUNK_SIZE;
        }
        if rest_len <= usize::from(STRING_DIRECT_MAX) {
            self.writer.put_u8(BC_STRING_DIRECT + rest_len as u8);
        } else if rest_len <= usize::from(STRING_SHORT_MAX) {
            self.writer.put_u8(BC_STRING_SHORT + (rest_len >> 8) as u8);
            self.writer.put_u8(rest_len as u8);
        } else {
            self.writer.put_u8(BC_STRING);
            self.writer.put_u16(rest_len as u16);
        }
        self.writer.put_slice(rest.as_bytes());
        Ok(())
    }
}
