//! Binary codec: like strings, but lengths are byte counts.
//!
//! ```text
//! binary ::= 'B' b1 b0 <data>  # final frame
//!        ::= x41 b1 b0 <data> binary  # chunk, another frame follows
//!        ::= [x20-x2f] <data>  # length 0-15
//!        ::= [x34-x37] b0 <data>  # length 0-1023
//! ```

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};

impl Decoder<'_> {
    /// Reads a byte array, consuming its tag. A null tag yields empty bytes.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let tag = self.reader.read_byte()?;
        if tag == BC_NULL {
            return Ok(Vec::new());
        }
        self.read_binary_tag(tag)
    }

    pub(crate) fn read_binary_tag(&mut self, tag: u8) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut tag = tag;
        loop {
            let (len, last) = match tag {
                0x20..=0x2f => (usize::from(tag - BC_BINARY_DIRECT), true),
                0x34..=0x37 => {
                    let b0 = self.reader.read_byte()?;
                    ((usize::from(tag - BC_BINARY_SHORT) << 8) | usize::from(b0), true)
                }
                BC_BINARY => (usize::from(self.reader.read_u16()?), true),
                BC_BINARY_CHUNK => (usize::from(self.reader.read_u16()?), false),
                _ => return Err(HessianError::InvalidTag(tag)),
            };
            out.extend_from_slice(&self.reader.read_exact(len)?);
            if last {
                return Ok(out);
            }
            tag = self.reader.read_byte()?;
        }
    }
}

impl Encoder {
    /// Writes a byte array in its most compact form, chunking long values.
    pub fn write_binary(&mut self, v: &[u8]) -> Result<()> {
        let mut rest = v;
        while rest.len() > CHUNK_SIZE {
            let (chunk, tail) = rest.split_at(CHUNK_SIZE);
            self.writer.put_u8(BC_BINARY_CHUNK);
            self.writer.put_u16(CHUNK_SIZE as u16);
            self.writer.put_slice(chunk);
            rest = tail;
        }
        if rest.len() <= usize::from(BINARY_DIRECT_MAX) {
            self.writer.put_u8(BC_BINARY_DIRECT + rest.len() as u8);
        } else if rest.len() <= usize::from(BINARY_SHORT_MAX) {
            self.writer.put_u8(BC_BINARY_SHORT + (rest.len() >> 8) as u8);
            self.writer.put_u8(rest.len() as u8);
        } else {
            self.writer.put_u8(BC_BINARY);
            self.writer.put_u16(rest.len() as u16);
        }
        self.writer.put_slice(rest);
        Ok(())
    }
}
