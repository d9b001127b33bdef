//! 32-bit integer codec.
//!
//! ```text
//! int ::= 'I' b3 b2 b1 b0
//!     ::= [x80-xbf]        # -x10 to x3f
//!     ::= [xc0-xcf] b0     # -x800 to x7ff
//!     ::= [xd0-xd7] b1 b0  # -x40000 to x3ffff
//! ```

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};

impl Decoder<'_> {
    /// Reads an int32, consuming its tag.
    pub fn read_i32(&mut self) -> Result<i32> {
        let tag = self.reader.read_byte()?;
        self.read_int_tag(tag)
    }

    pub(crate) fn read_int_tag(&mut self, tag: u8) -> Result<i32> {
        match tag {
            0x80..=0xbf => Ok(i32::from(tag) - i32::from(BC_INT_ZERO)),
            0xc0..=0xcf => {
                let b0 = self.reader.read_byte()?;
                Ok(((i32::from(tag) - i32::from(BC_INT_BYTE_ZERO)) << 8) | i32::from(b0))
            }
            0xd0..=0xd7 => {
                // the tag offset carries the sign, already extended past bit 23
                let b1 = self.reader.read_byte()?;
                let b0 = self.reader.read_byte()?;
                Ok(((i32::from(tag) - i32::from(BC_INT_SHORT_ZERO)) << 16)
                    | (i32::from(b1) << 8)
                    | i32::from(b0))
            }
            BC_INT => Ok(self.reader.read_u32()? as i32),
            _ => Err(HessianError::InvalidTag(tag)),
        }
    }
}

impl Encoder {
    /// Writes an int32 in its most compact form.
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        if (INT_DIRECT_MIN..=INT_DIRECT_MAX).contains(&v) {
            self.writer.put_u8((v + i32::from(BC_INT_ZERO)) as u8);
        } else if (INT_BYTE_MIN..=INT_BYTE_MAX).contains(&v) {
            self.writer.put_u8((i32::from(BC_INT_BYTE_ZERO) + (v >> 8)) as u8);
            self.writer.put_u8(v as u8);
        } else if (INT_SHORT_MIN..=INT_SHORT_MAX).contains(&v) {
            self.writer.put_u8((i32::from(BC_INT_SHORT_ZERO) + (v >> 16)) as u8);
            self.writer.put_u8((v >> 8) as u8);
            self.writer.put_u8(v as u8);
        } else {
            self.writer.put_u8(BC_INT);
            self.writer.put_u32(v as u32);
        }
        Ok(())
    }
}
