//! 64-bit integer codec.
//!
//! ```text
//! long ::= 'L' b7 b6 b5 b4 b3 b2 b1 b0
//!      ::= [xd8-xef]        # -x08 to x0f
//!      ::= [xf0-xff] b0     # -x800 to x7ff
//!      ::= [x38-x3f] b1 b0  # -x40000 to x3ffff
//!      ::= x59 b3 b2 b1 b0  # 32-bit range
//! ```

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};

impl Decoder<'_> {
    /// Reads an int64, consuming its tag.
    ///
    /// Int32 forms are accepted and widened, so a field written by a peer
    /// as a Java `int` still lands in a host `i64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        let tag = self.reader.read_byte()?;
        self.read_long_tag(tag)
    }

    pub(crate) fn read_long_tag(&mut self, tag: u8) -> Result<i64> {
        match tag {
            0xd8..=0xef => Ok(i64::from(tag) - i64::from(BC_LONG_ZERO)),
            0xf0..=0xff => {
                let b0 = self.reader.read_byte()?;
                Ok(((i64::from(tag) - i64::from(BC_LONG_BYTE_ZERO)) << 8) | i64::from(b0))
            }
            0x38..=0x3f => {
                let b1 = self.reader.read_byte()?;
                let b0 = self.reader.read_byte()?;
                Ok(((i64::from(tag) - i64::from(BC_LONG_SHORT_ZERO)) << 16)
                    | (i64::from(b1) << 8)
                    | i64::from(b0))
            }
            BC_LONG_INT => Ok(i64::from(self.reader.read_u32()? as i32)),
            BC_LONG => Ok(self.reader.read_u64()? as i64),
            BC_INT | 0x80..=0xbf | 0xc0..=0xcf | 0xd0..=0xd7 => {
                self.read_int_tag(tag).map(i64::from)
            }
            _ => Err(HessianError::InvalidTag(tag)),
        }
    }
}

impl Encoder {
    /// Writes an int64 in its most compact form.
    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        if (LONG_DIRECT_MIN..=LONG_DIRECT_MAX).contains(&v) {
            self.writer.put_u8((v + i64::from(BC_LONG_ZERO)) as u8);
        } else if (LONG_BYTE_MIN..=LONG_BYTE_MAX).contains(&v) {
            self.writer.put_u8((i64::from(BC_LONG_BYTE_ZERO) + (v >> 8)) as u8);
            self.writer.put_u8(v as u8);
        } else if (LONG_SHORT_MIN..=LONG_SHORT_MAX).contains(&v) {
            self.writer.put_u8((i64::from(BC_LONG_SHORT_ZERO) + (v >> 16)) as u8);
            self.writer.put_u8((v >> 8) as u8);
            self.writer.put_u8(v as u8);
        } else if (i64::from(i32::MIN)..=i64::from(i32::MAX)).contains(&v) {
            self.writer.put_u8(BC_LONG_INT);
            self.writer.put_u32(v as u32);
        } else {
            self.writer.put_u8(BC_LONG);
            self.writer.put_u64(v as u64);
        }
        Ok(())
    }
}
