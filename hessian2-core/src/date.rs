//! Date codec: UTC timestamps with millisecond precision.
//!
//! ```text
//! date ::= x4a b7 b6 b5 b4 b3 b2 b1 b0  # milliseconds since epoch
//!      ::= x4b b3 b2 b1 b0              # minutes since epoch
//! ```
//!
//! The encoder always emits the millisecond form; the minute form is
//! accepted on decode only.

use chrono::{DateTime, TimeZone, Utc};

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};

impl Decoder<'_> {
    /// Reads a date, consuming its tag.
    pub fn read_date(&mut self) -> Result<DateTime<Utc>> {
        let tag = self.reader.read_byte()?;
        self.read_date_tag(tag)
    }

    pub(crate) fn read_date_tag(&mut self, tag: u8) -> Result<DateTime<Utc>> {
        let millis = match tag {
            BC_DATE => self.reader.read_u64()? as i64,
            BC_DATE_MINUTE => i64::from(self.reader.read_u32()? as i32) * 60_000,
            _ => return Err(HessianError::InvalidTag(tag)),
        };
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| HessianError::TypeMismatch(format!("date out of range: {millis}ms")))
    }
}

impl Encoder {
    /// Writes a date in the millisecond form.
    pub fn write_date(&mut self, v: DateTime<Utc>) -> Result<()> {
        self.writer.put_u8(BC_DATE);
        self.writer.put_u64(v.timestamp_millis() as u64);
        Ok(())
    }
}
