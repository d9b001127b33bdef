//! 64-bit float codec.
//!
//! ```text
//! double ::= 'D' b7 b6 b5 b4 b3 b2 b1 b0
//!        ::= x5b              # 0.0
//!        ::= x5c              # 1.0
//!        ::= x5d b0           # byte-valued double
//!        ::= x5e b1 b0        # short-valued double
//!        ::= x5f b3 b2 b1 b0  # int32 / 1000.0
//! ```

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};

impl Decoder<'_> {
    /// Reads a double, consuming its tag.
    pub fn read_f64(&mut self) -> Result<f64> {
        let tag = self.reader.read_byte()?;
        self.read_double_tag(tag)
    }

    pub(crate) fn read_double_tag(&mut self, tag: u8) -> Result<f64> {
        match tag {
            BC_DOUBLE_ZERO => Ok(0.0),
            BC_DOUBLE_ONE => Ok(1.0),
            BC_DOUBLE_BYTE => Ok(f64::from(self.reader.read_byte()? as i8)),
            BC_DOUBLE_SHORT => Ok(f64::from(self.reader.read_u16()? as i16)),
            // widen to int32 first, then divide in floating point
            BC_DOUBLE_MILL => Ok(f64::from(self.reader.read_u32()? as i32) / 1000.0),
            BC_DOUBLE => Ok(f64::from_bits(self.reader.read_u64()?)),
            _ => Err(HessianError::InvalidTag(tag)),
        }
    }
}

impl Encoder {
    /// Writes a double in its most compact form.
    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        let iv = v as i64;
        if f64::from(iv as i32) == v && i64::from(iv as i32) == iv {
            match iv {
                0 => {
                    self.writer.put_u8(BC_DOUBLE_ZERO);
                    return Ok(());
                }
                1 => {
                    self.writer.put_u8(BC_DOUBLE_ONE);
                    return Ok(());
                }
                -128..=127 => {
                    self.writer.put_u8(BC_DOUBLE_BYTE);
                    self.writer.put_u8(iv as u8);
                    return Ok(());
                }
                -32768..=32767 => {
                    self.writer.put_u8(BC_DOUBLE_SHORT);
                    self.writer.put_u16(iv as u16);
                    return Ok(());
                }
                _ => {}
            }
        }
        let mills = (v * 1000.0) as i64;
        if (i64::from(i32::MIN)..=i64::from(i32::MAX)).contains(&mills)
            && f64::from(mills as i32) / 1000.0 == v
        {
            self.writer.put_u8(BC_DOUBLE_MILL);
            self.writer.put_u32(mills as u32);
            return Ok(());
        }
        self.writer.put_u8(BC_DOUBLE);
        self.writer.put_u64(v.to_bits());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(v: f64) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_f64(v).unwrap();
        encoder.into_bytes()
    }

    fn decode(bytes: &[u8]) -> f64 {
        Decoder::new(bytes).read_f64().unwrap()
    }

    #[test]
    fn test_constants() {
        assert_eq!(encode(0.0), vec![0x5b]);
        assert_eq!(encode(1.0), vec![0x5c]);
        assert_eq!(decode(&[0x5b]), 0.0);
        assert_eq!(decode(&[0x5c]), 1.0);
    }

    #[test]
    fn test_byte_form() {
        assert_eq!(encode(2.0), vec![0x5d, 0x02]);
        assert_eq!(encode(-128.0), vec![0x5d, 0x80]);
        assert_eq!(encode(127.0), vec![0x5d, 0x7f]);
        assert_eq!(decode(&[0x5d, 0xff]), -1.0);
    }

    #[test]
    fn test_short_form() {
        assert_eq!(encode(128.0), vec![0x5e, 0x00, 0x80]);
        assert_eq!(encode(-32768.0), vec![0x5e, 0x80, 0x00]);
        assert_eq!(decode(&[0x5e, 0x80, 0x00]), -32768.0);
        assert_eq!(decode(&[0x5e, 0x00, 0x80]), 128.0);
    }

    #[test]
    fn test_mill_form() {
        // 12.25 * 1000 = 12250 fits an int32 exactly
        assert_eq!(encode(12.25), vec![0x5f, 0x00, 0x00, 0x2f, 0xda]);
        assert_eq!(decode(&[0x5f, 0x00, 0x00, 0x2f, 0xda]), 12.25);
        assert_eq!(decode(&[0x5f, 0xff, 0xff, 0xff, 0xff]), -0.001);
    }

    #[test]
    fn test_full_form() {
        let v = std::f64::consts::PI;
        let mut expected = vec![0x44];
        expected.extend_from_slice(&v.to_bits().to_be_bytes());
        assert_eq!(encode(v), expected);
        assert_eq!(decode(&expected), v);
    }

    #[test]
    fn test_nan_and_infinities_round_trip() {
        assert!(decode(&encode(f64::NAN)).is_nan());
        assert_eq!(decode(&encode(f64::INFINITY)), f64::INFINITY);
        assert_eq!(decode(&encode(f64::NEG_INFINITY)), f64::NEG_INFINITY);
    }

    #[test]
    fn test_large_integral_value_uses_full_form() {
        // integral but outside the short range, and not mill-exact enough
        let v = 1.0e18;
        assert_eq!(encode(v)[0], 0x44);
        assert_eq!(decode(&encode(v)), v);
    }

    #[test]
    fn test_round_trip_sweep() {
        for v in [
            0.0, 1.0, -1.0, 2.5, -2.5, 100.0, 12.25, -12.34, 32767.0, 32768.0, 1e-3, -1e-3,
            123456.789, 1.0e18, f64::MAX, f64::MIN, f64::MIN_POSITIVE,
        ] {
            assert_eq!(decode(&encode(v)), v, "value {v}");
        }
    }

    #[test]
    fn test_wrong_tag() {
        let mut decoder = Decoder::new(&[0x90]);
        assert_eq!(decoder.read_f64(), Err(HessianError::InvalidTag(0x90)));
    }
}
