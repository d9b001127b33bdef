//! Map codec: typed and untyped key/value sequences.
//!
//! ```text
//! map ::= 'M' type (value value)* 'Z'  # typed
//!     ::= 'H' (value value)* 'Z'       # untyped
//! ```
//!
//! Like lists, the map joins the reference table before its pairs decode.

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};
use crate::value::{Map, Value};

impl Decoder<'_> {
    /// Reads a map-typed field, accepting a back-reference or null.
    pub fn read_map(&mut self) -> Result<Map> {
        match self.read_value()? {
            Value::Map(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(HessianError::TypeMismatch(format!(
                "expected map, found {}",
                other.kind()
            ))),
        }
    }

    pub(crate) fn read_map_tag(&mut self, tag: u8) -> Result<Value> {
        let map = match tag {
            BC_MAP => Map::typed(self.read_type()?),
            BC_MAP_UNTYPED => Map::new(),
            _ => return Err(HessianError::InvalidTag(tag)),
        };
        self.refs.push(Value::Map(map.clone()));
        loop {
            match self.reader.peek_byte() {
                Some(BC_END) => {
                    self.reader.read_byte()?;
                    return Ok(Value::Map(map));
                }
                Some(_) => {
                    let key = self.read_value()?;
                    let value = self.read_value()?;
                    map.insert(key, value);
                }
                None => return Err(HessianError::ShortRead { need: 1, have: 0 }),
            }
        }
    }
}

impl Encoder {
    /// Writes a map; typed maps carry their type descriptor inline.
    pub fn write_map(&mut self, map: &Map) -> Result<()> {
        if self.check_ref(map.ptr_id())? {
            return Ok(());
        }
        match map.type_name() {
            Some(t) => {
                self.writer.put_u8(BC_MAP);
                self.write_type(&t)?;
            }
            None => self.writer.put_u8(BC_MAP_UNTYPED),
        }
        let entries = map.entries();
        for (key, value) in entries.iter() {
            self.encode(key)?;
            self.encode(value)?;
        }
        self.writer.put_u8(BC_END);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_map(map: &Map) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_map(map).unwrap();
        encoder.into_bytes()
    }

    fn decode(bytes: &[u8]) -> Value {
        Decoder::new(bytes).read_value().unwrap()
    }

    #[test]
    fn test_untyped_map_round_trip() {
        let map = Map::new();
        map.insert("one", 1i32);
        map.insert("two", 2i32);

        let bytes = encode_map(&map);
        assert_eq!(bytes[0], b'H');
        assert_eq!(*bytes.last().unwrap(), b'Z');
        assert_eq!(decode(&bytes), Value::Map(map));
    }

    #[test]
    fn test_empty_map() {
        let map = Map::new();
        assert_eq!(encode_map(&map), vec![b'H', b'Z']);
        let decoded = decode(&[b'H', b'Z']);
        assert!(decoded.as_map().unwrap().is_empty());
    }

    #[test]
    fn test_typed_map_round_trip() {
        let map = Map::typed("java.util.HashMap");
        map.insert(1i32, "one");

        let bytes = encode_map(&map);
        assert_eq!(bytes[0], b'M');
        let decoded = decode(&bytes);
        let decoded_map = decoded.as_map().unwrap();
        assert_eq!(
            decoded_map.type_name().as_deref(),
            Some("java.util.HashMap")
        );
        assert_eq!(decoded_map.get(&Value::Int(1)), Some(Value::from("one")));
    }

    #[test]
    fn test_non_string_keys() {
        let map = Map::new();
        map.insert(Value::Long(1), Value::from("fee"));
        map.insert(Value::Int(16), Value::from("fie"));

        let bytes = encode_map(&map);
        let decoded = decode(&bytes);
        let decoded_map = decoded.as_map().unwrap();
        assert_eq!(decoded_map.get(&Value::Long(1)), Some(Value::from("fee")));
        assert_eq!(decoded_map.get(&Value::Int(16)), Some(Value::from("fie")));
    }

    #[test]
    fn test_unterminated_map() {
        let mut decoder = Decoder::new(&[b'H', 0x90, 0x91]);
        assert!(matches!(
            decoder.read_value(),
            Err(HessianError::ShortRead { .. })
        ));
    }

    #[test]
    fn test_self_referential_map_round_trips() {
        let map = Map::new();
        map.insert("self", Value::Map(map.clone()));

        let bytes = encode_map(&map);
        let decoded = decode(&bytes);
        let decoded_map = decoded.as_map().unwrap();
        let Some(Value::Map(inner)) = decoded_map.get(&Value::from("self")) else {
            panic!("expected map value");
        };
        assert!(inner.ptr_eq(decoded_map));
    }

    #[test]
    fn test_read_map_null_yields_empty() {
        let mut decoder = Decoder::new(&[0x4e]);
        assert!(decoder.read_map().unwrap().is_empty());
    }

    #[test]
    fn test_read_map_type_mismatch() {
        let mut decoder = Decoder::new(&[0x54]);
        assert!(matches!(
            decoder.read_map(),
            Err(HessianError::TypeMismatch(_))
        ));
    }
}
