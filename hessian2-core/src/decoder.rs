//! Streaming decoder: one tag byte read, one codec dispatched.

use crate::constants::*;
use crate::error::{HessianError, Result};
use crate::object::ClassDefinition;
use crate::reader::ByteReader;
use crate::value::Value;

/// Nesting bound keeping hostile input from exhausting the stack.
const MAX_DEPTH: u32 = 512;

/// Decodes Hessian 2 values from a complete in-memory buffer.
///
/// A decoder is single-threaded and runs to completion on the calling
/// thread. The reference table and the class-definition stream table live
/// for the life of the decoder; [`reset`](Decoder::reset) clears both for
/// reuse on a fresh stream.
#[derive(Debug)]
pub struct Decoder<'a> {
    pub(crate) reader: ByteReader<'a>,
    /// Composite values in begin-event order; `'Q' n` indexes this table.
    pub(crate) refs: Vec<Value>,
    /// Class definitions in order of first appearance on this stream.
    pub(crate) class_defs: Vec<ClassDefinition>,
    depth: u32,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over a complete encoded buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(data),
            refs: Vec::new(),
            class_defs: Vec::new(),
            depth: 0,
        }
    }

    /// Rebinds the decoder to a fresh stream, clearing both stream tables.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.reader = ByteReader::new(data);
        self.refs.clear();
        self.class_defs.clear();
        self.depth = 0;
    }

    /// Decodes the next top-level value.
    ///
    /// Returns `Ok(None)` at end of stream: either the buffer is exhausted
    /// at a value boundary or the `'Z'` end tag was read.
    pub fn decode(&mut self) -> Result<Option<Value>> {
        if self.reader.is_empty() {
            return Ok(None);
        }
        let tag = self.reader.read_byte()?;
        if tag == BC_END {
            return Ok(None);
        }
        self.decode_tag(tag).map(Some)
    }

    /// Decodes one value, reading its leading tag.
    ///
    /// This is the recursion point used by composite codecs and by
    /// `decode_field` implementations for fields of composite kind.
    pub fn read_value(&mut self) -> Result<Value> {
        let tag = self.reader.read_byte()?;
        self.decode_tag(tag)
    }

    pub(crate) fn decode_tag(&mut self, tag: u8) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(HessianError::DepthLimitExceeded);
        }
        self.depth += 1;
        let value = self.dispatch_tag(tag);
        self.depth -= 1;
        value
    }

    fn dispatch_tag(&mut self, tag: u8) -> Result<Value> {
        match tag {
            BC_NULL => Ok(Value::Null),
            BC_TRUE => Ok(Value::Bool(true)),
            BC_FALSE => Ok(Value::Bool(false)),
            BC_REF => self.read_ref(),
            BC_INT | 0x80..=0xbf | 0xc0..=0xcf | 0xd0..=0xd7 => {
                self.read_int_tag(tag).map(Value::Int)
            }
            BC_LONG | BC_LONG_INT | 0x38..=0x3f | 0xd8..=0xef | 0xf0..=0xff => {
                self.read_long_tag(tag).map(Value::Long)
            }
            BC_DATE | BC_DATE_MINUTE => self.read_date_tag(tag).map(Value::Date),
            BC_DOUBLE | 0x5b..=0x5f => self.read_double_tag(tag).map(Value::Double),
            BC_STRING | BC_STRING_CHUNK | 0x00..=0x1f | 0x30..=0x33 => {
                self.read_string_tag(tag).map(Value::String)
            }
            BC_BINARY | BC_BINARY_CHUNK | 0x20..=0x2f | 0x34..=0x37 => {
                self.read_binary_tag(tag).map(Value::Bytes)
            }
            0x55..=0x58 | 0x70..=0x7f => self.read_list_tag(tag),
            BC_MAP | BC_MAP_UNTYPED => self.read_map_tag(tag),
            BC_OBJECT_DEF | BC_OBJECT | 0x60..=0x6f => self.read_object_tag(tag),
            _ => Err(HessianError::InvalidTag(tag)),
        }
    }

    /// Reads a boolean, consuming its tag.
    pub fn read_bool(&mut self) -> Result<bool> {
        let tag = self.reader.read_byte()?;
        match tag {
            BC_TRUE => Ok(true),
            BC_FALSE => Ok(false),
            _ => Err(HessianError::InvalidTag(tag)),
        }
    }

    /// Consumes a `'N'` tag if it is next; used for `Option` fields.
    pub fn peek_null(&mut self) -> Result<bool> {
        if self.reader.peek_byte() == Some(BC_NULL) {
            self.reader.read_byte()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn read_ref(&mut self) -> Result<Value> {
        let idx = self.read_i32()?;
        if idx < 0 || idx as usize >= self.refs.len() {
            return Err(HessianError::IllegalRefIndex(idx));
        }
        Ok(self.refs[idx as usize].clone())
    }

    /// Reads a type descriptor for a typed list or map: either an inline
    /// string or an int32 back-reference into the class-def stream table.
    pub(crate) fn read_type(&mut self) -> Result<String> {
        let tag = self.reader.read_byte()?;
        if is_string_tag(tag) {
            return self.read_string_tag(tag);
        }
        let idx = self.read_int_tag(tag)?;
        if idx >= 0 {
            if let Some(def) = self.class_defs.get(idx as usize) {
                return Ok(def.class_name().to_string());
            }
        }
        Err(HessianError::IllegalClassIndex(idx))
    }
}
