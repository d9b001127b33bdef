//! Streaming encoder: picks the most compact form for every value.

use std::collections::HashMap;

use crate::constants::*;
use crate::error::Result;
use crate::value::Value;
use crate::writer::ByteWriter;

/// Encodes values into a growable internal buffer.
///
/// An encoder is single-threaded and runs to completion on the calling
/// thread. Composite values are tracked by identity: encoding the same
/// shared container or the same enum constant twice emits a `'Q'`
/// back-reference the second time, preserving sharing and cycles.
#[derive(Debug, Default)]
pub struct Encoder {
    pub(crate) writer: ByteWriter,
    /// Identity (pointer) of already-written composites -> reference index.
    pub(crate) refs: HashMap<usize, i32>,
    /// Already-written enum constants, keyed by (class name, variant name).
    pub(crate) enum_refs: HashMap<(String, String), i32>,
    /// Next reference index; advances at every composite begin-event.
    pub(crate) ref_count: i32,
    /// Class names in order of first emission on this stream.
    pub(crate) class_names: Vec<String>,
}

impl Encoder {
    /// Creates an empty encoder.
    pub fn new() -> Self {
        Self {
            writer: ByteWriter::new(),
            refs: HashMap::new(),
            enum_refs: HashMap::new(),
            ref_count: 0,
            class_names: Vec::new(),
        }
    }

    /// Encodes one value, appending its wire form to the buffer.
    pub fn encode(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(v) => self.write_bool(*v),
            Value::Int(v) => self.write_i32(*v),
            Value::Long(v) => self.write_i64(*v),
            Value::Double(v) => self.write_f64(*v),
            Value::Date(v) => self.write_date(*v),
            Value::String(v) => self.write_string(v),
            Value::Bytes(v) => self.write_binary(v),
            Value::List(v) => self.write_list(v),
            Value::Map(v) => self.write_map(v),
            Value::Object(v) => self.write_object_value(v),
            Value::Enum(v) => self.write_enum_value(v),
        }
    }

    /// Returns a borrowed view of the encoded bytes.
    pub fn buffer(&self) -> &[u8] {
        self.writer.as_bytes()
    }

    /// Appends raw bytes to the buffer, bypassing encoding.
    pub fn append(&mut self, bytes: &[u8]) {
        self.writer.put_slice(bytes);
    }

    /// Consumes the encoder and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }

    /// Clears the buffer and all per-stream tables for reuse.
    pub fn reset(&mut self) {
        self.writer.clear();
        self.refs.clear();
        self.enum_refs.clear();
        self.ref_count = 0;
        self.class_names.clear();
    }

    /// Writes the null tag.
    pub fn write_null(&mut self) -> Result<()> {
        self.writer.put_u8(BC_NULL);
        Ok(())
    }

    /// Writes a boolean tag.
    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.writer.put_u8(if v { BC_TRUE } else { BC_FALSE });
        Ok(())
    }

    /// Emits `'Q' idx` if `ptr` was already written and returns true;
    /// otherwise records `ptr` under the next reference index.
    pub(crate) fn check_ref(&mut self, ptr: usize) -> Result<bool> {
        if let Some(&idx) = self.refs.get(&ptr) {
            self.writer.put_u8(BC_REF);
            self.write_i32(idx)?;
            Ok(true)
        } else {
            self.refs.insert(ptr, self.ref_count);
            self.ref_count += 1;
            Ok(false)
        }
    }

    /// Writes the type descriptor of a typed list or map.
    pub(crate) fn write_type(&mut self, type_name: &str) -> Result<()> {
        self.write_string(type_name)
    }
}
