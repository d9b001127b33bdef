//! Object codec: class definitions, record instances and Java enums.
//!
//! ```text
//! class-def ::= 'C' string int string*  # class name, field count, field names
//! object    ::= 'O' int value*          # class-def index, field values
//!           ::= [x60-x6f] value*        # class-def index 0-15, field values
//! ```
//!
//! A class definition is a header, never a value: after reading one the
//! decoder immediately decodes the value that follows. Instances reference
//! their definition by stream-table index and carry exactly `field_count`
//! values in declared order.

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};
use crate::registry::{self, TypeDescriptor};
use crate::traits::{HessianEnum, HessianObject};
use crate::value::{EnumValue, Object, Value};

/// A class definition as it appears on the wire: the foreign class name and
/// the field names in declared order. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    name: String,
    field_names: Vec<String>,
}

impl ClassDefinition {
    /// Creates a class definition.
    pub fn new(name: impl Into<String>, field_names: Vec<String>) -> Self {
        Self {
            name: name.into(),
            field_names,
        }
    }

    /// The fully qualified class name.
    pub fn class_name(&self) -> &str {
        &self.name
    }

    /// Field names in wire order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Number of values following each instance header for this class.
    pub fn field_count(&self) -> usize {
        self.field_names.len()
    }
}

/// Wire field name -> host field name: exact match first, then the wire
/// name against the host identifier lowercased. The wire name's own case
/// is never folded.
fn match_field<'h>(wire: &str, host: &[&'h str]) -> Option<&'h str> {
    host.iter()
        .copied()
        .find(|h| *h == wire)
        .or_else(|| {
            host.iter()
                .copied()
                .find(|h| wire == h.to_ascii_lowercase())
        })
}

impl Decoder<'_> {
    pub(crate) fn read_object_tag(&mut self, tag: u8) -> Result<Value> {
        match tag {
            BC_OBJECT_DEF => {
                let def = self.read_class_def()?;
                self.class_defs.push(def);
                // a class-def is a header; the value it precedes comes next
                self.read_value()
            }
            BC_OBJECT => {
                let idx = self.read_i32()?;
                self.read_instance(idx)
            }
            0x60..=0x6f => self.read_instance(i32::from(tag - BC_OBJECT_DIRECT)),
            _ => Err(HessianError::InvalidTag(tag)),
        }
    }

    fn read_class_def(&mut self) -> Result<ClassDefinition> {
        let name = self.read_string()?;
        let count = self.read_i32()?;
        if count < 0 {
            return Err(HessianError::TypeMismatch(format!(
                "negative field count {count} in class-def {name}"
            )));
        }
        let mut field_names = Vec::new();
        for _ in 0..count {
            field_names.push(self.read_string()?);
        }
        Ok(ClassDefinition::new(name, field_names))
    }

    fn read_instance(&mut self, idx: i32) -> Result<Value> {
        if idx < 0 || idx as usize >= self.class_defs.len() {
            return Err(HessianError::IllegalClassIndex(idx));
        }
        let def = self.class_defs[idx as usize].clone();

        let descriptor = registry::lookup(def.class_name())
            .ok_or_else(|| HessianError::UnknownClass(def.class_name().to_string()))?;

        let instance = match descriptor.new_instance() {
            Some(instance) => instance,
            None => return self.read_enum_instance(&def, &descriptor),
        };
        let host_fields = instance.field_names();

        let object = Object::new(instance);
        self.refs.push(Value::Object(object.clone()));

        for wire_name in def.field_names() {
            let host = match_field(wire_name, host_fields).ok_or_else(|| {
                HessianError::UnknownField {
                    class: def.class_name().to_string(),
                    field: wire_name.clone(),
                }
            })?;
            object
                .with_mut(|record| record.decode_field(host, self))
                .map_err(|e| e.in_field(def.class_name(), wire_name))?;
        }
        Ok(Value::Object(object))
    }

    fn read_enum_instance(
        &mut self,
        def: &ClassDefinition,
        descriptor: &TypeDescriptor,
    ) -> Result<Value> {
        let name = self
            .read_string()
            .map_err(|e| e.in_field(def.class_name(), "name"))?;
        let ordinal = descriptor.resolve_enum(&name).unwrap_or(0);
        let value = EnumValue {
            class_name: def.class_name().to_string(),
            name,
            ordinal,
        };
        // enums join the reference table after resolution, not before
        self.refs.push(Value::Enum(value.clone()));
        Ok(Value::Enum(value))
    }

    /// Reads an enum-typed field.
    ///
    /// An integer read is attempted first; on a non-integer tag the byte is
    /// un-read and a full object decode yields the enum, whose ordinal is
    /// assigned. A null yields the sentinel variant.
    pub fn read_enum<E: HessianEnum>(&mut self) -> Result<E> {
        match self.read_i64() {
            Ok(ordinal) => Ok(E::from_ordinal(ordinal as i32)),
            Err(HessianError::InvalidTag(_)) => {
                self.reader.unread_byte();
                match self.read_value()? {
                    Value::Enum(value) => Ok(value.to_enum()),
                    Value::Null => Ok(E::from_ordinal(0)),
                    other => Err(HessianError::TypeMismatch(format!(
                        "expected enum, found {}",
                        other.kind()
                    ))),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Decodes the next value as a concrete record type.
    ///
    /// A null yields `T::default()`; anything other than an instance of `T`
    /// is a type mismatch.
    pub fn decode_typed<T: HessianObject + Default + Clone>(&mut self) -> Result<T> {
        match self.read_value()? {
            Value::Object(object) => object.get::<T>().ok_or_else(|| {
                HessianError::TypeMismatch(format!(
                    "object {} is not the requested host type",
                    object.class_name()
                ))
            }),
            Value::Null => Ok(T::default()),
            other => Err(HessianError::TypeMismatch(format!(
                "expected object, found {}",
                other.kind()
            ))),
        }
    }
}

impl Encoder {
    /// Encodes a record instance, emitting its class-def on first use.
    ///
    /// Sharing is detected by the address of the record: encoding the same
    /// instance again within one stream emits a back-reference.
    pub fn encode_object(&mut self, record: &dyn HessianObject) -> Result<()> {
        if record.java_class_name().is_empty() {
            return Err(HessianError::UnsupportedType(
                "record with an empty class name".to_string(),
            ));
        }
        let ptr = record as *const dyn HessianObject as *const () as usize;
        if self.check_ref(ptr)? {
            return Ok(());
        }
        self.write_record_body(record)
    }

    pub(crate) fn write_object_value(&mut self, object: &Object) -> Result<()> {
        if self.check_ref(object.ptr_id())? {
            return Ok(());
        }
        object.with(|record| self.write_record_body(record))
    }

    fn write_record_body(&mut self, record: &dyn HessianObject) -> Result<()> {
        let idx = self.class_def_index(record.java_class_name(), record.field_names())?;
        self.write_instance_header(idx)?;
        for name in record.field_names() {
            record.encode_field(name, self)?;
        }
        Ok(())
    }

    /// Writes an enum constant, registering its capability for decoders in
    /// this process.
    pub fn write_enum<E: HessianEnum>(&mut self, value: E) -> Result<()> {
        registry::register_enum::<E>();
        self.write_enum_value(&EnumValue::of(value))
    }

    pub(crate) fn write_enum_value(&mut self, value: &EnumValue) -> Result<()> {
        let key = (value.class_name.clone(), value.name.clone());
        if let Some(&idx) = self.enum_refs.get(&key) {
            self.writer.put_u8(BC_REF);
            return self.write_i32(idx);
        }
        self.enum_refs.insert(key, self.ref_count);
        self.ref_count += 1;

        let idx = self.class_def_index(&value.class_name, &["name"])?;
        self.write_instance_header(idx)?;
        self.write_string(&value.name)
    }

    fn class_def_index(&mut self, class_name: &str, field_names: &[&str]) -> Result<i32> {
        if let Some(pos) = self.class_names.iter().position(|n| n == class_name) {
            return Ok(pos as i32);
        }
        let idx = self.class_names.len() as i32;
        self.class_names.push(class_name.to_string());
        self.writer.put_u8(BC_OBJECT_DEF);
        self.write_string(class_name)?;
        self.write_i32(field_names.len() as i32)?;
        for field in field_names {
            self.write_string(field)?;
        }
        Ok(idx)
    }

    fn write_instance_header(&mut self, idx: i32) -> Result<()> {
        if idx <= i32::from(OBJECT_DIRECT_MAX) {
            self.writer.put_u8(BC_OBJECT_DIRECT + idx as u8);
            Ok(())
        } else {
            self.writer.put_u8(BC_OBJECT);
            self.write_i32(idx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{register_enum, register_record};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Car {
        color: String,
        model: String,
    }

    impl HessianObject for Car {
        fn java_class_name(&self) -> &str {
            "example.Car"
        }

        fn field_names(&self) -> &'static [&'static str] {
            &["color", "model"]
        }

        fn encode_field(&self, name: &str, encoder: &mut Encoder) -> Result<()> {
            match name {
                "color" => encoder.write_string(&self.color),
                "model" => encoder.write_string(&self.model),
                _ => Err(HessianError::UnknownField {
                    class: self.java_class_name().to_string(),
                    field: name.to_string(),
                }),
            }
        }

        fn decode_field(&mut self, name: &str, decoder: &mut Decoder<'_>) -> Result<()> {
            match name {
                "color" => self.color = decoder.read_string()?,
                "model" => self.model = decoder.read_string()?,
                _ => {
                    return Err(HessianError::UnknownField {
                        class: self.java_class_name().to_string(),
                        field: name.to_string(),
                    })
                }
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Color {
        #[default]
        Unknown,
        Red,
        Green,
        Blue,
    }

    impl HessianEnum for Color {
        fn java_class_name() -> &'static str {
            "example.Color"
        }

        fn string_name(&self) -> &'static str {
            match self {
                Color::Unknown => "UNKNOWN",
                Color::Red => "RED",
                Color::Green => "GREEN",
                Color::Blue => "BLUE",
            }
        }

        fn enum_value(name: &str) -> Self {
            match name {
                "RED" => Color::Red,
                "GREEN" => Color::Green,
                "BLUE" => Color::Blue,
                _ => Color::Unknown,
            }
        }

        fn ordinal(&self) -> i32 {
            *self as i32
        }

        fn from_ordinal(ordinal: i32) -> Self {
            match ordinal {
                1 => Color::Red,
                2 => Color::Green,
                3 => Color::Blue,
                _ => Color::Unknown,
            }
        }
    }

    fn car_class_def_bytes() -> Vec<u8> {
        let mut bytes = vec![0x43];
        bytes.extend_from_slice(b"\x0bexample.Car");
        bytes.push(0x92);
        bytes.extend_from_slice(b"\x05color");
        bytes.extend_from_slice(b"\x05model");
        bytes
    }

    #[test]
    fn test_encode_car_matches_reference_bytes() {
        let car = Car {
            color: "red".to_string(),
            model: "corvette".to_string(),
        };
        let mut encoder = Encoder::new();
        encoder.encode_object(&car).unwrap();

        let mut expected = car_class_def_bytes();
        expected.push(0x60);
        expected.extend_from_slice(b"\x03red");
        expected.extend_from_slice(b"\x08corvette");
        assert_eq!(encoder.buffer(), expected.as_slice());
    }

    #[test]
    fn test_second_instance_reuses_class_def() {
        let first = Car {
            color: "red".to_string(),
            model: "corvette".to_string(),
        };
        let second = Car {
            color: "green".to_string(),
            model: "civic".to_string(),
        };
        let mut encoder = Encoder::new();
        encoder.encode_object(&first).unwrap();
        let after_first = encoder.buffer().len();
        encoder.encode_object(&second).unwrap();

        let mut tail = vec![0x60];
        tail.extend_from_slice(b"\x05green");
        tail.extend_from_slice(b"\x05civic");
        assert_eq!(&encoder.buffer()[after_first..], tail.as_slice());
    }

    #[test]
    fn test_decode_car() {
        register_record::<Car>();
        let mut bytes = car_class_def_bytes();
        bytes.push(0x60);
        bytes.extend_from_slice(b"\x03red");
        bytes.extend_from_slice(b"\x08corvette");

        let mut decoder = Decoder::new(&bytes);
        let car: Car = decoder.decode_typed().unwrap();
        assert_eq!(
            car,
            Car {
                color: "red".to_string(),
                model: "corvette".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_long_object_form_matches_short_form() {
        register_record::<Car>();
        let mut short_form = car_class_def_bytes();
        short_form.push(0x60);
        short_form.extend_from_slice(b"\x03red");
        short_form.extend_from_slice(b"\x08corvette");

        let mut long_form = car_class_def_bytes();
        long_form.push(0x4f); // 'O'
        long_form.push(0x90); // class-def index 0
        long_form.extend_from_slice(b"\x03red");
        long_form.extend_from_slice(b"\x08corvette");

        let a: Car = Decoder::new(&short_form).decode_typed().unwrap();
        let b: Car = Decoder::new(&long_form).decode_typed().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_trip_two_instances() {
        register_record::<Car>();
        let first = Car {
            color: "red".to_string(),
            model: "corvette".to_string(),
        };
        let second = Car {
            color: "green".to_string(),
            model: "civic".to_string(),
        };
        let mut encoder = Encoder::new();
        encoder.encode_object(&first).unwrap();
        encoder.encode_object(&second).unwrap();

        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.decode_typed::<Car>().unwrap(), first);
        assert_eq!(decoder.decode_typed::<Car>().unwrap(), second);
    }

    #[test]
    fn test_unknown_class() {
        let mut bytes = vec![0x43];
        bytes.extend_from_slice(b"\x10example.Missing0");
        bytes.push(0x90); // zero fields
        bytes.push(0x60);

        let mut decoder = Decoder::new(&bytes);
        assert_eq!(
            decoder.decode(),
            Err(HessianError::UnknownClass("example.Missing0".to_string()))
        );
    }

    #[test]
    fn test_match_field_lowercases_host_only() {
        let host = ["color", "modelName"];
        assert_eq!(match_field("color", &host), Some("color"));
        assert_eq!(match_field("modelName", &host), Some("modelName"));
        // a lowercased wire name still reaches a camelCase host identifier
        assert_eq!(match_field("modelname", &host), Some("modelName"));
        // the wire name's case is taken as-is
        assert_eq!(match_field("MODELNAME", &host), None);
        assert_eq!(match_field("Color", &host), None);
    }

    #[test]
    fn test_unknown_field() {
        register_record::<Car>();
        let mut bytes = vec![0x43];
        bytes.extend_from_slice(b"\x0bexample.Car");
        bytes.push(0x91);
        bytes.extend_from_slice(b"\x05wings");
        bytes.push(0x60);
        bytes.extend_from_slice(b"\x03red");

        let mut decoder = Decoder::new(&bytes);
        assert_eq!(
            decoder.decode(),
            Err(HessianError::UnknownField {
                class: "example.Car".to_string(),
                field: "wings".to_string(),
            })
        );
    }

    #[test]
    fn test_field_error_carries_context() {
        register_record::<Car>();
        let mut bytes = car_class_def_bytes();
        bytes.push(0x60);
        bytes.push(0x54); // 'T' where a string is expected

        let mut decoder = Decoder::new(&bytes);
        let err = decoder.decode().unwrap_err();
        assert!(matches!(err, HessianError::Field { .. }));
        assert_eq!(err.root(), &HessianError::InvalidTag(0x54));
        assert!(err.to_string().contains("example.Car.color"));
    }

    #[test]
    fn test_illegal_class_index() {
        let mut decoder = Decoder::new(&[0x60]);
        assert_eq!(decoder.decode(), Err(HessianError::IllegalClassIndex(0)));
    }

    #[test]
    fn test_enum_encodes_class_def_then_refs() {
        register_enum::<Color>();
        let mut encoder = Encoder::new();
        encoder.write_enum(Color::Green).unwrap();
        encoder.write_enum(Color::Green).unwrap();

        let mut expected = vec![0x43];
        expected.extend_from_slice(b"\x0dexample.Color");
        expected.push(0x91);
        expected.extend_from_slice(b"\x04name");
        expected.push(0x60);
        expected.extend_from_slice(b"\x05GREEN");
        // the second occurrence is a back-reference to table slot 0
        expected.extend_from_slice(&[0x51, 0x90]);
        assert_eq!(encoder.buffer(), expected.as_slice());
    }

    #[test]
    fn test_enum_round_trip_preserves_identity() {
        register_enum::<Color>();
        let mut encoder = Encoder::new();
        encoder.write_enum(Color::Green).unwrap();
        encoder.write_enum(Color::Green).unwrap();
        encoder.write_enum(Color::Blue).unwrap();

        let bytes = encoder.into_bytes();
        let mut decoder = Decoder::new(&bytes);
        let first = decoder.decode().unwrap().unwrap();
        let second = decoder.decode().unwrap().unwrap();
        let third = decoder.decode().unwrap().unwrap();

        assert_eq!(first, second);
        let green = first.as_enum().unwrap();
        assert_eq!(green.name, "GREEN");
        assert_eq!(green.ordinal, 2);
        assert_eq!(green.to_enum::<Color>(), Color::Green);
        assert_eq!(third.as_enum().unwrap().to_enum::<Color>(), Color::Blue);
    }

    #[test]
    fn test_unknown_enum_name_resolves_to_sentinel() {
        register_enum::<Color>();
        let mut bytes = vec![0x43];
        bytes.extend_from_slice(b"\x0dexample.Color");
        bytes.push(0x91);
        bytes.extend_from_slice(b"\x04name");
        bytes.push(0x60);
        bytes.extend_from_slice(b"\x06MAROON");

        let mut decoder = Decoder::new(&bytes);
        let value = decoder.decode().unwrap().unwrap();
        assert_eq!(value.as_enum().unwrap().ordinal, 0);
    }

    #[test]
    fn test_read_enum_accepts_ordinal_int() {
        let mut decoder = Decoder::new(&[0x92]);
        assert_eq!(decoder.read_enum::<Color>().unwrap(), Color::Green);
    }

    #[test]
    fn test_read_enum_recovers_from_object_form() {
        register_enum::<Color>();
        let mut encoder = Encoder::new();
        encoder.write_enum(Color::Blue).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_enum::<Color>().unwrap(), Color::Blue);
    }

    #[test]
    fn test_read_enum_null_is_sentinel() {
        let mut decoder = Decoder::new(&[0x4e]);
        assert_eq!(decoder.read_enum::<Color>().unwrap(), Color::Unknown);
    }

    #[test]
    fn test_encode_object_with_empty_class_name() {
        #[derive(Debug, Clone, Default)]
        struct Anonymous;

        impl HessianObject for Anonymous {
            fn java_class_name(&self) -> &str {
                ""
            }

            fn field_names(&self) -> &'static [&'static str] {
                &[]
            }

            fn encode_field(&self, _: &str, _: &mut Encoder) -> Result<()> {
                Ok(())
            }

            fn decode_field(&mut self, _: &str, _: &mut Decoder<'_>) -> Result<()> {
                Ok(())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let mut encoder = Encoder::new();
        assert!(matches!(
            encoder.encode_object(&Anonymous),
            Err(HessianError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_shared_object_value_encodes_as_ref() {
        register_record::<Car>();
        let car = Object::from_record(Car {
            color: "red".to_string(),
            model: "gt".to_string(),
        });
        let list = crate::value::List::new();
        list.push(Value::Object(car.clone()));
        list.push(Value::Object(car));

        let mut encoder = Encoder::new();
        encoder.write_list(&list).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = Decoder::new(&bytes);
        let decoded = decoder.decode().unwrap().unwrap();
        let decoded_list = decoded.as_list().unwrap();
        let (Some(Value::Object(a)), Some(Value::Object(b))) =
            (decoded_list.get(0), decoded_list.get(1))
        else {
            panic!("expected two objects");
        };
        assert!(a.ptr_eq(&b));
        assert_eq!(a.get::<Car>().unwrap().model, "gt");
    }
}
