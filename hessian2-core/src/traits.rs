//! Serialization traits implemented by host record types.
//!
//! A user-defined struct becomes encodable and decodable by implementing
//! [`HessianObject`], either by hand or through the `hessian2-derive` crate.
//! Java enums map onto Rust enums through [`HessianEnum`].

use std::any::Any;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::Result;

/// A host record with a foreign (Java) class identity and named fields.
///
/// The codec drives instances through this trait: the encoder asks for the
/// class name and field order and then serializes one field at a time; the
/// decoder allocates a fresh instance via the type registry and assigns each
/// wire field through [`decode_field`](Self::decode_field).
///
/// `decode_field` is where the per-field kind dispatch lives: scalar fields
/// call the typed readers on [`Decoder`] so that a wrong tag surfaces
/// immediately, composite fields go through the top-level decode.
pub trait HessianObject: Any {
    /// The fully qualified Java class name, e.g. `example.Car`.
    fn java_class_name(&self) -> &str;

    /// Wire field names in declared order.
    fn field_names(&self) -> &'static [&'static str];

    /// Encodes the named field onto the encoder.
    fn encode_field(&self, name: &str, encoder: &mut Encoder) -> Result<()>;

    /// Decodes the named field from the decoder and assigns it.
    fn decode_field(&mut self, name: &str, decoder: &mut Decoder<'_>) -> Result<()>;

    /// Upcasts for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// A Rust enum standing in for a Java enum.
///
/// On the wire a Java enum is an object with the single field `name`. The
/// ordinal numbering starts at the first declared variant, which doubles as
/// the invalid sentinel: unknown names and out-of-range ordinals resolve to
/// ordinal 0.
pub trait HessianEnum: Copy + 'static {
    /// The fully qualified Java class name, e.g. `example.Color`.
    fn java_class_name() -> &'static str;

    /// The variant name as written on the wire, e.g. `GREEN`.
    fn string_name(&self) -> &'static str;

    /// Resolves a wire name to a variant; the sentinel variant on a miss.
    fn enum_value(name: &str) -> Self;

    /// The declaration-order ordinal of this variant; 0 is the sentinel.
    fn ordinal(&self) -> i32;

    /// Resolves an ordinal to a variant; the sentinel variant if out of range.
    fn from_ordinal(ordinal: i32) -> Self;
}
