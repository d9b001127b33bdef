//! Derive macros for the `hessian2-core` serialization traits.
//!
//! This crate provides two derive macros:
//!
//! - [`HessianObject`] — generates a `HessianObject` implementation mapping
//!   a struct onto a Java class: class name, wire field order, and the
//!   per-field encode/decode dispatch.
//! - [`HessianEnum`] — generates a `HessianEnum` implementation mapping a
//!   unit-variant enum onto a Java enum.
//!
//! # Example
//!
//! ```ignore
//! use hessian2_derive::{HessianEnum, HessianObject};
//!
//! #[derive(HessianObject, Debug, Clone, Default)]
//! #[hessian(class_name = "example.Car")]
//! struct Car {
//!     color: String,
//!     #[hessian(field_name = "modelName")]
//!     model: String,
//! }
//!
//! #[derive(HessianEnum, Debug, Clone, Copy, PartialEq)]
//! #[hessian(class_name = "example.Color")]
//! enum Color {
//!     Unknown, // first variant is the invalid sentinel, ordinal 0
//!     Red,
//!     Green,
//!     Blue,
//! }
//! ```

extern crate proc_macro;

mod enumeration;
mod object;

use proc_macro::TokenStream;

/// Derives the `HessianObject` trait for a struct with named fields.
///
/// The struct must also be `Clone` and, for registration and typed decode,
/// `Default`.
///
/// # Attributes
///
/// ## Struct-level
/// - `#[hessian(class_name = "...")]` — the fully qualified Java class name
///   (defaults to the Rust struct name).
///
/// ## Field-level
/// - `#[hessian(field_name = "...")]` — overrides the wire field name
///   (defaults to the Rust name converted to camelCase).
/// - `#[hessian(enumeration)]` — marks a field whose type implements
///   `HessianEnum`.
/// - `#[hessian(skip)]` — leaves the field off the wire entirely.
///
/// # Supported Field Types
///
/// `bool`, `i8`, `i16`, `i32`, `i64`, `isize`, `f32`, `f64`, `String`,
/// `Vec<u8>`, `DateTime<Utc>`, `Value`, `List`, `Map`, nested
/// `HessianObject` structs, and `Option<T>` of any of these (`None` maps to
/// null on the wire).
#[proc_macro_derive(HessianObject, attributes(hessian))]
pub fn derive_object(input: TokenStream) -> TokenStream {
    object::derive_object_impl(input)
}

/// Derives the `HessianEnum` trait for an enum with unit variants.
///
/// The enum must also be `Clone` and `Copy`. Ordinals follow declaration
/// order and the first variant is the invalid sentinel (ordinal 0), used
/// when an unknown name or ordinal arrives on the wire.
///
/// # Attributes
///
/// ## Enum-level
/// - `#[hessian(class_name = "...")]` — the fully qualified Java class name
///   (defaults to the Rust enum name).
///
/// ## Variant-level
/// - `#[hessian(name = "...")]` — overrides the wire constant name
///   (defaults to the variant name converted to SCREAMING_SNAKE_CASE).
#[proc_macro_derive(HessianEnum, attributes(hessian))]
pub fn derive_enum(input: TokenStream) -> TokenStream {
    enumeration::derive_enum_impl(input)
}
