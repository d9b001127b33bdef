//! Hessian 2 binary serialization codec with a Java-compatible object model.
//!
//! The codec round-trips primitives, collections and user-defined records
//! over the Hessian 2 wire grammar, preserving sharing of composite values
//! through back-references — including cyclic structures.
//!
//! Records implement [`HessianObject`] (usually via the `hessian2-derive`
//! crate) and are registered once per process with [`register_record`];
//! Java enums map onto Rust enums through [`HessianEnum`] and
//! [`register_enum`]. Encoding and decoding then go through per-instance
//! [`Encoder`] and [`Decoder`] values:
//!
//! ```
//! use hessian2_core::{Decoder, Encoder, Value};
//!
//! let mut encoder = Encoder::new();
//! encoder.encode(&Value::from(300)).unwrap();
//! encoder.encode(&Value::from("hi")).unwrap();
//!
//! let bytes = encoder.into_bytes();
//! assert_eq!(bytes, [0xc9, 0x2c, 0x02, b'h', b'i']);
//!
//! let mut decoder = Decoder::new(&bytes);
//! assert_eq!(decoder.decode().unwrap(), Some(Value::Int(300)));
//! assert_eq!(decoder.decode().unwrap(), Some(Value::from("hi")));
//! assert_eq!(decoder.decode().unwrap(), None);
//! ```

#![warn(missing_docs)]

pub mod constants;
pub mod error;

mod binary;
mod date;
mod decoder;
mod double;
mod encoder;
mod int;
mod list;
mod long;
mod map;
mod object;
mod reader;
mod registry;
mod string;
mod traits;
mod value;
mod writer;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{HessianError, Result};
pub use object::ClassDefinition;
pub use reader::ByteReader;
pub use registry::{index_of, lookup, register_enum, register_record, TypeDescriptor};
pub use traits::{HessianEnum, HessianObject};
pub use value::{EnumValue, List, Map, Object, Value};
pub use writer::ByteWriter;
