//! Error types for encoding and decoding.

use thiserror::Error;

/// The error type for all codec operations.
///
/// Every error is fatal for the current top-level `decode` or `encode` call;
/// the codec makes no attempt to resync after a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HessianError {
    /// The leading tag byte does not match any form of the expected kind.
    #[error("invalid tag 0x{0:02x}")]
    InvalidTag(u8),

    /// The buffer ended before a value's payload could be fully read.
    #[error("short read: need {need} byte(s), have {have}")]
    ShortRead {
        /// Bytes required to finish the current read.
        need: usize,
        /// Bytes left in the buffer.
        have: usize,
    },

    /// A reference index is negative or not yet present in the reference table.
    #[error("illegal ref index {0}")]
    IllegalRefIndex(i32),

    /// A class-definition index is not yet present in the stream table.
    #[error("illegal class-def index {0}")]
    IllegalClassIndex(i32),

    /// The wire names a class that is not in the type registry.
    #[error("unknown class {0:?}")]
    UnknownClass(String),

    /// A wire field name has no match on the host record.
    #[error("unknown field {field:?} on {class}")]
    UnknownField {
        /// Java class name of the record being decoded.
        class: String,
        /// The field name that failed to match.
        field: String,
    },

    /// A decoded value cannot be assigned to the declared host field kind.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The host value has no Hessian encoding.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Composite nesting exceeded the decoder's depth limit.
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,

    /// An inner error annotated with the class and field being decoded.
    #[error("decoding {class}.{field}: {source}")]
    Field {
        /// Java class name of the enclosing record.
        class: String,
        /// Wire name of the field that failed.
        field: String,
        /// The underlying error.
        #[source]
        source: Box<HessianError>,
    },
}

impl HessianError {
    /// Wraps this error with the class and field it occurred in.
    pub fn in_field(self, class: &str, field: &str) -> Self {
        Self::Field {
            class: class.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, unwrapping field annotations.
    pub fn root(&self) -> &HessianError {
        match self {
            Self::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, HessianError>;
