//! Error types for query parameter encoding and decoding operations.

use thiserror::Error;

/// A wire value does not match the type key it was declared with.
///
/// These errors are always recovered per parameter by the decoder: they end
/// up either as a default-value substitution or as a [`ParamError`]
/// diagnostic, never as a failed decode of the whole query string.
///
/// [`ParamError`]: crate::query::ParamError
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A primitive conversion failed (e.g. `abc` read as a number).
    #[error("Expected a {expected} value, got {raw:?}")]
    PrimitiveMismatch {
        /// Name of the primitive kind that was expected.
        expected: &'static str,
        /// The offending wire text.
        raw: String,
    },

    /// At least one array element failed primitive conversion.
    #[error("Array element type mismatch: {0:?}")]
    ArrayElementMismatch(String),

    /// A keyed-map entry did not split into exactly one key and one value,
    /// or its value failed primitive conversion.
    #[error("Malformed map entry: {0:?}")]
    MalformedEntry(String),

    /// A keyed-map key is not an integer where one was required.
    #[error("Map key is not an integer: {0:?}")]
    NonIntegerKey(String),

    /// The decoded value is not a member of the enum whitelist.
    #[error("Value is not a member of the enum: {0:?}")]
    NotInEnum(String),

    /// The text is not an ISO-8601 timestamp of the expected shape.
    #[error("Invalid ISO-8601 date: {0:?}")]
    InvalidDate(String),

    /// Failure reported by a caller-supplied codec.
    #[error("{0}")]
    Custom(String),
}

/// Errors returned by registry construction, query building and decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A wire value failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A route schema references a type key the registry does not know.
    #[error("Parameter {param:?} references unregistered type key {type_key:?}")]
    UnknownTypeKey {
        /// The schema parameter name.
        param: String,
        /// The unresolved type key.
        type_key: String,
    },

    /// Wire-format options of one shape were handed to a codec of another.
    #[error("Encoding options mismatch: expected {expected} options, found {found}")]
    OptionsMismatch {
        /// The shape the codec expects.
        expected: &'static str,
        /// The shape of the options it received.
        found: &'static str,
    },

    /// A codec was asked to encode a value of the wrong shape.
    #[error("Cannot encode a {found} value as {expected}")]
    UnsupportedValue {
        /// What the codec encodes.
        expected: &'static str,
        /// What it was given.
        found: &'static str,
    },

    /// A strict enum refused to encode a non-member.
    #[error("Refusing to encode {0:?}: not a member of the enum")]
    RejectedEnumValue(String),

    /// An override supplied only one half of the encode/decode pair.
    #[error("Override for type key {0:?} must replace both encode and decode")]
    OverrideInconsistency(String),

    /// A custom type key has the same name as a built-in one.
    #[error("Custom type key {0:?} collides with a built-in type key")]
    TypeKeyCollision(String),

    /// An override names a type key that is not built in.
    #[error("Cannot override {0:?}: not a built-in type key")]
    UnknownOverrideTarget(String),

    /// A route schema document could not be parsed.
    #[error("Invalid route schema: {0}")]
    InvalidSchema(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Recoverable per parameter.
    Decode,
    /// Registry or schema misconfiguration. Not recoverable.
    Configuration,
    /// Contract violation by the value or the codec at encode time.
    Encode,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Decode(_) => ErrorKind::Decode,
            Error::UnknownTypeKey { .. }
            | Error::OptionsMismatch { .. }
            | Error::OverrideInconsistency(_)
            | Error::TypeKeyCollision(_)
            | Error::UnknownOverrideTarget(_)
            | Error::InvalidSchema(_) => ErrorKind::Configuration,
            Error::UnsupportedValue { .. } | Error::RejectedEnumValue(_) => ErrorKind::Encode,
        }
    }
}
