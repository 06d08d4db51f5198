//! Validation errors.

use thiserror::Error;

/// Error returned when a value does not satisfy the invariants of the type
/// it was to be converted into.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("validation failed: {kind}")]
pub struct ValidationError {
    kind: ValidationErrorKind,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum ValidationErrorKind {
    #[error("must not be empty")]
    Empty,
    #[error("invalid value")]
    Invalid,
    #[error("invalid byte b'\\x{found:02x}' at index {position}")]
    ByteNotAllowed { found: u8, position: usize },
    #[error("value out of range")]
    OutOfRange,
}
