//! A wrapper to keep confidential values out of debug output.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A wrapper for secret values, e.g., passwords and authentication payloads.
///
/// The `Debug` implementation prints a placeholder instead of the inner
/// value, so that transcripts and logs do not leak credentials. Use
/// [`Secret::declassify`] for intentional access.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    /// Wrap a value.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Expose the inner value.
    pub fn declassify(&self) -> &T {
        &self.0
    }

    /// Unwrap into the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Secret<T> {
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

impl<T> std::fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/* REDACTED */")
    }
}
