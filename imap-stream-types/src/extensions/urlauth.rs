//! The IMAP URLAUTH extension (RFC 4467, used by RFC 5092 IMAP URLs).

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::{AString, Atom};

/// An URLAUTH authorization mechanism.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum UrlMechanism<'a> {
    /// The `INTERNAL` mechanism.
    Internal,
    /// Some other mechanism.
    Other(Atom<'a>),
}

impl<'a> From<Atom<'a>> for UrlMechanism<'a> {
    fn from(atom: Atom<'a>) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_ref() {
            "INTERNAL" => Self::Internal,
            _ => Self::Other(atom),
        }
    }
}

impl Display for UrlMechanism<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Internal => f.write_str("INTERNAL"),
            Self::Other(atom) => f.write_str(atom.inner()),
        }
    }
}

/// A rump URL/mechanism pair of a GENURLAUTH command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UrlAuthItem<'a> {
    pub url: AString<'a>,
    pub mechanism: UrlMechanism<'a>,
}
