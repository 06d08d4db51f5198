//! The IMAP ACL extension (RFC 4314).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::AString;

/// An identifier/rights pair of an ACL response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AclEntry<'a> {
    pub identifier: AString<'a>,
    pub rights: Rights<'a>,
}

/// A set of rights, e.g., `lrswipkxte`.
///
/// Rights are an opaque astring at the codec layer; interpreting individual
/// right characters is left to the application.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Rights<'a>(pub AString<'a>);

impl<'a> From<AString<'a>> for Rights<'a> {
    fn from(value: AString<'a>) -> Self {
        Self(value)
    }
}

/// The rights argument of SETACL, i.e., rights with an optional `+`/`-`
/// modifier.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ModRights<'a> {
    pub mode: ModRightsMode,
    pub rights: Rights<'a>,
}

/// Whether SETACL replaces, adds, or removes the given rights.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ModRightsMode {
    Replace,
    Add,
    Remove,
}
