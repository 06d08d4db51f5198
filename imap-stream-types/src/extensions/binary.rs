//! The IMAP BINARY extension (RFC 3516).

use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::{Literal, LiteralMode, NString};

/// A binary literal, i.e., `~{<n>}\r\n<data>`.
///
/// Unlike [`Literal`], a binary literal may contain any octet, including NUL.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Literal8<'a> {
    pub data: Cow<'a, [u8]>,
    /// Specifies whether this is a synchronizing or non-synchronizing literal.
    pub mode: LiteralMode,
}

impl<'a> Literal8<'a> {
    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }
}

impl<'a> From<&'a [u8]> for Literal8<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(value),
            mode: LiteralMode::Sync,
        }
    }
}

impl<'a> From<Vec<u8>> for Literal8<'a> {
    fn from(value: Vec<u8>) -> Self {
        Self {
            data: Cow::Owned(value),
            mode: LiteralMode::Sync,
        }
    }
}

/// Either an NString or a binary literal.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum NString8<'a> {
    NString(NString<'a>),
    Literal8(Literal8<'a>),
}

/// Either a literal or a binary literal.
///
/// APPEND uses the binary form for messages transported without a
/// content-transfer-encoding when the server advertised `BINARY`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum LiteralOrLiteral8<'a> {
    Literal(Literal<'a>),
    Literal8(Literal8<'a>),
}

impl<'a> LiteralOrLiteral8<'a> {
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Literal(literal) => literal.data(),
            Self::Literal8(literal8) => literal8.data(),
        }
    }
}

impl<'a> From<Literal<'a>> for LiteralOrLiteral8<'a> {
    fn from(value: Literal<'a>) -> Self {
        Self::Literal(value)
    }
}

impl<'a> From<Literal8<'a>> for LiteralOrLiteral8<'a> {
    fn from(value: Literal8<'a>) -> Self {
        Self::Literal8(value)
    }
}
