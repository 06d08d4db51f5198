//! The IMAP QUOTA extension (RFC 2087, updated by RFC 9208).

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{core::Atom, error::ValidationError};

/// A quota resource name, e.g., `STORAGE`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Resource<'a> {
    /// The physical space estimate, in units of 1024 octets (`STORAGE`).
    Storage,
    /// The number of messages (`MESSAGE`).
    Message,
    /// The number of mailboxes (`MAILBOX`).
    Mailbox,
    /// The number of annotations (`ANNOTATION-STORAGE`).
    AnnotationStorage,
    /// Some other resource.
    Other(ResourceOther<'a>),
}

impl<'a> From<Atom<'a>> for Resource<'a> {
    fn from(atom: Atom<'a>) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_ref() {
            "STORAGE" => Self::Storage,
            "MESSAGE" => Self::Message,
            "MAILBOX" => Self::Mailbox,
            "ANNOTATION-STORAGE" => Self::AnnotationStorage,
            _ => Self::Other(ResourceOther(atom)),
        }
    }
}

impl<'a> TryFrom<&'a str> for Resource<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(Self::from(Atom::try_from(value)?))
    }
}

impl Display for Resource<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Storage => f.write_str("STORAGE"),
            Self::Message => f.write_str("MESSAGE"),
            Self::Mailbox => f.write_str("MAILBOX"),
            Self::AnnotationStorage => f.write_str("ANNOTATION-STORAGE"),
            Self::Other(other) => f.write_str(other.0.inner()),
        }
    }
}

/// A resource not covered by [`Resource`]'s variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ResourceOther<'a>(pub(crate) Atom<'a>);

/// A usage/limit pair in a QUOTA response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QuotaGet<'a> {
    pub resource: Resource<'a>,
    /// The current usage of the resource.
    pub usage: u64,
    /// The limit of the resource.
    pub limit: u64,
}

/// A limit in a SETQUOTA command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QuotaSet<'a> {
    pub resource: Resource<'a>,
    pub limit: u64,
}
