//! The IMAP ENABLE extension (RFC 5161).

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::Atom;

/// A capability that can be enabled via the ENABLE command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CapabilityEnable<'a> {
    /// `UTF8=ACCEPT` or `UTF8=ONLY` (RFC 6855).
    Utf8(Utf8Kind),
    /// `CONDSTORE` (RFC 7162).
    CondStore,
    /// `QRESYNC` (RFC 7162).
    ///
    /// Enabling QRESYNC also enables CONDSTORE.
    QResync,
    /// Some other capability.
    Other(CapabilityEnableOther<'a>),
}

impl<'a> From<Atom<'a>> for CapabilityEnable<'a> {
    fn from(atom: Atom<'a>) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_ref() {
            "UTF8=ACCEPT" => Self::Utf8(Utf8Kind::Accept),
            "UTF8=ONLY" => Self::Utf8(Utf8Kind::Only),
            "CONDSTORE" => Self::CondStore,
            "QRESYNC" => Self::QResync,
            _ => Self::Other(CapabilityEnableOther(atom)),
        }
    }
}

impl Display for CapabilityEnable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Utf8(Utf8Kind::Accept) => f.write_str("UTF8=ACCEPT"),
            Self::Utf8(Utf8Kind::Only) => f.write_str("UTF8=ONLY"),
            Self::CondStore => f.write_str("CONDSTORE"),
            Self::QResync => f.write_str("QRESYNC"),
            Self::Other(other) => f.write_str(other.0.inner()),
        }
    }
}

/// A capability subject to ENABLE not covered by the known variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CapabilityEnableOther<'a>(pub(crate) Atom<'a>);

impl<'a> CapabilityEnableOther<'a> {
    pub fn inner(&self) -> &Atom<'a> {
        &self.0
    }
}

/// Which UTF-8 mode is enabled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Utf8Kind {
    Accept,
    Only,
}
