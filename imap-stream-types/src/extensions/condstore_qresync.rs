//! The IMAP CONDSTORE and QRESYNC extensions (RFC 7162).

use std::{fmt::{Display, Formatter}, num::NonZeroU32};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::Atom,
    error::{ValidationError, ValidationErrorKind},
    sequence::SequenceSet,
};

/// A modification sequence value.
///
/// An unsigned 63-bit integer; zero is reserved for "no mod-sequence"
/// (`mod-sequence-valzer`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ModSeq(u64);

impl ModSeq {
    /// The largest representable mod-sequence, i.e., `2^63 - 1`.
    pub const MAX: Self = Self(i64::MAX as u64);

    /// The reserved "no mod-sequence" value.
    pub const ZERO: Self = Self(0);

    pub fn verify(value: u64) -> Result<(), ValidationError> {
        if value > i64::MAX as u64 {
            return Err(ValidationError::new(ValidationErrorKind::OutOfRange));
        }

        Ok(())
    }

    pub fn inner(&self) -> u64 {
        self.0
    }

    /// Construct without validation.
    ///
    /// The value is still checked in debug builds.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated(inner: u64) -> Self {
        #[cfg(debug_assertions)]
        Self::verify(inner).unwrap();

        Self(inner)
    }
}

impl TryFrom<u64> for ModSeq {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value))
    }
}

impl Display for ModSeq {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The flag part of an `entry-name` in a MODSEQ search criterion, e.g.,
/// `"/flags/\\seen"` or `"/flags/$mdnsent"`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AttributeFlag<'a> {
    /// A system flag, e.g., `\\Seen` inside the quoted entry name.
    System(Atom<'a>),
    /// A keyword flag.
    Keyword(Atom<'a>),
}

impl<'a> AttributeFlag<'a> {
    pub fn system(atom: Atom<'a>) -> Self {
        Self::System(atom)
    }
}

/// Which metadata item of a flag a MODSEQ search criterion refers to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntryTypeReq {
    Private,
    Shared,
    All,
}

impl Display for EntryTypeReq {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Private => f.write_str("priv"),
            Self::Shared => f.write_str("shared"),
            Self::All => f.write_str("all"),
        }
    }
}

/// The QRESYNC parameter of SELECT/EXAMINE.
///
/// `(QRESYNC (uidvalidity mod-seq [known-uids] [seq-match-data]))`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QresyncParameter {
    pub uid_validity: NonZeroU32,
    pub mod_seq: ModSeq,
    pub known_uids: Option<SequenceSet>,
    pub seq_match_data: Option<(SequenceSet, SequenceSet)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_seq_bounds() {
        assert!(ModSeq::try_from(0).is_ok());
        assert!(ModSeq::try_from(u64::MAX / 2).is_ok());
        assert_eq!(
            ModSeq::try_from(9_223_372_036_854_775_807).unwrap(),
            ModSeq::MAX
        );
        // 2^63 is out of domain.
        assert!(ModSeq::try_from(9_223_372_036_854_775_808).is_err());
    }
}
