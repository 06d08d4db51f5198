//! Sequence sets over message sequence numbers or UIDs.

use std::{fmt::Debug, num::NonZeroU32, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::Vec1,
    error::{ValidationError, ValidationErrorKind},
};

pub const ONE: NonZeroU32 = match NonZeroU32::new(1) {
    Some(one) => one,
    None => panic!(),
};
pub const MIN: NonZeroU32 = ONE;
pub const MAX: NonZeroU32 = match NonZeroU32::new(u32::MAX) {
    Some(max) => max,
    None => panic!(),
};

/// A set of message sequence numbers or UIDs.
///
/// Either the saved result reference `$` (RFC 5182) or one or more
/// [`Sequence`]s. Ranges are canonicalized (smaller endpoint first, with `*`
/// greatest) when they come out of the parser; sets preserve the order of
/// their elements.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SequenceSet {
    /// The result of the last SEARCH (or similar) command, i.e., `$`.
    ///
    /// <div class="warning">
    /// This must only be used when the server advertised support for it
    /// sending the SEARCHRES capability.
    /// </div>
    SavedResult,
    /// One or more sequence numbers or ranges.
    Sequences(Vec1<Sequence>),
}

impl From<Sequence> for SequenceSet {
    fn from(sequence: Sequence) -> Self {
        Self::Sequences(Vec1::from(sequence))
    }
}

impl From<NonZeroU32> for SequenceSet {
    fn from(value: NonZeroU32) -> Self {
        Self::from(Sequence::from(value))
    }
}

impl From<Vec1<Sequence>> for SequenceSet {
    fn from(sequences: Vec1<Sequence>) -> Self {
        Self::Sequences(sequences)
    }
}

impl TryFrom<Vec<Sequence>> for SequenceSet {
    type Error = ValidationError;

    fn try_from(sequences: Vec<Sequence>) -> Result<Self, Self::Error> {
        Ok(Self::Sequences(Vec1::try_from(sequences).map_err(
            |_| ValidationError::new(ValidationErrorKind::Empty),
        )?))
    }
}

impl TryFrom<&str> for SequenceSet {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for SequenceSet {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "$" {
            return Ok(SequenceSet::SavedResult);
        }

        let mut results = vec![];

        for seq in value.split(',') {
            results.push(Sequence::try_from(seq)?);
        }

        Ok(SequenceSet::Sequences(Vec1::try_from(results).map_err(
            |_| ValidationError::new(ValidationErrorKind::Empty),
        )?))
    }
}

/// A single sequence number or a range.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Sequence {
    Single(SeqOrUid),
    Range(SeqOrUid, SeqOrUid),
}

impl Sequence {
    /// Return the range with the smaller endpoint first (`*` is greatest).
    pub fn normalized(self) -> Self {
        match self {
            Self::Range(from, to) if to < from => Self::Range(to, from),
            other => other,
        }
    }
}

impl From<SeqOrUid> for Sequence {
    fn from(value: SeqOrUid) -> Self {
        Self::Single(value)
    }
}

impl From<NonZeroU32> for Sequence {
    fn from(value: NonZeroU32) -> Self {
        Self::Single(SeqOrUid::from(value))
    }
}

impl TryFrom<&str> for Sequence {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Sequence {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split(':').count() {
            0 => Err(ValidationError::new(ValidationErrorKind::Empty)),
            1 => Ok(Sequence::Single(SeqOrUid::try_from(value)?)),
            2 => {
                let mut split = value.split(':');

                let start = split.next().unwrap();
                let end = split.next().unwrap();

                Ok(Sequence::Range(
                    SeqOrUid::try_from(start)?,
                    SeqOrUid::try_from(end)?,
                ))
            }
            _ => Err(ValidationError::new(ValidationErrorKind::Invalid)),
        }
    }
}

/// A sequence number, UID, or the `*` sentinel.
///
/// `*` represents the largest number in use.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SeqOrUid {
    Value(NonZeroU32),
    Asterisk,
}

impl SeqOrUid {
    /// Expand the `*` sentinel against a largest-in-use value.
    pub fn expand(&self, largest: NonZeroU32) -> NonZeroU32 {
        match self {
            Self::Value(value) => *value,
            Self::Asterisk => largest,
        }
    }
}

impl PartialOrd for SeqOrUid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeqOrUid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // `*` denotes the largest value in use.
        match (self, other) {
            (Self::Asterisk, Self::Asterisk) => std::cmp::Ordering::Equal,
            (Self::Asterisk, Self::Value(_)) => std::cmp::Ordering::Greater,
            (Self::Value(_), Self::Asterisk) => std::cmp::Ordering::Less,
            (Self::Value(a), Self::Value(b)) => a.cmp(b),
        }
    }
}

impl From<NonZeroU32> for SeqOrUid {
    fn from(value: NonZeroU32) -> Self {
        Self::Value(value)
    }
}

impl TryFrom<u32> for SeqOrUid {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match NonZeroU32::try_from(value) {
            Ok(value) => Ok(Self::Value(value)),
            Err(_) => Err(ValidationError::new(ValidationErrorKind::Invalid)),
        }
    }
}

impl TryFrom<&str> for SeqOrUid {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for SeqOrUid {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "*" {
            return Ok(SeqOrUid::Asterisk);
        }

        // Rationale: `NonZeroU32::from_str` accepts a leading `+`, IMAP doesn't.
        if value.starts_with('+') {
            return Err(ValidationError::new(ValidationErrorKind::Invalid));
        }

        match value.parse::<NonZeroU32>() {
            Ok(value) => Ok(SeqOrUid::Value(value)),
            Err(_) => Err(ValidationError::new(ValidationErrorKind::Invalid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_set_from_str() {
        assert_eq!(
            SequenceSet::try_from("1").unwrap(),
            SequenceSet::from(Sequence::Single(SeqOrUid::Value(ONE))),
        );
        assert_eq!(SequenceSet::try_from("$").unwrap(), SequenceSet::SavedResult);
        assert_eq!(
            SequenceSet::try_from("1:*").unwrap(),
            SequenceSet::from(Sequence::Range(SeqOrUid::Value(ONE), SeqOrUid::Asterisk)),
        );

        assert!(SequenceSet::try_from("").is_err());
        assert!(SequenceSet::try_from("0").is_err());
        assert!(SequenceSet::try_from("1,").is_err());
        assert!(SequenceSet::try_from("+1").is_err());
        assert!(SequenceSet::try_from("1:2:3").is_err());
    }

    #[test]
    fn test_sequence_normalized() {
        let range = Sequence::try_from("4:2").unwrap();
        assert_eq!(
            range.normalized(),
            Sequence::Range(
                SeqOrUid::Value(NonZeroU32::new(2).unwrap()),
                SeqOrUid::Value(NonZeroU32::new(4).unwrap()),
            )
        );

        // `*` is the largest value in use.
        let range = Sequence::try_from("*:10").unwrap();
        assert_eq!(
            range.normalized(),
            Sequence::Range(
                SeqOrUid::Value(NonZeroU32::new(10).unwrap()),
                SeqOrUid::Asterisk,
            )
        );
    }

    #[test]
    fn test_seq_or_uid_expand() {
        let largest = NonZeroU32::new(42).unwrap();

        assert_eq!(SeqOrUid::Asterisk.expand(largest), largest);
        assert_eq!(SeqOrUid::Value(ONE).expand(largest), ONE);
    }
}
