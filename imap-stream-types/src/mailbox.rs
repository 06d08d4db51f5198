//! Mailbox-related types.

use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{AString, IString},
    error::{ValidationError, ValidationErrorKind},
    utils::indicators::is_list_char,
};

/// A mailbox name or a pattern in LIST/LSUB.
///
/// `list-mailbox = 1*list-char / string`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ListMailbox<'a> {
    Token(ListCharString<'a>),
    String(IString<'a>),
}

impl<'a> TryFrom<&'a str> for ListMailbox<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            // An empty string needs to be represented as "".
            return Ok(ListMailbox::String(IString::try_from(value)?));
        }

        if let Ok(lcs) = ListCharString::try_from(value) {
            return Ok(ListMailbox::Token(lcs));
        }

        Ok(ListMailbox::String(IString::try_from(value)?))
    }
}

impl<'a> AsRef<[u8]> for ListMailbox<'a> {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Token(token) => token.as_ref().as_bytes(),
            Self::String(string) => string.as_ref(),
        }
    }
}

/// A run of `list-char`s, i.e., atom chars plus `%`, `*`, and `]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ListCharString<'a>(pub(crate) Cow<'a, str>);

impl<'a> ListCharString<'a> {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(position) = value.iter().position(|b| !is_list_char(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::ByteNotAllowed {
                found: value[position],
                position,
            }));
        };

        Ok(())
    }

    pub fn inner(&self) -> &str {
        self.0.as_ref()
    }

    /// Construct without validation.
    ///
    /// The value is still checked in debug builds.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated<C>(inner: C) -> Self
    where
        C: Into<Cow<'a, str>>,
    {
        let inner = inner.into();

        #[cfg(debug_assertions)]
        Self::verify(inner.as_bytes()).unwrap();

        Self(inner)
    }
}

impl<'a> TryFrom<&'a str> for ListCharString<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(Cow::Borrowed(value)))
    }
}

impl<'a> AsRef<str> for ListCharString<'a> {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

/// A mailbox name.
///
/// The case-insensitive name `INBOX` is folded into [`Mailbox::Inbox`] on
/// construction; equality between spellings of INBOX therefore falls out of
/// derived equality.
///
/// Note: The codec does not perform modified-UTF-7 conversion; a name is an
/// opaque byte string apart from the INBOX rule.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Mailbox<'a> {
    Inbox,
    Other(MailboxOther<'a>),
}

impl<'a> From<AString<'a>> for Mailbox<'a> {
    fn from(value: AString<'a>) -> Self {
        let is_inbox = value.as_ref().eq_ignore_ascii_case(b"INBOX");

        if is_inbox {
            Self::Inbox
        } else {
            Self::Other(MailboxOther(value))
        }
    }
}

impl<'a> TryFrom<&'a str> for Mailbox<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(Mailbox::from(AString::try_from(value)?))
    }
}

impl<'a> TryFrom<String> for Mailbox<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Mailbox::from(AString::try_from(value)?))
    }
}

/// A mailbox name other than INBOX.
///
/// It's guaranteed that this type can't represent `INBOX` (in any case
/// variation).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MailboxOther<'a>(pub(crate) AString<'a>);

impl<'a> MailboxOther<'a> {
    pub fn inner(&self) -> &AString<'a> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbox_is_folded() {
        for name in ["INBOX", "inbox", "InBoX"] {
            assert_eq!(Mailbox::try_from(name).unwrap(), Mailbox::Inbox);
        }

        assert!(matches!(
            Mailbox::try_from("Archive").unwrap(),
            Mailbox::Other(_)
        ));

        // "INBOX " (with a space) is not INBOX.
        assert!(matches!(
            Mailbox::try_from("INBOX ").unwrap(),
            Mailbox::Other(_)
        ));
    }

    #[test]
    fn test_list_mailbox() {
        assert!(matches!(
            ListMailbox::try_from("%").unwrap(),
            ListMailbox::Token(_)
        ));
        assert!(matches!(
            ListMailbox::try_from("").unwrap(),
            ListMailbox::String(_)
        ));
        assert!(matches!(
            ListMailbox::try_from("a b").unwrap(),
            ListMailbox::String(_)
        ));
    }
}
