//! Flag-related types.

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{core::Atom, error::ValidationError};

/// There are two types of flags in IMAP4rev1: system and keyword flags.
///
/// A system flag is a flag name that is pre-defined in RFC 3501. All system
/// flags begin with `\` and certain system flags (`\Deleted` and `\Seen`)
/// have special semantics. Flags that begin with `\` but are not pre-defined
/// system flags are extension flags.
///
/// A keyword is defined by the server implementation. Keywords do not begin
/// with `\`. A handful of keywords are in wide enough use that they are
/// recognized and re-emitted with their customary capitalization; see
/// [`Keyword`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Flag<'a> {
    /// Message has been answered (`\Answered`).
    Answered,
    /// Message is "deleted" for removal by later EXPUNGE (`\Deleted`).
    Deleted,
    /// Message has not completed composition (`\Draft`).
    Draft,
    /// Message is "flagged" for urgent/special attention (`\Flagged`).
    Flagged,
    /// Message has been read (`\Seen`).
    Seen,
    /// A future expansion of a system flag.
    Extension(FlagExtension<'a>),
    /// A keyword.
    Keyword(Keyword<'a>),
}

impl<'a> Flag<'a> {
    /// Fold a `\`-prefixed atom into a system flag (or an extension flag).
    ///
    /// System flag names are matched case-insensitively; an extension flag
    /// keeps its wire bytes.
    pub fn system(atom: Atom<'a>) -> Self {
        match atom.as_ref().to_ascii_lowercase().as_ref() {
            "answered" => Self::Answered,
            "deleted" => Self::Deleted,
            "draft" => Self::Draft,
            "flagged" => Self::Flagged,
            "seen" => Self::Seen,
            _ => Self::Extension(FlagExtension(atom)),
        }
    }

    pub fn keyword(atom: Atom<'a>) -> Self {
        Self::Keyword(Keyword::from(atom))
    }
}

impl<'a> TryFrom<&'a str> for Flag<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(if let Some(value) = value.strip_prefix('\\') {
            Self::system(Atom::try_from(value)?)
        } else {
            Self::keyword(Atom::try_from(value)?)
        })
    }
}

impl Display for Flag<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Flag::Answered => f.write_str("\\Answered"),
            Flag::Deleted => f.write_str("\\Deleted"),
            Flag::Draft => f.write_str("\\Draft"),
            Flag::Flagged => f.write_str("\\Flagged"),
            Flag::Seen => f.write_str("\\Seen"),
            Flag::Extension(other) => write!(f, "\\{}", other.0),
            Flag::Keyword(keyword) => write!(f, "{keyword}"),
        }
    }
}

/// An (extension) flag.
///
/// It's guaranteed that this type can't represent any flag from [`Flag`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FlagExtension<'a>(pub(crate) Atom<'a>);

impl<'a> FlagExtension<'a> {
    pub fn inner(&self) -> &Atom<'a> {
        &self.0
    }
}

/// A keyword flag.
///
/// Well-known keywords are matched case-insensitively and re-emitted in
/// their customary capitalization. Anything else keeps its wire bytes in
/// [`Keyword::Other`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Keyword<'a> {
    /// `$Forwarded`
    Forwarded,
    /// `$MDNSent`
    MdnSent,
    /// `$Junk`
    Junk,
    /// `$NotJunk`
    NotJunk,
    /// `$MailFlagBit0`
    MailFlagBit0,
    /// `$MailFlagBit1`
    MailFlagBit1,
    /// `$MailFlagBit2`
    MailFlagBit2,
    /// `Forwarded` (unregistered legacy form)
    ForwardedLegacy,
    /// `Junk` (unregistered legacy form)
    JunkLegacy,
    /// `NotJunk` (unregistered legacy form)
    NotJunkLegacy,
    /// `Redirected` (unregistered)
    Redirected,
    /// Any other keyword, wire bytes preserved.
    Other(Atom<'a>),
}

impl<'a> Keyword<'a> {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Forwarded => "$Forwarded",
            Self::MdnSent => "$MDNSent",
            Self::Junk => "$Junk",
            Self::NotJunk => "$NotJunk",
            Self::MailFlagBit0 => "$MailFlagBit0",
            Self::MailFlagBit1 => "$MailFlagBit1",
            Self::MailFlagBit2 => "$MailFlagBit2",
            Self::ForwardedLegacy => "Forwarded",
            Self::JunkLegacy => "Junk",
            Self::NotJunkLegacy => "NotJunk",
            Self::Redirected => "Redirected",
            Self::Other(atom) => atom.inner(),
        }
    }
}

impl<'a> From<Atom<'a>> for Keyword<'a> {
    fn from(atom: Atom<'a>) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_ref() {
            "$FORWARDED" => Self::Forwarded,
            "$MDNSENT" => Self::MdnSent,
            "$JUNK" => Self::Junk,
            "$NOTJUNK" => Self::NotJunk,
            "$MAILFLAGBIT0" => Self::MailFlagBit0,
            "$MAILFLAGBIT1" => Self::MailFlagBit1,
            "$MAILFLAGBIT2" => Self::MailFlagBit2,
            "FORWARDED" => Self::ForwardedLegacy,
            "JUNK" => Self::JunkLegacy,
            "NOTJUNK" => Self::NotJunkLegacy,
            "REDIRECTED" => Self::Redirected,
            _ => Self::Other(atom),
        }
    }
}

impl Display for Keyword<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flag that can occur in a FETCH FLAGS response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FlagFetch<'a> {
    Flag(Flag<'a>),

    /// Message is "recently" arrived in this mailbox (`\Recent`).
    ///
    /// Note: This flag can not be altered by the client.
    Recent,
}

impl<'a> From<Flag<'a>> for FlagFetch<'a> {
    fn from(flag: Flag<'a>) -> Self {
        Self::Flag(flag)
    }
}

/// A flag that can occur in a PERMANENTFLAGS response code.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FlagPerm<'a> {
    Flag(Flag<'a>),

    /// Indicates that it is possible to create new keywords by attempting
    /// to store those flags in the mailbox (`\*`).
    Asterisk,
}

impl<'a> From<Flag<'a>> for FlagPerm<'a> {
    fn from(flag: Flag<'a>) -> Self {
        Self::Flag(flag)
    }
}

/// A mailbox name attribute in a LIST or LSUB response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FlagNameAttribute<'a> {
    /// No child levels of hierarchy can exist under this name (`\Noinferiors`).
    Noinferiors,

    /// It is not possible to use this name as a selectable mailbox (`\Noselect`).
    Noselect,

    /// The mailbox has been marked "interesting" by the server (`\Marked`).
    Marked,

    /// The mailbox does not contain any additional messages since the last
    /// time it was selected (`\Unmarked`).
    Unmarked,

    /// The mailbox name does not refer to an existing mailbox (`\NonExistent`, RFC 5258).
    NonExistent,

    /// The mailbox is subscribed (`\Subscribed`, RFC 5258).
    Subscribed,

    /// The mailbox is a remote mailbox (`\Remote`, RFC 5258).
    Remote,

    /// The mailbox has child mailboxes (`\HasChildren`, RFC 3348).
    HasChildren,

    /// The mailbox has no child mailboxes (`\HasNoChildren`, RFC 3348).
    HasNoChildren,

    /// An extension flag.
    Extension(FlagNameAttributeExtension<'a>),
}

impl<'a> From<Atom<'a>> for FlagNameAttribute<'a> {
    fn from(atom: Atom<'a>) -> Self {
        match atom.as_ref().to_ascii_lowercase().as_ref() {
            "noinferiors" => Self::Noinferiors,
            "noselect" => Self::Noselect,
            "marked" => Self::Marked,
            "unmarked" => Self::Unmarked,
            "nonexistent" => Self::NonExistent,
            "subscribed" => Self::Subscribed,
            "remote" => Self::Remote,
            "haschildren" => Self::HasChildren,
            "hasnochildren" => Self::HasNoChildren,
            _ => Self::Extension(FlagNameAttributeExtension(atom)),
        }
    }
}

impl FlagNameAttribute<'_> {
    pub fn is_selectability(&self) -> bool {
        matches!(
            self,
            FlagNameAttribute::Noselect | FlagNameAttribute::Marked | FlagNameAttribute::Unmarked
        )
    }
}

impl Display for FlagNameAttribute<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Noinferiors => f.write_str("\\Noinferiors"),
            Self::Noselect => f.write_str("\\Noselect"),
            Self::Marked => f.write_str("\\Marked"),
            Self::Unmarked => f.write_str("\\Unmarked"),
            Self::NonExistent => f.write_str("\\NonExistent"),
            Self::Subscribed => f.write_str("\\Subscribed"),
            Self::Remote => f.write_str("\\Remote"),
            Self::HasChildren => f.write_str("\\HasChildren"),
            Self::HasNoChildren => f.write_str("\\HasNoChildren"),
            Self::Extension(extension) => write!(f, "\\{}", extension.0),
        }
    }
}

/// An extension mailbox name attribute.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FlagNameAttributeExtension<'a>(pub(crate) Atom<'a>);

/// How STORE changes the flags of a message.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StoreType {
    /// Replace the flags of the message (`FLAGS`).
    Replace,
    /// Add to the flags of the message (`+FLAGS`).
    Add,
    /// Remove from the flags of the message (`-FLAGS`).
    Remove,
}

/// Whether the server answers a STORE with the new flag values.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StoreResponse {
    Answer,
    Silent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_flag_folding() {
        assert_eq!(Flag::try_from("\\SEEN").unwrap(), Flag::Seen);
        assert_eq!(Flag::try_from("\\seen").unwrap(), Flag::Seen);
        assert_eq!(format!("{}", Flag::Seen), "\\Seen");
    }

    #[test]
    fn test_keyword_canonicalization() {
        assert_eq!(
            Flag::try_from("$forwarded").unwrap(),
            Flag::Keyword(Keyword::Forwarded)
        );
        assert_eq!(format!("{}", Keyword::Forwarded), "$Forwarded");
        assert_eq!(format!("{}", Keyword::MdnSent), "$MDNSent");

        // The unregistered legacy form is distinct from `$Forwarded`.
        assert_eq!(
            Flag::try_from("forwarded").unwrap(),
            Flag::Keyword(Keyword::ForwardedLegacy)
        );
    }

    #[test]
    fn test_unknown_keyword_preserves_bytes() {
        let flag = Flag::try_from("CustomTag").unwrap();
        assert_eq!(
            flag,
            Flag::Keyword(Keyword::Other(Atom::try_from("CustomTag").unwrap()))
        );
        assert_eq!(format!("{flag}"), "CustomTag");
    }
}
