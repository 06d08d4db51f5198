//! Core data types.
//!
//! This module exposes the crate's "string types". IMAP has four string
//! shapes on the wire (atom, quoted, literal, binary literal) and a few
//! grammar-level unions over them:
//!
//! ```text
//!        ┌───────┐ ┌─────────────────┐
//!        │AString│ │     NString     │
//!        └──┬─┬──┘ │(Option<IString>)│
//!           │ │    └─────┬───────────┘
//!           │ └──────┐   │
//!           │        │   │
//! ┌────┐ ┌──▼────┐ ┌─▼───▼─┐
//! │Atom│ │AtomExt│ │IString│
//! └────┘ └───────┘ └┬─────┬┘
//!                   │     │
//!             ┌─────▼─┐ ┌─▼────┐
//!             │Literal│ │Quoted│
//!             └───────┘ └──────┘
//! ```
//!
//! Every type validates its invariant on construction (`TryFrom`); the
//! `unvalidated` feature exposes unchecked constructors for the parser,
//! whose grammar already guarantees the invariants.

use std::{borrow::Cow, str::from_utf8, vec::IntoIter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{ValidationError, ValidationErrorKind},
    utils::indicators::{
        is_any_text_char_except_quoted_specials, is_astring_char, is_atom_char, is_char8,
        is_quoted_specials, is_tag_char, is_text_char,
    },
};

macro_rules! impl_try_from {
    ($via:ty, $lifetime:lifetime, $from:ty, $target:ty) => {
        impl<$lifetime> TryFrom<$from> for $target {
            type Error = <$via as TryFrom<$from>>::Error;

            fn try_from(value: $from) -> Result<Self, Self::Error> {
                let value = <$via>::try_from(value)?;

                Ok(Self::from(value))
            }
        }
    };
}

pub(crate) use impl_try_from;

macro_rules! impl_unvalidated_str {
    ($target:ident) => {
        impl<'a> $target<'a> {
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
    };
}

// ----- Atom -----

/// An atom.
///
/// "An atom consists of one or more non-special characters." ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Atom<'a>(pub(crate) Cow<'a, str>);

impl<'a> Atom<'a> {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(position) = value.iter().position(|b| !is_atom_char(*b)) {
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

    pub fn into_inner(self) -> Cow<'a, str> {
        self.0
    }
}

impl_unvalidated_str!(Atom);

impl<'a> TryFrom<&'a [u8]> for Atom<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        // Safety: `unwrap` can't panic due to `verify`.
        Ok(Self(Cow::Borrowed(from_utf8(value).unwrap())))
    }
}

impl<'a> TryFrom<Vec<u8>> for Atom<'a> {
    type Error = ValidationError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        // Safety: `unwrap` can't panic due to `verify`.
        Ok(Self(Cow::Owned(String::from_utf8(value).unwrap())))
    }
}

impl<'a> TryFrom<&'a str> for Atom<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(Cow::Borrowed(value)))
    }
}

impl<'a> TryFrom<String> for Atom<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(Cow::Owned(value)))
    }
}

impl<'a> AsRef<str> for Atom<'a> {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl std::fmt::Display for Atom<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.inner())
    }
}

// ----- AtomExt -----

/// An (extended) atom.
///
/// According to IMAP's formal syntax, an atom with additional allowed chars
/// (`ASTRING-CHAR`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AtomExt<'a>(pub(crate) Cow<'a, str>);

impl<'a> AtomExt<'a> {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(position) = value.iter().position(|b| !is_astring_char(*b)) {
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

    pub fn into_inner(self) -> Cow<'a, str> {
        self.0
    }
}

impl_unvalidated_str!(AtomExt);

impl<'a> TryFrom<&'a [u8]> for AtomExt<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        // Safety: `unwrap` can't panic due to `verify`.
        Ok(Self(Cow::Borrowed(from_utf8(value).unwrap())))
    }
}

impl<'a> TryFrom<&'a str> for AtomExt<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(Cow::Borrowed(value)))
    }
}

impl<'a> TryFrom<String> for AtomExt<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(Cow::Owned(value)))
    }
}

impl<'a> From<Atom<'a>> for AtomExt<'a> {
    fn from(value: Atom<'a>) -> Self {
        Self(value.0)
    }
}

impl<'a> AsRef<str> for AtomExt<'a> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ----- IString -----

/// Either a literal or a quoted string.
///
/// "The empty string is represented as either "" (a quoted string with zero
/// characters between double quotes) or as {0} followed by CRLF (a literal
/// with an octet count of 0)." ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum IString<'a> {
    Literal(Literal<'a>),
    Quoted(Quoted<'a>),
}

impl<'a> IString<'a> {
    pub fn into_inner(self) -> Cow<'a, [u8]> {
        match self {
            Self::Literal(literal) => literal.into_inner(),
            Self::Quoted(quoted) => match quoted.into_inner() {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            },
        }
    }
}

impl<'a> TryFrom<&'a [u8]> for IString<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        if let Ok(quoted) = Quoted::try_from(value) {
            return Ok(IString::Quoted(quoted));
        }

        Ok(IString::Literal(Literal::try_from(value)?))
    }
}

impl<'a> TryFrom<&'a str> for IString<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if let Ok(quoted) = Quoted::try_from(value) {
            return Ok(IString::Quoted(quoted));
        }

        Ok(IString::Literal(Literal::try_from(value.as_bytes())?))
    }
}

impl<'a> TryFrom<String> for IString<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        // TODO(efficiency)
        if let Ok(quoted) = Quoted::try_from(value.clone()) {
            return Ok(IString::Quoted(quoted));
        }

        Ok(IString::Literal(Literal::try_from(value.into_bytes())?))
    }
}

impl<'a> From<Literal<'a>> for IString<'a> {
    fn from(value: Literal<'a>) -> Self {
        Self::Literal(value)
    }
}

impl<'a> From<Quoted<'a>> for IString<'a> {
    fn from(value: Quoted<'a>) -> Self {
        Self::Quoted(value)
    }
}

impl<'a> AsRef<[u8]> for IString<'a> {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Literal(literal) => literal.as_ref(),
            Self::Quoted(quoted) => quoted.as_ref().as_bytes(),
        }
    }
}

// ----- Literal -----

/// A literal.
///
/// "A literal is a sequence of zero or more octets (including CR and LF),
/// prefix-quoted with an octet count in the form of an open brace ("{"),
/// the number of octets, close brace ("}"), and CRLF." ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
///
/// Note: A literal must not contain NUL. Use
/// [`Literal8`](crate::extensions::binary::Literal8) for payloads that may.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Literal<'a> {
    pub(crate) data: Cow<'a, [u8]>,
    /// Specifies whether this is a synchronizing or non-synchronizing literal.
    ///
    /// `{3}\r\nfoo` is synchronizing, `{3+}\r\nfoo` (RFC 7888) is not.
    ///
    /// Note: In the special case that a server advertised a `LITERAL-`
    /// capability, AND the literal has more than 4096 bytes, a
    /// non-synchronizing literal must still be treated as synchronizing.
    pub(crate) mode: LiteralMode,
}

impl<'a> Literal<'a> {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if let Some(position) = value.iter().position(|b| !is_char8(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::ByteNotAllowed {
                found: value[position],
                position,
            }));
        };

        Ok(())
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn mode(&self) -> LiteralMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LiteralMode) {
        self.mode = mode;
    }

    /// Turn into a non-synchronizing literal (`{<n>+}`).
    pub fn into_non_sync(mut self) -> Self {
        self.mode = LiteralMode::NonSync;
        self
    }

    pub fn into_inner(self) -> Cow<'a, [u8]> {
        self.data
    }

    /// Construct without validation.
    ///
    /// The value is still checked in debug builds.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated<D>(data: D) -> Self
    where
        D: Into<Cow<'a, [u8]>>,
    {
        let data = data.into();

        #[cfg(debug_assertions)]
        Self::verify(&data).unwrap();

        Self {
            data,
            mode: LiteralMode::Sync,
        }
    }
}

impl<'a> TryFrom<&'a [u8]> for Literal<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Literal {
            data: Cow::Borrowed(value),
            mode: LiteralMode::Sync,
        })
    }
}

impl<'a> TryFrom<Vec<u8>> for Literal<'a> {
    type Error = ValidationError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Literal {
            data: Cow::Owned(value),
            mode: LiteralMode::Sync,
        })
    }
}

impl<'a> TryFrom<&'a str> for Literal<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::try_from(value.as_bytes())
    }
}

impl<'a> AsRef<[u8]> for Literal<'a> {
    fn as_ref(&self) -> &[u8] {
        self.data.as_ref()
    }
}

/// Literal mode, i.e., sync or non-sync (RFC 7888).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LiteralMode {
    /// A synchronizing literal, i.e., `{<n>}\r\n<data>`.
    Sync,
    /// A non-synchronizing literal according to RFC 7888, i.e., `{<n>+}\r\n<data>`.
    NonSync,
}

// ----- Quoted -----

/// A quoted string.
///
/// "The quoted string form is an alternative that avoids the overhead of
/// processing a literal at the cost of limitations of characters which may
/// be used." ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
///
/// The inner value is unescaped; escaping is (un)done during (de)serialization.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Quoted<'a>(pub(crate) Cow<'a, str>);

impl<'a> Quoted<'a> {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if let Some(position) = value.iter().position(|b| !is_text_char(*b)) {
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

    pub fn into_inner(self) -> Cow<'a, str> {
        self.0
    }
}

impl_unvalidated_str!(Quoted);

impl<'a> TryFrom<&'a [u8]> for Quoted<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        Quoted::verify(value)?;

        // Safety: `unwrap` can't panic due to `verify`.
        Ok(Quoted(Cow::Borrowed(from_utf8(value).unwrap())))
    }
}

impl<'a> TryFrom<&'a str> for Quoted<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Quoted::verify(value)?;

        Ok(Quoted(Cow::Borrowed(value)))
    }
}

impl<'a> TryFrom<String> for Quoted<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Quoted::verify(&value)?;

        Ok(Quoted(Cow::Owned(value)))
    }
}

impl<'a> AsRef<str> for Quoted<'a> {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

// ----- NString -----

/// Either NIL or a string.
///
/// This is modeled using Rust's `Option` type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NString<'a>(pub Option<IString<'a>>);

impl<'a> NString<'a> {
    pub fn into_option(self) -> Option<Cow<'a, [u8]>> {
        self.0.map(|inner| inner.into_inner())
    }
}

impl_try_from!(IString<'a>, 'a, &'a [u8], NString<'a>);
impl_try_from!(IString<'a>, 'a, &'a str, NString<'a>);
impl_try_from!(IString<'a>, 'a, String, NString<'a>);

impl<'a> From<IString<'a>> for NString<'a> {
    fn from(value: IString<'a>) -> Self {
        Self(Some(value))
    }
}

impl<'a> From<Literal<'a>> for NString<'a> {
    fn from(value: Literal<'a>) -> Self {
        Self(Some(value.into()))
    }
}

impl<'a> From<Quoted<'a>> for NString<'a> {
    fn from(value: Quoted<'a>) -> Self {
        Self(Some(value.into()))
    }
}

// ----- AString -----

/// Either an (extended) atom or a string.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AString<'a> {
    // `1*ATOM-CHAR` does not allow resp-specials, but `1*ASTRING-CHAR` does ... :-/
    Atom(AtomExt<'a>),   // 1*ASTRING-CHAR /
    String(IString<'a>), // string
}

impl<'a> TryFrom<&'a [u8]> for AString<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        if let Ok(atom) = AtomExt::try_from(value) {
            return Ok(AString::Atom(atom));
        }

        Ok(AString::String(IString::try_from(value)?))
    }
}

impl<'a> TryFrom<&'a str> for AString<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if let Ok(atom) = AtomExt::try_from(value) {
            return Ok(AString::Atom(atom));
        }

        Ok(AString::String(IString::try_from(value)?))
    }
}

impl<'a> TryFrom<String> for AString<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if AtomExt::verify(&value).is_ok() {
            // Safety: just verified.
            return Ok(AString::Atom(AtomExt(Cow::Owned(value))));
        }

        Ok(AString::String(IString::try_from(value)?))
    }
}

impl<'a> From<Atom<'a>> for AString<'a> {
    fn from(atom: Atom<'a>) -> Self {
        AString::Atom(AtomExt::from(atom))
    }
}

impl<'a> From<AtomExt<'a>> for AString<'a> {
    fn from(atom: AtomExt<'a>) -> Self {
        AString::Atom(atom)
    }
}

impl<'a> From<IString<'a>> for AString<'a> {
    fn from(string: IString<'a>) -> Self {
        AString::String(string)
    }
}

impl<'a> From<Literal<'a>> for AString<'a> {
    fn from(value: Literal<'a>) -> Self {
        AString::String(value.into())
    }
}

impl<'a> From<Quoted<'a>> for AString<'a> {
    fn from(value: Quoted<'a>) -> Self {
        AString::String(value.into())
    }
}

impl<'a> AsRef<[u8]> for AString<'a> {
    fn as_ref(&self) -> &[u8] {
        match self {
            AString::Atom(atom_ext) => atom_ext.as_ref().as_bytes(),
            AString::String(istring) => istring.as_ref(),
        }
    }
}

// ----- Tag -----

/// A command tag.
///
/// `tag = 1*<any ASTRING-CHAR except "+">`, at most 255 bytes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tag<'a>(pub(crate) Cow<'a, str>);

impl<'a> Tag<'a> {
    /// The longest allowed tag, in bytes.
    pub const MAX_LENGTH: usize = 255;

    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(ValidationError::new(ValidationErrorKind::OutOfRange));
        }

        if let Some(position) = value.iter().position(|b| !is_tag_char(*b)) {
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

    pub fn into_inner(self) -> Cow<'a, str> {
        self.0
    }
}

impl_unvalidated_str!(Tag);

impl<'a> TryFrom<&'a [u8]> for Tag<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        // Safety: `unwrap` can't panic due to `verify`.
        Ok(Self(Cow::Borrowed(from_utf8(value).unwrap())))
    }
}

impl<'a> TryFrom<&'a str> for Tag<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(Cow::Borrowed(value)))
    }
}

impl<'a> TryFrom<String> for Tag<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(Cow::Owned(value)))
    }
}

impl<'a> AsRef<str> for Tag<'a> {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

// ----- Text -----

/// Human-readable text.
///
/// `text = 1*TEXT-CHAR`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Text<'a>(pub(crate) Cow<'a, str>);

impl<'a> Text<'a> {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(position) = value.iter().position(|b| !is_text_char(*b)) {
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

    pub fn into_inner(self) -> Cow<'a, str> {
        self.0
    }
}

impl_unvalidated_str!(Text);

impl<'a> TryFrom<&'a [u8]> for Text<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        // Safety: `unwrap` can't panic due to `verify`.
        Ok(Self(Cow::Borrowed(from_utf8(value).unwrap())))
    }
}

impl<'a> TryFrom<&'a str> for Text<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(Cow::Borrowed(value)))
    }
}

impl<'a> TryFrom<String> for Text<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(Cow::Owned(value)))
    }
}

impl<'a> AsRef<str> for Text<'a> {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

// ----- QuotedChar -----

/// A single quoted character, e.g., the mailbox hierarchy delimiter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct QuotedChar(char);

impl QuotedChar {
    pub fn verify(input: char) -> Result<(), ValidationError> {
        if input.is_ascii()
            && (is_any_text_char_except_quoted_specials(input as u8)
                || is_quoted_specials(input as u8))
        {
            Ok(())
        } else {
            Err(ValidationError::new(ValidationErrorKind::Invalid))
        }
    }

    pub fn inner(&self) -> char {
        self.0
    }

    /// Construct without validation.
    ///
    /// The value is still checked in debug builds.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated(inner: char) -> Self {
        #[cfg(debug_assertions)]
        Self::verify(inner).unwrap();

        Self(inner)
    }
}

impl TryFrom<char> for QuotedChar {
    type Error = ValidationError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(QuotedChar(value))
    }
}

// ----- Charset -----

/// A charset.
///
/// `charset = atom / quoted` (see errata id: 261)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Charset<'a> {
    Atom(Atom<'a>),
    Quoted(Quoted<'a>),
}

impl<'a> TryFrom<&'a str> for Charset<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if let Ok(atom) = Atom::try_from(value) {
            return Ok(Charset::Atom(atom));
        }

        Ok(Charset::Quoted(Quoted::try_from(value)?))
    }
}

impl<'a> TryFrom<String> for Charset<'a> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Atom::verify(&value).is_ok() {
            // Safety: just verified.
            return Ok(Charset::Atom(Atom(Cow::Owned(value))));
        }

        Ok(Charset::Quoted(Quoted::try_from(value)?))
    }
}

impl<'a> From<Atom<'a>> for Charset<'a> {
    fn from(value: Atom<'a>) -> Self {
        Self::Atom(value)
    }
}

impl<'a> From<Quoted<'a>> for Charset<'a> {
    fn from(value: Quoted<'a>) -> Self {
        Self::Quoted(value)
    }
}

impl<'a> AsRef<str> for Charset<'a> {
    fn as_ref(&self) -> &str {
        match self {
            Self::Atom(atom) => atom.as_ref(),
            Self::Quoted(quoted) => quoted.as_ref(),
        }
    }
}

// ----- Vec1 -----

/// A non-empty vector.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Vec1<T>(Vec<T>);

impl<T> Vec1<T> {
    /// Construct without validation.
    ///
    /// The value is still checked in debug builds.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated(inner: Vec<T>) -> Self {
        #[cfg(debug_assertions)]
        assert!(!inner.is_empty());

        Self(inner)
    }

    pub fn as_ref(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        // A `Vec1` is never empty.
        false
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> From<T> for Vec1<T> {
    fn from(value: T) -> Self {
        Self(vec![value])
    }
}

impl<T> TryFrom<Vec<T>> for Vec1<T> {
    type Error = ValidationError;

    fn try_from(inner: Vec<T>) -> Result<Self, Self::Error> {
        if inner.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        Ok(Self(inner))
    }
}

impl<T> IntoIterator for Vec1<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vec1<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_failing_atom() {
        for value in ["", " ", "a b", "(a)", "*", "a{", "\"a\"", "a]"] {
            assert!(Atom::try_from(value).is_err(), "{value:?} must not parse");
        }
    }

    #[test]
    fn test_conversion_atom() {
        for value in ["a", "aaa", "a1", "$Forwarded", "\\"] {
            // `\` is quoted-specials, not atom-char.
            if value == "\\" {
                assert!(Atom::try_from(value).is_err());
                continue;
            }

            let got = Atom::try_from(value).unwrap();
            assert_eq!(got.inner(), value);
        }
    }

    #[test]
    fn test_conversion_astring_prefers_atom() {
        assert!(matches!(
            AString::try_from("xxx").unwrap(),
            AString::Atom(_)
        ));
        assert!(matches!(
            AString::try_from("x x").unwrap(),
            AString::String(IString::Quoted(_))
        ));
        assert!(matches!(
            AString::try_from("x\rx").unwrap(),
            AString::String(IString::Literal(_))
        ));
    }

    #[test]
    fn test_conversion_literal_rejects_nul() {
        assert!(Literal::try_from(b"a\x00b".as_ref()).is_err());
        assert!(Literal::try_from(b"a\r\nb".as_ref()).is_ok());
        assert!(Literal::try_from(b"".as_ref()).is_ok());
    }

    #[test]
    fn test_tag_rejects_plus() {
        assert!(Tag::try_from("A1").is_ok());
        assert!(Tag::try_from("A+1").is_err());
        assert!(Tag::try_from("").is_err());
    }

    #[test]
    fn test_vec1() {
        assert!(Vec1::<u8>::try_from(vec![]).is_err());

        let vec = Vec1::<i32>::try_from(vec![1, 2]).unwrap();
        assert_eq!(vec.as_ref(), &[1, 2]);
        assert_eq!(vec.len(), 2);
    }
}
