//! FETCH-related types.

use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    body::BodyStructure,
    core::{AString, NString, Vec1},
    datetime::DateTime,
    envelope::Envelope,
    extensions::{binary::NString8, condstore_qresync::ModSeq},
    flag::FlagFetch,
};

/// A shorthand for a set of commonly used data items.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Macro {
    /// `ALL` is equivalent to `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE)`.
    All,
    /// `FAST` is equivalent to `(FLAGS INTERNALDATE RFC822.SIZE)`.
    Fast,
    /// `FULL` is equivalent to `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE BODY)`.
    Full,
}

impl Macro {
    pub fn expand(&self) -> Vec<MessageDataItemName<'static>> {
        use MessageDataItemName::*;

        match self {
            Self::All => vec![Flags, InternalDate, Rfc822Size, Envelope],
            Self::Fast => vec![Flags, InternalDate, Rfc822Size],
            Self::Full => vec![Flags, InternalDate, Rfc822Size, Envelope, Body],
        }
    }
}

/// Either a macro or a list of data item names.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MacroOrMessageDataItemNames<'a> {
    Macro(Macro),
    MessageDataItemNames(Vec<MessageDataItemName<'a>>),
}

impl<'a> From<Macro> for MacroOrMessageDataItemNames<'a> {
    fn from(m: Macro) -> Self {
        Self::Macro(m)
    }
}

impl<'a> From<Vec<MessageDataItemName<'a>>> for MacroOrMessageDataItemNames<'a> {
    fn from(item_names: Vec<MessageDataItemName<'a>>) -> Self {
        Self::MessageDataItemNames(item_names)
    }
}

/// A message data item name used to request a message data item.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MessageDataItemName<'a> {
    /// Non-extensible form of `BODYSTRUCTURE` (`BODY`).
    Body,

    /// The text of a particular body section (`BODY[<section>]<<partial>>`).
    BodyExt {
        section: Option<Section<'a>>,
        partial: Option<(u32, NonZeroU32)>,
        /// Like `BODY[...]` but does not implicitly set the \Seen flag.
        peek: bool,
    },

    /// The MIME body structure of the message (`BODYSTRUCTURE`).
    BodyStructure,

    /// The envelope structure of the message (`ENVELOPE`).
    Envelope,

    /// The flags that are set for the message (`FLAGS`).
    Flags,

    /// The internal date of the message (`INTERNALDATE`).
    InternalDate,

    /// Functionally equivalent to `BODY[]` (`RFC822`).
    Rfc822,

    /// Functionally equivalent to `BODY.PEEK[HEADER]` (`RFC822.HEADER`).
    Rfc822Header,

    /// The RFC 2822 size of the message (`RFC822.SIZE`).
    Rfc822Size,

    /// Functionally equivalent to `BODY[TEXT]` (`RFC822.TEXT`).
    Rfc822Text,

    /// The unique identifier for the message (`UID`).
    Uid,

    /// Binary content of a section (`BINARY[<part>]<<partial>>`, RFC 3516).
    Binary {
        section: Option<Part>,
        partial: Option<(u32, NonZeroU32)>,
        peek: bool,
    },

    /// Decoded size of a section (`BINARY.SIZE[<part>]`, RFC 3516).
    BinarySize { section: Option<Part> },

    /// The mod-sequence of the message (`MODSEQ`, RFC 7162).
    ModSeq,
}

/// A message data item returned in an untagged FETCH response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MessageDataItem<'a> {
    /// A form of `BODYSTRUCTURE` without extension data (`BODY`).
    Body(BodyStructure<'a>),

    /// The body contents of the specified section (`BODY[<section>]<<origin octet>>`).
    ///
    /// 8-bit textual data is permitted if a charset identifier is part of
    /// the body parameter parenthesized list for this section.
    BodyExt {
        section: Option<Section<'a>>,
        origin: Option<u32>,
        data: NString<'a>,
    },

    /// The MIME body structure of the message (`BODYSTRUCTURE`).
    BodyStructure(BodyStructure<'a>),

    /// The envelope structure of the message (`ENVELOPE`).
    Envelope(Envelope<'a>),

    /// A list of flags that are set for this message (`FLAGS`).
    Flags(Vec<FlagFetch<'a>>),

    /// A string representing the internal date of the message (`INTERNALDATE`).
    InternalDate(DateTime),

    /// Equivalent to `BODY[]` (`RFC822`).
    Rfc822(NString<'a>),

    /// Equivalent to `BODY[HEADER]` (`RFC822.HEADER`).
    Rfc822Header(NString<'a>),

    /// A number expressing the RFC 2822 size of the message (`RFC822.SIZE`).
    Rfc822Size(u32),

    /// Equivalent to `BODY[TEXT]` (`RFC822.TEXT`).
    Rfc822Text(NString<'a>),

    /// A number expressing the unique identifier of the message (`UID`).
    Uid(NonZeroU32),

    /// Binary section contents (`BINARY[<part>]`, RFC 3516).
    Binary {
        section: Option<Part>,
        value: NString8<'a>,
    },

    /// Decoded size of a section (`BINARY.SIZE[<part>]`, RFC 3516).
    BinarySize { section: Option<Part>, size: u32 },

    /// The mod-sequence of the message (`MODSEQ (<n>)`, RFC 7162).
    ModSeq(ModSeq),
}

/// A part number, i.e., a dotted list of non-zero numbers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Part(pub Vec1<NonZeroU32>);

/// A part specifier, i.e., a part number, header/text selector, or both.
///
/// Used by the parser while assembling a [`Section`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PartSpecifier<'a> {
    PartNumber(u32),
    Header,
    HeaderFields(Vec1<AString<'a>>),
    HeaderFieldsNot(Vec1<AString<'a>>),
    Mime,
    Text,
}

/// The section specifier inside `BODY[...]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Section<'a> {
    /// A whole sub-part, e.g., `4.1`.
    Part(Part),

    /// The message header, e.g., `HEADER` or `4.2.HEADER`.
    Header(Option<Part>),

    /// A subset of the header fields, e.g., `HEADER.FIELDS (DATE FROM)`.
    HeaderFields(Option<Part>, Vec1<AString<'a>>),

    /// The header without the given fields, e.g., `HEADER.FIELDS.NOT (SUBJECT)`.
    HeaderFieldsNot(Option<Part>, Vec1<AString<'a>>),

    /// The text body without the header, e.g., `TEXT` or `4.1.TEXT`.
    Text(Option<Part>),

    /// The MIME header of a part, e.g., `4.2.MIME`.
    Mime(Part),
}
