//! The IMAP METADATA extension (RFC 5464).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{AString, Vec1},
    extensions::binary::NString8,
};

/// An entry name, e.g., `/shared/comment`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Entry<'a>(pub AString<'a>);

impl<'a> From<AString<'a>> for Entry<'a> {
    fn from(value: AString<'a>) -> Self {
        Self(value)
    }
}

/// An entry/value pair of SETMETADATA or a METADATA response.
///
/// The value is an nstring8: NIL removes the entry, a binary literal is
/// allowed for values containing NUL.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EntryValue<'a> {
    pub entry: Entry<'a>,
    pub value: NString8<'a>,
}

/// A command option of GETMETADATA.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GetMetadataOption {
    /// Only return values no longer than this (`MAXSIZE <n>`).
    MaxSize(u32),
    /// How deep below the given entries to descend (`DEPTH <0/1/infinity>`).
    Depth(MetadataDepth),
}

/// The `DEPTH` of a GETMETADATA.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MetadataDepth {
    /// No entries below the specified entry are returned (`0`).
    #[default]
    Null,
    /// Only entries immediately below the specified entry are returned (`1`).
    One,
    /// All entries below the specified entry are returned (`infinity`).
    Infinity,
}

/// The payload of an untagged METADATA response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MetadataResponse<'a> {
    /// A solicited response with entry/value pairs.
    WithValues(Vec1<EntryValue<'a>>),
    /// An unsolicited response listing changed entries.
    WithoutValues(Vec1<Entry<'a>>),
}

/// The argument of a `METADATA` response code.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MetadataCode {
    /// Some entries were longer than the requested MAXSIZE (`LONGENTRIES <n>`).
    LongEntries(u32),
    /// The server rejected a value longer than this (`MAXSIZE <n>`).
    MaxSize(u32),
    /// Too many entries were requested or set (`TOOMANY`).
    TooMany,
    /// The server does not support private annotations (`NOPRIVATE`).
    NoPrivate,
}
