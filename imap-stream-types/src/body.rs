//! Body structure of a message.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{IString, NString, Vec1},
    envelope::Envelope,
};

/// The (recursive) body structure of a message.
///
/// A multipart's children are non-empty by construction; nesting depth is
/// bounded by the parser, not by this type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum BodyStructure<'a> {
    /// A single part.
    Single {
        body: Body<'a>,
        /// Extension data (BODYSTRUCTURE only).
        extension_data: Option<SinglePartExtensionData<'a>>,
    },

    /// A multipart.
    Multi {
        bodies: Vec1<BodyStructure<'a>>,
        subtype: IString<'a>,
        /// Extension data (BODYSTRUCTURE only).
        extension_data: Option<MultiPartExtensionData<'a>>,
    },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Body<'a> {
    /// Basic fields common to all single parts.
    pub basic: BasicFields<'a>,
    /// Type-specific fields.
    pub specific: SpecificFields<'a>,
}

/// The basic fields of a non-multipart body part.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BasicFields<'a> {
    /// List of attribute/value pairs (`body-fld-param`).
    pub parameter_list: Vec<(IString<'a>, IString<'a>)>,

    /// Content id (`body-fld-id`).
    pub id: NString<'a>,

    /// Content description (`body-fld-desc`).
    pub description: NString<'a>,

    /// Content transfer encoding (`body-fld-enc`).
    pub content_transfer_encoding: IString<'a>,

    /// Size of the body in octets (`body-fld-octets`).
    ///
    /// Note: This size is the size in its transfer encoding.
    pub size: u32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SpecificFields<'a> {
    /// A body of type other than TEXT or MESSAGE/RFC822.
    Basic {
        /// Media type (`media-basic`).
        r#type: IString<'a>,
        /// Media subtype.
        subtype: IString<'a>,
    },

    /// A body of type MESSAGE/RFC822 contains, immediately after the basic
    /// fields, the envelope structure, body structure, and size in text
    /// lines of the encapsulated message.
    Message {
        envelope: Box<Envelope<'a>>,
        body_structure: Box<BodyStructure<'a>>,
        number_of_lines: u32,
    },

    /// A body of type TEXT contains, immediately after the basic fields,
    /// the size of the body in text lines.
    Text {
        subtype: IString<'a>,
        number_of_lines: u32,
    },
}

/// The extension data of a non-multipart body part.
///
/// Extension fields are positional and may only be present when everything
/// to their left is; the nested `tail` options model that.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SinglePartExtensionData<'a> {
    /// Body MD5 (`body-fld-md5`).
    pub md5: NString<'a>,
    pub tail: Option<Disposition<'a>>,
}

/// The extension data of a multipart body part.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MultiPartExtensionData<'a> {
    /// List of attribute/value pairs (`body-fld-param`).
    pub parameter_list: Vec<(IString<'a>, IString<'a>)>,
    pub tail: Option<Disposition<'a>>,
}

/// Content disposition (`body-fld-dsp`) plus what may follow it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Disposition<'a> {
    pub disposition: Option<(IString<'a>, Vec<(IString<'a>, IString<'a>)>)>,
    pub tail: Option<Language<'a>>,
}

/// Body language (`body-fld-lang`) plus what may follow it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Language<'a> {
    pub language: Vec<IString<'a>>,
    pub tail: Option<Location<'a>>,
}

/// Body location (`body-fld-loc`) plus trailing extensions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Location<'a> {
    pub location: NString<'a>,
    /// Extension data reserved for future expansion.
    pub extensions: Vec<BodyExtension<'a>>,
}

/// A future expansion slot in the body structure.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum BodyExtension<'a> {
    NString(NString<'a>),
    Number(u32),
    List(Vec1<BodyExtension<'a>>),
}
