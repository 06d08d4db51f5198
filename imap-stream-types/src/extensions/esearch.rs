//! The extended SEARCH command and ESEARCH response
//! (RFC 4731, RFC 5182, RFC 7377).

use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{Tag, Vec1},
    extensions::condstore_qresync::ModSeq,
    mailbox::Mailbox,
    sequence::SequenceSet,
};

/// A `RETURN` option of an extended SEARCH.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SearchReturnOption {
    /// The lowest matching sequence number or UID (`MIN`).
    Min,
    /// The highest matching sequence number or UID (`MAX`).
    Max,
    /// All matches (`ALL`).
    All,
    /// The number of matches (`COUNT`).
    Count,
    /// Save the result on the server for later `$` references (`SAVE`, RFC 5182).
    Save,
}

/// A source mailbox selector of a multimailbox ESEARCH (`IN (...)`, RFC 7377).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SearchSource<'a> {
    /// The currently selected mailbox (`selected`).
    Selected,
    /// The selected mailbox, snapshotting at command start (`selected-delayed`).
    SelectedDelayed,
    /// All inboxes the user can access (`inboxes`).
    Inboxes,
    /// The user's personal namespace (`personal`).
    Personal,
    /// All subscribed mailboxes (`subscribed`).
    Subscribed,
    /// A mailbox and all its descendants (`subtree <mailbox>`).
    Subtree(Vec1<Mailbox<'a>>),
    /// An explicit list of mailboxes (`mailboxes <mailbox> ...`).
    Mailboxes(Vec1<Mailbox<'a>>),
}

/// A data item of an untagged ESEARCH response (`search-return-data`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SearchReturnData {
    Min(NonZeroU32),
    Max(NonZeroU32),
    All(SequenceSet),
    Count(u32),
    /// The highest mod-sequence of the returned messages (RFC 7162).
    ModSeq(ModSeq),
}

/// The correlator and UID marker of an untagged ESEARCH response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ESearchResponse<'a> {
    /// The tag of the command this response belongs to (`(TAG "...")`).
    pub correlator: Option<Tag<'a>>,
    /// Whether the returned numbers are UIDs.
    pub uid: bool,
    pub data: Vec<SearchReturnData>,
}
