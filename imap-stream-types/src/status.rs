//! STATUS-related types.

use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::extensions::condstore_qresync::ModSeq;

/// The name of a STATUS data item.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatusDataItemName {
    /// The number of messages in the mailbox (`MESSAGES`).
    Messages,
    /// The number of messages with the \Recent flag set (`RECENT`).
    Recent,
    /// The next unique identifier value of the mailbox (`UIDNEXT`).
    UidNext,
    /// The unique identifier validity value of the mailbox (`UIDVALIDITY`).
    UidValidity,
    /// The number of messages which do not have the \Seen flag set (`UNSEEN`).
    Unseen,
    /// The total size of the mailbox in octets (`SIZE`, STATUS=SIZE).
    Size,
    /// The highest mod-sequence of all messages (`HIGHESTMODSEQ`, RFC 7162).
    HighestModSeq,
}

/// A STATUS data item.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatusDataItem {
    Messages(u32),
    Recent(u32),
    UidNext(NonZeroU32),
    UidValidity(NonZeroU32),
    Unseen(u32),
    Size(u64),
    HighestModSeq(ModSeq),
}
