//! SEARCH-related types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{AString, Atom, Vec1},
    datetime::NaiveDate,
    extensions::condstore_qresync::{AttributeFlag, EntryTypeReq, ModSeq},
    sequence::SequenceSet,
};

/// A search criterion.
///
/// The RFC 3501 keys plus the CONDSTORE `MODSEQ` criterion (RFC 7162).
/// `And` corresponds to the parenthesized key list of the grammar.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SearchKey<'a> {
    /// All messages in the mailbox (`ALL`).
    All,

    /// Messages with the \Answered flag set (`ANSWERED`).
    Answered,

    /// Messages that contain the specified string in the envelope
    /// structure's BCC field (`BCC <string>`).
    Bcc(AString<'a>),

    /// Messages whose internal date is earlier than the specified date
    /// (`BEFORE <date>`).
    Before(NaiveDate),

    /// Messages that contain the specified string in the body of the
    /// message (`BODY <string>`).
    Body(AString<'a>),

    /// Messages that contain the specified string in the envelope
    /// structure's CC field (`CC <string>`).
    Cc(AString<'a>),

    /// Messages with the \Deleted flag set (`DELETED`).
    Deleted,

    /// Messages with the \Draft flag set (`DRAFT`).
    Draft,

    /// Messages with the \Flagged flag set (`FLAGGED`).
    Flagged,

    /// Messages that contain the specified string in the envelope
    /// structure's FROM field (`FROM <string>`).
    From(AString<'a>),

    /// Messages that have a header with the specified field-name and that
    /// contain the specified string in the text of the header (`HEADER
    /// <field-name> <string>`).
    Header(AString<'a>, AString<'a>),

    /// Messages with the specified keyword flag set (`KEYWORD <flag>`).
    Keyword(Atom<'a>),

    /// Messages with a size larger than the specified number of octets
    /// (`LARGER <n>`).
    Larger(u32),

    /// Messages whose mod-sequence is equal to or greater than the given
    /// value (`MODSEQ [<entry-name> <entry-type-req>] <n>`, RFC 7162).
    ModSeq {
        entry: Option<(AttributeFlag<'a>, EntryTypeReq)>,
        mod_seq: ModSeq,
    },

    /// Messages that have the \Recent flag set but not the \Seen flag
    /// (`NEW`).
    New,

    /// Messages that do not match the specified search key (`NOT <search-key>`).
    Not(Box<SearchKey<'a>>),

    /// Messages that do not have the \Recent flag set (`OLD`).
    Old,

    /// Messages whose internal date is within the specified date (`ON <date>`).
    On(NaiveDate),

    /// Messages that match either search key (`OR <search-key1> <search-key2>`).
    Or(Box<SearchKey<'a>>, Box<SearchKey<'a>>),

    /// Messages that have the \Recent flag set (`RECENT`).
    Recent,

    /// Messages that have the \Seen flag set (`SEEN`).
    Seen,

    /// Messages whose Date: header is earlier than the specified date
    /// (`SENTBEFORE <date>`).
    SentBefore(NaiveDate),

    /// Messages whose Date: header is within the specified date (`SENTON <date>`).
    SentOn(NaiveDate),

    /// Messages whose Date: header is within or later than the specified
    /// date (`SENTSINCE <date>`).
    SentSince(NaiveDate),

    /// Messages whose internal date is within or later than the specified
    /// date (`SINCE <date>`).
    Since(NaiveDate),

    /// Messages with a size smaller than the specified number of octets
    /// (`SMALLER <n>`).
    Smaller(u32),

    /// Messages that contain the specified string in the envelope
    /// structure's SUBJECT field (`SUBJECT <string>`).
    Subject(AString<'a>),

    /// Messages that contain the specified string in the header or body of
    /// the message (`TEXT <string>`).
    Text(AString<'a>),

    /// Messages that contain the specified string in the envelope
    /// structure's TO field (`TO <string>`).
    To(AString<'a>),

    /// Messages with unique identifiers corresponding to the specified
    /// unique identifier set (`UID <sequence set>`).
    Uid(SequenceSet),

    /// Messages that do not have the \Answered flag set (`UNANSWERED`).
    Unanswered,

    /// Messages that do not have the \Deleted flag set (`UNDELETED`).
    Undeleted,

    /// Messages that do not have the \Draft flag set (`UNDRAFT`).
    Undraft,

    /// Messages that do not have the \Flagged flag set (`UNFLAGGED`).
    Unflagged,

    /// Messages that do not have the specified keyword flag set
    /// (`UNKEYWORD <flag>`).
    Unkeyword(Atom<'a>),

    /// Messages that do not have the \Seen flag set (`UNSEEN`).
    Unseen,

    /// Messages with message sequence numbers corresponding to the
    /// specified message sequence number set.
    SequenceSet(SequenceSet),

    /// A parenthesized list of search keys (implicit AND).
    And(Vec1<SearchKey<'a>>),
}
