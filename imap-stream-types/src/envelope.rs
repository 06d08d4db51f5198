//! Message envelope.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::NString;

/// The envelope structure of a message.
///
/// Ten positional fields; the six address fields are (possibly empty)
/// address lists, everything else is NIL or a string.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Envelope<'a> {
    pub date: NString<'a>,
    pub subject: NString<'a>,
    pub from: Vec<Address<'a>>,
    pub sender: Vec<Address<'a>>,
    pub reply_to: Vec<Address<'a>>,
    pub to: Vec<Address<'a>>,
    pub cc: Vec<Address<'a>>,
    pub bcc: Vec<Address<'a>>,
    pub in_reply_to: NString<'a>,
    pub message_id: NString<'a>,
}

/// An address structure, i.e., the 4-tuple `(name adl mailbox host)`.
///
/// "A parenthesized list that describes an electronic mail address."
/// ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Address<'a> {
    /// Personal name.
    pub name: NString<'a>,
    /// At-domain-list (source route).
    pub adl: NString<'a>,
    /// Mailbox name.
    pub mailbox: NString<'a>,
    /// Host name.
    pub host: NString<'a>,
}
