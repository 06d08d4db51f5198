//! The IMAP NAMESPACE extension (RFC 2342).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::{IString, QuotedChar, Vec1};

/// One namespace, i.e., a prefix and a hierarchy delimiter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NamespaceDescr<'a> {
    pub prefix: IString<'a>,
    pub delimiter: Option<QuotedChar>,
}

/// A (possibly absent) list of namespaces.
///
/// `NIL` on the wire when absent.
pub type Namespace<'a> = Option<Vec1<NamespaceDescr<'a>>>;
