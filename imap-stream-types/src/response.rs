//! Server responses.
//!
//! See <https://tools.ietf.org/html/rfc3501#section-7>.

use std::{borrow::Cow, fmt::{Display, Formatter}, num::NonZeroU32};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthMechanism,
    core::{AString, Atom, Charset, IString, NString, QuotedChar, Tag, Text, Vec1},
    error::ValidationError,
    extensions::{
        acl::{AclEntry, Rights},
        condstore_qresync::ModSeq,
        enable::CapabilityEnable,
        esearch::ESearchResponse,
        metadata::{MetadataCode, MetadataResponse},
        namespace::Namespace,
        quota::QuotaGet,
    },
    fetch::MessageDataItem,
    flag::{FlagFetch, FlagNameAttribute, FlagPerm},
    mailbox::Mailbox,
    sequence::SequenceSet,
    status::StatusDataItem,
};

/// The first response of a session.
///
/// "The untagged form is also used as one of three possible greetings at
/// connection startup." ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Greeting<'a> {
    pub kind: GreetingKind,
    pub code: Option<Code<'a>>,
    pub text: Text<'a>,
}

impl<'a> Greeting<'a> {
    pub fn new<T>(
        kind: GreetingKind,
        code: Option<Code<'a>>,
        text: T,
    ) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        Ok(Greeting {
            kind,
            code,
            text: text.try_into()?,
        })
    }

    pub fn ok<T>(code: Option<Code<'a>>, text: T) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        Self::new(GreetingKind::Ok, code, text)
    }
}

/// The kind of a greeting.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GreetingKind {
    /// The connection is not yet authenticated (`OK`).
    ///
    /// (Advice: A LOGIN command is needed.)
    Ok,
    /// The connection has already been authenticated by external means (`PREAUTH`).
    ///
    /// (Advice: No LOGIN command is needed.)
    PreAuth,
    /// The server is not willing to accept a connection from this client (`BYE`).
    ///
    /// (Advice: The server closes the connection immediately.)
    Bye,
}

/// A server response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Response<'a> {
    /// A status response.
    Status(Status<'a>),
    /// An untagged data response.
    Data(Data<'a>),
    /// A command continuation request.
    CommandContinuationRequest(CommandContinuationRequest<'a>),
}

/// A status response, i.e., OK, NO, BAD, or BYE.
///
/// BYE is not a completion result; it can be sent at any time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Status<'a> {
    /// An untagged status, e.g., `* OK ...`.
    Untagged(StatusBody<'a>),
    /// A tagged status finishing a command, e.g., `A1 OK ...`.
    Tagged(Tagged<'a>),
    /// A BYE, announcing that the connection is about to close.
    Bye(Bye<'a>),
}

impl<'a> Status<'a> {
    pub fn ok<T>(
        tag: Option<Tag<'a>>,
        code: Option<Code<'a>>,
        text: T,
    ) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        Self::new(tag, StatusKind::Ok, code, text)
    }

    pub fn no<T>(
        tag: Option<Tag<'a>>,
        code: Option<Code<'a>>,
        text: T,
    ) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        Self::new(tag, StatusKind::No, code, text)
    }

    pub fn bad<T>(
        tag: Option<Tag<'a>>,
        code: Option<Code<'a>>,
        text: T,
    ) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        Self::new(tag, StatusKind::Bad, code, text)
    }

    pub fn bye<T>(code: Option<Code<'a>>, text: T) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        Ok(Self::Bye(Bye {
            code,
            text: text.try_into()?,
        }))
    }

    fn new<T>(
        tag: Option<Tag<'a>>,
        kind: StatusKind,
        code: Option<Code<'a>>,
        text: T,
    ) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        let body = StatusBody {
            kind,
            code,
            text: text.try_into()?,
        };

        Ok(match tag {
            Some(tag) => Self::Tagged(Tagged { tag, body }),
            None => Self::Untagged(body),
        })
    }

    /// The completion result, if this is a completion.
    pub fn body(&self) -> Option<&StatusBody<'a>> {
        match self {
            Self::Untagged(body) => Some(body),
            Self::Tagged(tagged) => Some(&tagged.body),
            Self::Bye(_) => None,
        }
    }
}

/// The kind, code, and text of a status response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StatusBody<'a> {
    pub kind: StatusKind,
    pub code: Option<Code<'a>>,
    pub text: Text<'a>,
}

/// The kind of a status response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatusKind {
    /// Indicates an information message from the server (`OK`).
    Ok,
    /// Indicates an operational error message from the server (`NO`).
    No,
    /// Indicates a protocol-level error message from the server (`BAD`).
    Bad,
}

/// A tagged status response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tagged<'a> {
    pub tag: Tag<'a>,
    pub body: StatusBody<'a>,
}

/// A BYE response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Bye<'a> {
    pub code: Option<Code<'a>>,
    pub text: Text<'a>,
}

/// A response code.
///
/// "A response code consists of data inside square brackets in the form of
/// an atom, possibly followed by a space and arguments."
/// ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Code<'a> {
    /// `ALERT`
    Alert,

    /// `BADCHARSET [(...)]`
    BadCharset { allowed: Vec<Charset<'a>> },

    /// `CAPABILITY ...`
    Capability(Vec1<Capability<'a>>),

    /// `PARSE`
    Parse,

    /// `PERMANENTFLAGS (...)`
    PermanentFlags(Vec<FlagPerm<'a>>),

    /// `READ-ONLY`
    ReadOnly,

    /// `READ-WRITE`
    ReadWrite,

    /// `TRYCREATE`
    TryCreate,

    /// `UIDNEXT <n>`
    UidNext(NonZeroU32),

    /// `UIDVALIDITY <n>`
    UidValidity(NonZeroU32),

    /// `UNSEEN <n>`
    Unseen(NonZeroU32),

    /// `APPENDUID <uidvalidity> <uid(s)>` (RFC 4315)
    ///
    /// MULTIAPPEND responses carry one UID (or UID range) per appended
    /// message, hence a set.
    AppendUid {
        uid_validity: NonZeroU32,
        uid: SequenceSet,
    },

    /// `COPYUID <uidvalidity> <source uids> <destination uids>` (RFC 4315)
    CopyUid {
        uid_validity: NonZeroU32,
        source: SequenceSet,
        destination: SequenceSet,
    },

    /// `UIDNOTSTICKY` (RFC 4315)
    UidNotSticky,

    /// `HIGHESTMODSEQ <n>` (RFC 7162)
    HighestModSeq(ModSeq),

    /// `NOMODSEQ` (RFC 7162)
    NoModSeq,

    /// `MODIFIED <set>` (RFC 7162)
    Modified(SequenceSet),

    /// `CLOSED` (RFC 7162)
    Closed,

    /// `NOTSAVED` (RFC 5182)
    NotSaved,

    /// `METADATA ...` (RFC 5464)
    Metadata(MetadataCode),

    /// `UNKNOWN-CTE` (RFC 3516)
    UnknownCte,

    /// `TOOBIG` (RFC 4469)
    TooBig,

    /// `OVERQUOTA` (RFC 9208)
    OverQuota,

    /// An additional response code an endpoint wants to transmit.
    Other(CodeOther<'a>),
}

impl<'a> Code<'a> {
    pub fn capability(caps: Vec1<Capability<'a>>) -> Self {
        Self::Capability(caps)
    }
}

/// An unknown response code.
///
/// The raw bytes between the brackets, preserved verbatim.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CodeOther<'a>(pub(crate) Cow<'a, [u8]>);

impl<'a> CodeOther<'a> {
    pub fn inner(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Construct without validation.
    ///
    /// The bytes are emitted between `[` and `]`; they must not contain
    /// `]`, CR, or LF. The parser can't produce such a value.
    #[cfg(feature = "unvalidated")]
    #[cfg_attr(docsrs, doc(cfg(feature = "unvalidated")))]
    pub fn unvalidated<D>(data: D) -> Self
    where
        D: Into<Cow<'a, [u8]>>,
    {
        Self(data.into())
    }
}

/// A capability.
///
/// Names are matched case-insensitively; unknown capabilities keep their
/// wire bytes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Capability<'a> {
    /// `IMAP4rev1`
    Imap4Rev1,
    /// `AUTH=<mechanism>`
    Auth(AuthMechanism<'a>),
    /// `LITERAL+` (RFC 7888)
    LiteralPlus,
    /// `LITERAL-` (RFC 7888)
    LiteralMinus,
    /// `SASL-IR` (RFC 4959)
    SaslIr,
    /// `BINARY` (RFC 3516)
    Binary,
    /// `CONDSTORE` (RFC 7162)
    Condstore,
    /// `QRESYNC` (RFC 7162)
    Qresync,
    /// `ENABLE` (RFC 5161)
    Enable,
    /// `ESEARCH` (RFC 4731)
    ESearch,
    /// `SEARCHRES` (RFC 5182)
    SearchRes,
    /// `MULTIAPPEND` (RFC 3502)
    MultiAppend,
    /// `ID` (RFC 2971)
    Id,
    /// `IDLE` (RFC 2177)
    Idle,
    /// `MOVE` (RFC 6851)
    Move,
    /// `NAMESPACE` (RFC 2342)
    Namespace,
    /// `QUOTA` (RFC 2087)
    Quota,
    /// `ACL` (RFC 4314)
    Acl,
    /// `METADATA` (RFC 5464)
    Metadata,
    /// `METADATA-SERVER` (RFC 5464)
    MetadataServer,
    /// `UIDPLUS` (RFC 4315)
    UidPlus,
    /// `UNSELECT` (RFC 3691)
    Unselect,
    /// `URLAUTH` (RFC 4467)
    UrlAuth,
    /// `UTF8=ACCEPT` (RFC 6855)
    Utf8Accept,
    /// `STATUS=SIZE`
    StatusSize,
    /// `LIST-EXTENDED` (RFC 5258)
    ListExtended,
    /// `LIST-STATUS` (RFC 5819)
    ListStatus,
    /// `CHILDREN` (RFC 3348)
    Children,
    /// Some other capability.
    Other(CapabilityOther<'a>),
}

impl<'a> From<Atom<'a>> for Capability<'a> {
    fn from(atom: Atom<'a>) -> Self {
        let upper = atom.as_ref().to_ascii_uppercase();

        if upper.starts_with("AUTH=") && upper.len() > "AUTH=".len() {
            // Preserve the wire bytes of the mechanism name.
            let mechanism = Atom(match atom.0 {
                Cow::Borrowed(inner) => Cow::Borrowed(&inner["AUTH=".len()..]),
                Cow::Owned(ref inner) => Cow::Owned(inner["AUTH=".len()..].to_owned()),
            });

            return Self::Auth(AuthMechanism::from(mechanism));
        }

        match upper.as_ref() {
            "IMAP4REV1" => Self::Imap4Rev1,
            "LITERAL+" => Self::LiteralPlus,
            "LITERAL-" => Self::LiteralMinus,
            "SASL-IR" => Self::SaslIr,
            "BINARY" => Self::Binary,
            "CONDSTORE" => Self::Condstore,
            "QRESYNC" => Self::Qresync,
            "ENABLE" => Self::Enable,
            "ESEARCH" => Self::ESearch,
            "SEARCHRES" => Self::SearchRes,
            "MULTIAPPEND" => Self::MultiAppend,
            "ID" => Self::Id,
            "IDLE" => Self::Idle,
            "MOVE" => Self::Move,
            "NAMESPACE" => Self::Namespace,
            "QUOTA" => Self::Quota,
            "ACL" => Self::Acl,
            "METADATA" => Self::Metadata,
            "METADATA-SERVER" => Self::MetadataServer,
            "UIDPLUS" => Self::UidPlus,
            "UNSELECT" => Self::Unselect,
            "URLAUTH" => Self::UrlAuth,
            "UTF8=ACCEPT" => Self::Utf8Accept,
            "STATUS=SIZE" => Self::StatusSize,
            "LIST-EXTENDED" => Self::ListExtended,
            "LIST-STATUS" => Self::ListStatus,
            "CHILDREN" => Self::Children,
            _ => Self::Other(CapabilityOther(atom)),
        }
    }
}

impl<'a> TryFrom<&'a str> for Capability<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(Self::from(Atom::try_from(value)?))
    }
}

impl Display for Capability<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Imap4Rev1 => f.write_str("IMAP4rev1"),
            Self::Auth(mechanism) => write!(f, "AUTH={mechanism}"),
            Self::LiteralPlus => f.write_str("LITERAL+"),
            Self::LiteralMinus => f.write_str("LITERAL-"),
            Self::SaslIr => f.write_str("SASL-IR"),
            Self::Binary => f.write_str("BINARY"),
            Self::Condstore => f.write_str("CONDSTORE"),
            Self::Qresync => f.write_str("QRESYNC"),
            Self::Enable => f.write_str("ENABLE"),
            Self::ESearch => f.write_str("ESEARCH"),
            Self::SearchRes => f.write_str("SEARCHRES"),
            Self::MultiAppend => f.write_str("MULTIAPPEND"),
            Self::Id => f.write_str("ID"),
            Self::Idle => f.write_str("IDLE"),
            Self::Move => f.write_str("MOVE"),
            Self::Namespace => f.write_str("NAMESPACE"),
            Self::Quota => f.write_str("QUOTA"),
            Self::Acl => f.write_str("ACL"),
            Self::Metadata => f.write_str("METADATA"),
            Self::MetadataServer => f.write_str("METADATA-SERVER"),
            Self::UidPlus => f.write_str("UIDPLUS"),
            Self::Unselect => f.write_str("UNSELECT"),
            Self::UrlAuth => f.write_str("URLAUTH"),
            Self::Utf8Accept => f.write_str("UTF8=ACCEPT"),
            Self::StatusSize => f.write_str("STATUS=SIZE"),
            Self::ListExtended => f.write_str("LIST-EXTENDED"),
            Self::ListStatus => f.write_str("LIST-STATUS"),
            Self::Children => f.write_str("CHILDREN"),
            Self::Other(other) => f.write_str(other.0.inner()),
        }
    }
}

/// A capability not covered by [`Capability`]'s variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CapabilityOther<'a>(pub(crate) Atom<'a>);

/// An untagged data response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Data<'a> {
    /// `* CAPABILITY ...`
    Capability(Vec1<Capability<'a>>),

    /// `* LIST (...) "<delimiter>" <mailbox>`
    List {
        items: Vec<FlagNameAttribute<'a>>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox<'a>,
    },

    /// `* LSUB (...) "<delimiter>" <mailbox>`
    Lsub {
        items: Vec<FlagNameAttribute<'a>>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox<'a>,
    },

    /// `* STATUS <mailbox> (...)`
    Status {
        mailbox: Mailbox<'a>,
        items: Vec<StatusDataItem>,
    },

    /// `* SEARCH <n> ... [(MODSEQ <n>)]`
    Search {
        seqs: Vec<NonZeroU32>,
        /// The highest mod-sequence of the found messages (RFC 7162).
        mod_seq: Option<ModSeq>,
    },

    /// `* ESEARCH ...` (RFC 4731)
    ESearch(ESearchResponse<'a>),

    /// `* FLAGS (...)`
    Flags(Vec<FlagFetch<'a>>),

    /// `* <n> EXISTS`
    Exists(u32),

    /// `* <n> RECENT`
    Recent(u32),

    /// `* <n> EXPUNGE`
    Expunge(NonZeroU32),

    /// `* <n> FETCH (...)`
    Fetch {
        seq: NonZeroU32,
        items: Vec1<MessageDataItem<'a>>,
    },

    /// `* ENABLED ...` (RFC 5161)
    Enabled {
        capabilities: Vec<CapabilityEnable<'a>>,
    },

    /// `* VANISHED [(EARLIER)] <uids>` (RFC 7162)
    Vanished {
        earlier: bool,
        uids: SequenceSet,
    },

    /// `* NAMESPACE ... ... ...` (RFC 2342)
    Namespace {
        personal: Namespace<'a>,
        other: Namespace<'a>,
        shared: Namespace<'a>,
    },

    /// `* QUOTA <root> (...)` (RFC 2087)
    Quota {
        root: AString<'a>,
        quotas: Vec1<QuotaGet<'a>>,
    },

    /// `* QUOTAROOT <mailbox> <root> ...` (RFC 2087)
    QuotaRoot {
        mailbox: Mailbox<'a>,
        roots: Vec<AString<'a>>,
    },

    /// `* ACL <mailbox> <identifier> <rights> ...` (RFC 4314)
    Acl {
        mailbox: Mailbox<'a>,
        entries: Vec<AclEntry<'a>>,
    },

    /// `* LISTRIGHTS <mailbox> <identifier> <required> <optional> ...` (RFC 4314)
    ListRights {
        mailbox: Mailbox<'a>,
        identifier: AString<'a>,
        required: Rights<'a>,
        optional: Vec<Rights<'a>>,
    },

    /// `* MYRIGHTS <mailbox> <rights>` (RFC 4314)
    MyRights {
        mailbox: Mailbox<'a>,
        rights: Rights<'a>,
    },

    /// `* METADATA <mailbox> ...` (RFC 5464)
    Metadata {
        mailbox: Mailbox<'a>,
        items: MetadataResponse<'a>,
    },

    /// `* GENURLAUTH <url> ...` (RFC 4467)
    GenUrlAuth(Vec1<AString<'a>>),

    /// `* URLFETCH <url> <nstring> ...` (RFC 4467)
    UrlFetch(Vec<(AString<'a>, NString<'a>)>),

    /// `* ID (...)` (RFC 2971)
    Id {
        parameters: Option<Vec<(IString<'a>, NString<'a>)>>,
    },
}

/// A command continuation request.
///
/// A line starting with `+`, inviting the client to continue an in-flight
/// command (typically with a literal body or authentication data).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CommandContinuationRequest<'a> {
    Basic {
        code: Option<Code<'a>>,
        text: Text<'a>,
    },
    Base64(Cow<'a, [u8]>),
}

impl<'a> CommandContinuationRequest<'a> {
    pub fn basic<T>(code: Option<Code<'a>>, text: T) -> Result<Self, ValidationError>
    where
        T: TryInto<Text<'a>, Error = ValidationError>,
    {
        Ok(Self::Basic {
            code,
            text: text.try_into()?,
        })
    }

    pub fn base64(data: Vec<u8>) -> Self {
        Self::Base64(Cow::Owned(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_folding() {
        assert_eq!(
            Capability::try_from("imap4rev1").unwrap(),
            Capability::Imap4Rev1
        );
        assert_eq!(
            Capability::try_from("AUTH=PLAIN").unwrap(),
            Capability::Auth(AuthMechanism::Plain)
        );
        assert_eq!(format!("{}", Capability::Imap4Rev1), "IMAP4rev1");

        let other = Capability::try_from("XDOVECOT").unwrap();
        assert!(matches!(other, Capability::Other(_)));
    }

    #[test]
    fn test_status_constructors() {
        assert!(Status::ok(None, None, "hello").is_ok());
        assert!(Status::ok(None, None, "").is_err());
        assert!(matches!(
            Status::ok(Some(Tag::try_from("A1").unwrap()), None, "done").unwrap(),
            Status::Tagged(_)
        ));
    }
}
