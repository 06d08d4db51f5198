//! Client commands.
//!
//! See <https://tools.ietf.org/html/rfc3501#section-6>.

use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthMechanism,
    core::{AString, Atom, Charset, IString, NString, Tag, Vec1},
    datetime::DateTime,
    error::ValidationError,
    extensions::{
        acl::ModRights,
        binary::LiteralOrLiteral8,
        condstore_qresync::{ModSeq, QresyncParameter},
        enable::CapabilityEnable,
        esearch::{SearchReturnOption, SearchSource},
        metadata::{Entry, EntryValue, GetMetadataOption},
        quota::QuotaSet,
        urlauth::{UrlAuthItem, UrlMechanism},
    },
    fetch::MacroOrMessageDataItemNames,
    flag::{Flag, StoreResponse, StoreType},
    mailbox::{ListMailbox, Mailbox},
    search::SearchKey,
    secret::Secret,
    sequence::SequenceSet,
    status::StatusDataItemName,
};

/// A command, i.e., a tag and a command body.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Command<'a> {
    /// Tag.
    pub tag: Tag<'a>,
    /// Body, e.g., CAPABILITY, LOGIN, SELECT, etc.
    pub body: CommandBody<'a>,
}

impl<'a> Command<'a> {
    /// Create a new command.
    pub fn new<T>(tag: T, body: CommandBody<'a>) -> Result<Self, T::Error>
    where
        T: TryInto<Tag<'a>>,
    {
        Ok(Self {
            tag: tag.try_into()?,
            body,
        })
    }

    /// Get the command name.
    pub fn name(&self) -> &'static str {
        self.body.name()
    }
}

/// Command body.
///
/// One variant per supported command. A variant carries its parameters as
/// typed values; the `uid: bool` fields distinguish the `UID`-prefixed form.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CommandBody<'a> {
    // ----- Any State (https://tools.ietf.org/html/rfc3501#section-6.1) -----
    /// ### 6.1.1. CAPABILITY Command
    ///
    /// Requests a listing of capabilities that the server supports. The
    /// server MUST send a single untagged CAPABILITY response before the
    /// (tagged) OK response.
    Capability,

    /// ### 6.1.2. NOOP Command
    ///
    /// Always succeeds; it does nothing. Can be used as a periodic poll for
    /// new messages or message status updates, or to reset any inactivity
    /// autologout timer.
    Noop,

    /// ### 6.1.3. LOGOUT Command
    ///
    /// Informs the server that the client is done with the connection. The
    /// server MUST send a BYE untagged response before the (tagged) OK.
    Logout,

    // ----- Not Authenticated State (https://tools.ietf.org/html/rfc3501#section-6.2) -----
    /// ### 6.2.1. STARTTLS Command
    ///
    /// A TLS negotiation begins immediately after the CRLF at the end of
    /// the tagged OK response. Once STARTTLS is issued, no further commands
    /// may be sent until the negotiation is complete.
    StartTls,

    /// ### 6.2.2. AUTHENTICATE Command
    ///
    /// Indicates a SASL authentication mechanism to the server. The
    /// authentication protocol exchange is carried in subsequent
    /// continuation rounds; see
    /// [`AuthenticateData`](crate::auth::AuthenticateData).
    Authenticate {
        mechanism: AuthMechanism<'a>,
        /// Initial response (SASL-IR, RFC 4959).
        ///
        /// This holds the raw binary data, *not* the BASE64 string.
        ///
        /// <div class="warning">
        /// This must only be used when the server advertised support for it
        /// sending the SASL-IR capability.
        /// </div>
        initial_response: Option<Secret<Cow<'a, [u8]>>>,
    },

    /// ### 6.2.3. LOGIN Command
    ///
    /// Identifies the client to the server and carries the plaintext
    /// password authenticating this user.
    Login {
        username: AString<'a>,
        password: Secret<AString<'a>>,
    },

    // ----- Authenticated State (https://tools.ietf.org/html/rfc3501#section-6.3) -----
    /// ### 6.3.1. SELECT Command
    ///
    /// Selects a mailbox so that messages in the mailbox can be accessed.
    Select {
        mailbox: Mailbox<'a>,
        /// `CONDSTORE`/`QRESYNC` select parameters (RFC 7162).
        parameters: Vec<SelectParameter>,
    },

    /// ### 6.3.2. EXAMINE Command
    ///
    /// Identical to SELECT and returns the same output; however, the
    /// selected mailbox is identified as read-only.
    Examine {
        mailbox: Mailbox<'a>,
        parameters: Vec<SelectParameter>,
    },

    /// The UNSELECT command (RFC 3691).
    ///
    /// Frees the session from the selected state without expunging.
    Unselect,

    /// ### 6.3.3. CREATE Command
    ///
    /// Creates a mailbox with the given name.
    Create { mailbox: Mailbox<'a> },

    /// ### 6.3.4. DELETE Command
    ///
    /// Permanently removes the mailbox with the given name.
    Delete { mailbox: Mailbox<'a> },

    /// ### 6.3.5. RENAME Command
    ///
    /// Changes the name of a mailbox.
    Rename {
        from: Mailbox<'a>,
        to: Mailbox<'a>,
    },

    /// ### 6.3.6. SUBSCRIBE Command
    Subscribe { mailbox: Mailbox<'a> },

    /// ### 6.3.7. UNSUBSCRIBE Command
    Unsubscribe { mailbox: Mailbox<'a> },

    /// ### 6.3.8. LIST Command (extended by RFC 5258)
    ///
    /// Returns a subset of names from the complete set of all names
    /// available to the client. The extended form adds selection options
    /// before the reference, multiple patterns, and return options.
    List {
        /// Selection options (RFC 5258), e.g., `SUBSCRIBED`.
        selection_options: Vec<ListSelectionOption<'a>>,
        reference: Mailbox<'a>,
        /// One or more patterns; RFC 3501 LIST has exactly one.
        patterns: Vec1<ListMailbox<'a>>,
        /// Return options (RFC 5258/5819), e.g., `CHILDREN`.
        return_options: Vec<ListReturnOption<'a>>,
    },

    /// ### 6.3.9. LSUB Command
    ///
    /// Like LIST, restricted to names the user has declared "active" via
    /// SUBSCRIBE.
    Lsub {
        reference: Mailbox<'a>,
        mailbox_wildcard: ListMailbox<'a>,
    },

    /// ### 6.3.10. STATUS Command
    ///
    /// Requests the status of the indicated mailbox without selecting it.
    Status {
        mailbox: Mailbox<'a>,
        item_names: Vec<StatusDataItemName>,
    },

    /// ### 6.3.11. APPEND Command (extended by RFC 3502 MULTIAPPEND)
    ///
    /// Appends one or more messages to the end of the specified mailbox.
    Append {
        mailbox: Mailbox<'a>,
        messages: Vec1<AppendMessage<'a>>,
    },

    // ----- Selected State (https://tools.ietf.org/html/rfc3501#section-6.4) -----
    /// ### 6.4.1. CHECK Command
    ///
    /// Requests a checkpoint of the currently selected mailbox.
    Check,

    /// ### 6.4.2. CLOSE Command
    ///
    /// Permanently removes all messages with \Deleted set and returns to
    /// the authenticated state.
    Close,

    /// ### 6.4.3. EXPUNGE Command
    ///
    /// Permanently removes all messages with \Deleted set from the
    /// currently selected mailbox.
    Expunge,

    /// The UID EXPUNGE command (RFC 4315).
    ///
    /// Like EXPUNGE, restricted to the given UID set.
    ExpungeUid { sequence_set: SequenceSet },

    /// ### 6.4.4. SEARCH Command
    ///
    /// Searches the mailbox for messages that match the given criteria.
    Search {
        charset: Option<Charset<'a>>,
        criteria: Vec1<SearchKey<'a>>,
        uid: bool,
    },

    /// The extended SEARCH command (RFC 4731/RFC 7377).
    ///
    /// `ESEARCH [IN (...)] [RETURN (...)] [CHARSET ...] <criteria>`
    ExtendedSearch {
        /// Source mailboxes (`IN (...)`, RFC 7377).
        source_options: Option<Vec1<SearchSource<'a>>>,
        /// Result options (`RETURN (...)`, RFC 4731/5182).
        return_options: Vec<SearchReturnOption>,
        charset: Option<Charset<'a>>,
        criteria: Vec1<SearchKey<'a>>,
        uid: bool,
    },

    /// ### 6.4.5. FETCH Command
    ///
    /// Retrieves data associated with a message in the mailbox.
    Fetch {
        sequence_set: SequenceSet,
        macro_or_item_names: MacroOrMessageDataItemNames<'a>,
        /// Fetch modifiers (RFC 7162), e.g., `CHANGEDSINCE`.
        modifiers: Vec<FetchModifier>,
        uid: bool,
    },

    /// ### 6.4.6. STORE Command
    ///
    /// Alters data associated with a message in the mailbox.
    Store {
        sequence_set: SequenceSet,
        kind: StoreType,
        response: StoreResponse,
        flags: Vec<Flag<'a>>,
        /// Store modifiers (RFC 7162), i.e., `UNCHANGEDSINCE`.
        modifiers: Vec<StoreModifier>,
        uid: bool,
    },

    /// ### 6.4.7. COPY Command
    ///
    /// Copies the specified message(s) to the end of the destination
    /// mailbox.
    Copy {
        sequence_set: SequenceSet,
        mailbox: Mailbox<'a>,
        uid: bool,
    },

    /// The MOVE command (RFC 6851).
    ///
    /// Like COPY, but the source messages are expunged afterwards.
    Move {
        sequence_set: SequenceSet,
        mailbox: Mailbox<'a>,
        uid: bool,
    },

    /// The IDLE command (RFC 2177).
    ///
    /// Puts the connection into the idling state until the client sends
    /// `DONE` (see [`IdleDone`](crate::extensions::idle::IdleDone)).
    Idle,

    // ----- Extensions -----
    /// The ENABLE command (RFC 5161).
    Enable {
        capabilities: Vec1<CapabilityEnable<'a>>,
    },

    /// The ID command (RFC 2971).
    Id {
        /// `NIL` or a list of field/value pairs.
        parameters: Option<Vec<(IString<'a>, NString<'a>)>>,
    },

    /// The GETQUOTA command (RFC 2087).
    GetQuota { root: AString<'a> },

    /// The GETQUOTAROOT command (RFC 2087).
    GetQuotaRoot { mailbox: Mailbox<'a> },

    /// The SETQUOTA command (RFC 2087).
    SetQuota {
        root: AString<'a>,
        /// A possibly empty list of resource limits.
        quotas: Vec<QuotaSet<'a>>,
    },

    /// The SETACL command (RFC 4314).
    SetAcl {
        mailbox: Mailbox<'a>,
        identifier: AString<'a>,
        rights: ModRights<'a>,
    },

    /// The DELETEACL command (RFC 4314).
    DeleteAcl {
        mailbox: Mailbox<'a>,
        identifier: AString<'a>,
    },

    /// The GETACL command (RFC 4314).
    GetAcl { mailbox: Mailbox<'a> },

    /// The LISTRIGHTS command (RFC 4314).
    ListRights {
        mailbox: Mailbox<'a>,
        identifier: AString<'a>,
    },

    /// The MYRIGHTS command (RFC 4314).
    MyRights { mailbox: Mailbox<'a> },

    /// The GETMETADATA command (RFC 5464).
    GetMetadata {
        options: Vec<GetMetadataOption>,
        mailbox: Mailbox<'a>,
        entries: Vec1<Entry<'a>>,
    },

    /// The SETMETADATA command (RFC 5464).
    SetMetadata {
        mailbox: Mailbox<'a>,
        entries: Vec1<EntryValue<'a>>,
    },

    /// The NAMESPACE command (RFC 2342).
    Namespace,

    /// The GENURLAUTH command (RFC 4467).
    GenUrlAuth { items: Vec1<UrlAuthItem<'a>> },

    /// The RESETKEY command (RFC 4467).
    ResetKey {
        /// Without a mailbox, all mailbox access keys are revoked.
        mailbox: Option<Mailbox<'a>>,
        mechanisms: Vec<UrlMechanism<'a>>,
    },

    /// The URLFETCH command (RFC 4467).
    UrlFetch { urls: Vec1<AString<'a>> },
}

impl<'a> CommandBody<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Noop => "NOOP",
            Self::Logout => "LOGOUT",
            Self::StartTls => "STARTTLS",
            Self::Authenticate { .. } => "AUTHENTICATE",
            Self::Login { .. } => "LOGIN",
            Self::Select { .. } => "SELECT",
            Self::Examine { .. } => "EXAMINE",
            Self::Unselect => "UNSELECT",
            Self::Create { .. } => "CREATE",
            Self::Delete { .. } => "DELETE",
            Self::Rename { .. } => "RENAME",
            Self::Subscribe { .. } => "SUBSCRIBE",
            Self::Unsubscribe { .. } => "UNSUBSCRIBE",
            Self::List { .. } => "LIST",
            Self::Lsub { .. } => "LSUB",
            Self::Status { .. } => "STATUS",
            Self::Append { .. } => "APPEND",
            Self::Check => "CHECK",
            Self::Close => "CLOSE",
            Self::Expunge => "EXPUNGE",
            Self::ExpungeUid { .. } => "EXPUNGE",
            Self::Search { .. } => "SEARCH",
            Self::ExtendedSearch { .. } => "ESEARCH",
            Self::Fetch { .. } => "FETCH",
            Self::Store { .. } => "STORE",
            Self::Copy { .. } => "COPY",
            Self::Move { .. } => "MOVE",
            Self::Idle => "IDLE",
            Self::Enable { .. } => "ENABLE",
            Self::Id { .. } => "ID",
            Self::GetQuota { .. } => "GETQUOTA",
            Self::GetQuotaRoot { .. } => "GETQUOTAROOT",
            Self::SetQuota { .. } => "SETQUOTA",
            Self::SetAcl { .. } => "SETACL",
            Self::DeleteAcl { .. } => "DELETEACL",
            Self::GetAcl { .. } => "GETACL",
            Self::ListRights { .. } => "LISTRIGHTS",
            Self::MyRights { .. } => "MYRIGHTS",
            Self::GetMetadata { .. } => "GETMETADATA",
            Self::SetMetadata { .. } => "SETMETADATA",
            Self::Namespace => "NAMESPACE",
            Self::GenUrlAuth { .. } => "GENURLAUTH",
            Self::ResetKey { .. } => "RESETKEY",
            Self::UrlFetch { .. } => "URLFETCH",
        }
    }

    pub fn login<U, P>(username: U, password: P) -> Result<Self, ValidationError>
    where
        U: TryInto<AString<'a>, Error = ValidationError>,
        P: TryInto<AString<'a>, Error = ValidationError>,
    {
        Ok(CommandBody::Login {
            username: username.try_into()?,
            password: Secret::new(password.try_into()?),
        })
    }

    pub fn select<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox<'a>>,
    {
        Ok(CommandBody::Select {
            mailbox: mailbox.try_into()?,
            parameters: vec![],
        })
    }

    pub fn fetch<S, I>(sequence_set: S, macro_or_item_names: I, uid: bool) -> Result<Self, S::Error>
    where
        S: TryInto<SequenceSet>,
        I: Into<MacroOrMessageDataItemNames<'a>>,
    {
        Ok(CommandBody::Fetch {
            sequence_set: sequence_set.try_into()?,
            macro_or_item_names: macro_or_item_names.into(),
            modifiers: vec![],
            uid,
        })
    }

    /// Create a single-message APPEND.
    pub fn append<M>(mailbox: M, message: AppendMessage<'a>) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox<'a>>,
    {
        Ok(CommandBody::Append {
            mailbox: mailbox.try_into()?,
            messages: Vec1::from(message),
        })
    }

    pub fn tag<T>(self, tag: T) -> Result<Command<'a>, T::Error>
    where
        T: TryInto<Tag<'a>>,
    {
        Command::new(tag, self)
    }
}

/// One message of an APPEND command.
///
/// MULTIAPPEND (RFC 3502) allows several of these in one command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AppendMessage<'a> {
    pub flags: Vec<Flag<'a>>,
    pub date: Option<DateTime>,
    pub message: LiteralOrLiteral8<'a>,
}

/// A SELECT/EXAMINE parameter (RFC 7162).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SelectParameter {
    /// `(CONDSTORE)`
    CondStore,
    /// `(QRESYNC (...))`
    Qresync(QresyncParameter),
}

/// A FETCH modifier (RFC 7162).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FetchModifier {
    /// `CHANGEDSINCE <mod-seq>`
    ChangedSince(ModSeq),
    /// `VANISHED` (only valid on UID FETCH with QRESYNC enabled).
    Vanished,
}

/// A STORE modifier (RFC 7162).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StoreModifier {
    /// `UNCHANGEDSINCE <mod-seq>`
    UnchangedSince(ModSeq),
}

/// A LIST selection option (RFC 5258).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ListSelectionOption<'a> {
    /// `SUBSCRIBED`
    Subscribed,
    /// `REMOTE`
    Remote,
    /// `RECURSIVEMATCH`
    RecursiveMatch,
    /// An option this crate has no first-class support for.
    Other(Atom<'a>),
}

/// A LIST return option (RFC 5258, RFC 5819).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ListReturnOption<'a> {
    /// `SUBSCRIBED`
    Subscribed,
    /// `CHILDREN`
    Children,
    /// `STATUS (...)` (RFC 5819)
    Status(Vec<StatusDataItemName>),
    /// An option this crate has no first-class support for.
    Other(Atom<'a>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_new() {
        let command = Command::new("A1", CommandBody::Noop).unwrap();
        assert_eq!(command.name(), "NOOP");

        assert!(Command::new("", CommandBody::Noop).is_err());
        assert!(Command::new("A +", CommandBody::Noop).is_err());
    }

    #[test]
    fn test_command_body_login() {
        let body = CommandBody::login("alice", "password").unwrap();

        // The password must not leak through `Debug`.
        let debug = format!("{body:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("password"));
    }
}
