//! # Encoding of messages.
//!
//! Serialization is total and deterministic, but it is not always a single
//! buffer: whenever a message carries a synchronizing literal, the sender
//! must stop after the announcement (`{n}\r\n`) and wait for the peer's
//! continuation request before transmitting the announced bytes.
//! [`Encoder::encode`] therefore yields the wire form as a sequence of
//! [`Fragment`]s and leaves the pauses to the caller. When no coordination
//! is needed — server responses, tests — [`Encoded::dump`] concatenates
//! all fragments into one buffer.
//!
//! # Example
//!
//! A mailbox name that fits neither the atom nor the quoted form is
//! transported as a literal, which splits the encoding into three
//! fragments:
//!
//! ```rust
//! use imap_stream::{
//!     encode::{Encoder, Fragment},
//!     types::{
//!         command::{Command, CommandBody},
//!         core::LiteralMode,
//!     },
//!     CommandCodec,
//! };
//!
//! let command = Command::new("t1", CommandBody::select("Entwürfe").unwrap()).unwrap();
//!
//! let mut wire = Vec::new();
//!
//! for fragment in CommandCodec::default().encode(&command) {
//!     match fragment {
//!         Fragment::Line { data } => wire.extend(data),
//!         Fragment::Literal { data, mode } => {
//!             if mode == LiteralMode::Sync {
//!                 // A real client would await the server's `+ ...` here.
//!             }
//!             wire.extend(data);
//!         }
//!     }
//! }
//!
//! assert_eq!(wire, b"t1 SELECT {9}\r\nEntw\xc3\xbcrfe\r\n");
//! ```

use std::{collections::VecDeque, io::Write, num::NonZeroU32};

use base64::{engine::general_purpose::STANDARD as base64, Engine};
use chrono::{Datelike, Timelike};
use imap_stream_types::{
    auth::{AuthMechanism, AuthenticateData},
    body::{
        BasicFields, Body, BodyExtension, BodyStructure, Disposition, Language, Location,
        MultiPartExtensionData, SinglePartExtensionData, SpecificFields,
    },
    command::{
        AppendMessage, Command, CommandBody, FetchModifier, ListReturnOption, ListSelectionOption,
        SelectParameter, StoreModifier,
    },
    core::{
        AString, Atom, AtomExt, Charset, IString, Literal, LiteralMode, NString, Quoted,
        QuotedChar, Tag, Text, Vec1,
    },
    datetime::{DateTime, NaiveDate},
    envelope::{Address, Envelope},
    extensions::{
        acl::{AclEntry, ModRights, ModRightsMode, Rights},
        binary::{Literal8, LiteralOrLiteral8, NString8},
        condstore_qresync::{AttributeFlag, ModSeq, QresyncParameter},
        enable::CapabilityEnable,
        esearch::{ESearchResponse, SearchReturnData, SearchReturnOption, SearchSource},
        idle::IdleDone,
        metadata::{Entry, EntryValue, GetMetadataOption, MetadataCode, MetadataDepth, MetadataResponse},
        namespace::NamespaceDescr,
        quota::{QuotaGet, QuotaSet, Resource},
        urlauth::{UrlAuthItem, UrlMechanism},
    },
    fetch::{
        Macro, MacroOrMessageDataItemNames, MessageDataItem, MessageDataItemName, Part, Section,
    },
    flag::{Flag, FlagFetch, FlagNameAttribute, FlagPerm, StoreResponse, StoreType},
    mailbox::{ListMailbox, Mailbox},
    response::{
        Bye, Capability, Code, CodeOther, CommandContinuationRequest, Data, Greeting, GreetingKind,
        Response, Status, StatusBody, StatusKind, Tagged,
    },
    search::SearchKey,
    sequence::{SeqOrUid, Sequence, SequenceSet},
    status::{StatusDataItem, StatusDataItemName},
    utils::escape_quoted,
};

use crate::{AuthenticateDataCodec, CommandCodec, GreetingCodec, IdleDoneCodec, ResponseCodec};

/// Encoder.
///
/// Implemented for types that know how to encode a specific IMAP message.
/// See [implementors](trait.Encoder.html#implementors).
pub trait Encoder {
    type Message<'a>;

    /// Encode this message.
    fn encode(&self, message: &Self::Message<'_>) -> Encoded;
}

/// An encoded message.
///
/// The message is yielded through [`Fragment`]s, because the usage of
/// (synchronizing) literals may change the IMAP message flow: a client must
/// await a continuation request between a literal announcement and the
/// literal bytes. In many cases it is an error to just "dump" a message and
/// send it over the network in one go.
#[derive(Clone, Debug)]
pub struct Encoded {
    items: VecDeque<Fragment>,
}

impl Encoded {
    /// Dump the (remaining) encoded data without being guided by [`Fragment`]s.
    pub fn dump(self) -> Vec<u8> {
        let mut out = Vec::new();

        for fragment in self.items {
            match fragment {
                Fragment::Line { mut data } => out.append(&mut data),
                Fragment::Literal { mut data, .. } => out.append(&mut data),
            }
        }

        out
    }
}

impl Iterator for Encoded {
    type Item = Fragment;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.pop_front()
    }
}

/// The intended action of a client or server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Fragment {
    /// A line that is ready to be send.
    Line { data: Vec<u8> },

    /// A literal that may require an action before it should be send.
    Literal { data: Vec<u8>, mode: LiteralMode },
}

// -------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EncodeContext {
    accumulator: Vec<u8>,
    items: VecDeque<Fragment>,
}

impl EncodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self) {
        self.items.push_back(Fragment::Line {
            data: std::mem::take(&mut self.accumulator),
        })
    }

    pub fn push_literal(&mut self, mode: LiteralMode) {
        self.items.push_back(Fragment::Literal {
            data: std::mem::take(&mut self.accumulator),
            mode,
        })
    }

    pub fn into_items(self) -> VecDeque<Fragment> {
        let Self {
            accumulator,
            mut items,
        } = self;

        if !accumulator.is_empty() {
            items.push_back(Fragment::Line { data: accumulator });
        }

        items
    }

    #[cfg(test)]
    pub(crate) fn dump(self) -> Vec<u8> {
        let mut out = Vec::new();

        for item in self.into_items() {
            match item {
                Fragment::Line { data } | Fragment::Literal { data, .. } => {
                    out.extend_from_slice(&data)
                }
            }
        }

        out
    }
}

impl Write for EncodeContext {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.accumulator.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

macro_rules! impl_encoder_for_codec {
    ($codec:ty, $message:ty) => {
        impl Encoder for $codec {
            type Message<'a> = $message;

            fn encode(&self, message: &Self::Message<'_>) -> Encoded {
                let mut encode_context = EncodeContext::new();
                EncodeIntoContext::encode_ctx(message, &mut encode_context).unwrap();

                Encoded {
                    items: encode_context.into_items(),
                }
            }
        }
    };
}

impl_encoder_for_codec!(GreetingCodec, Greeting<'a>);
impl_encoder_for_codec!(CommandCodec, Command<'a>);
impl_encoder_for_codec!(AuthenticateDataCodec, AuthenticateData<'a>);
impl_encoder_for_codec!(ResponseCodec, Response<'a>);
impl_encoder_for_codec!(IdleDoneCodec, IdleDone);

// -------------------------------------------------------------------------------------------------

pub(crate) trait EncodeIntoContext {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()>;
}

// ----- Primitive ---------------------------------------------------------------------------------

impl EncodeIntoContext for u32 {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.to_string().as_bytes())
    }
}

impl EncodeIntoContext for u64 {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.to_string().as_bytes())
    }
}

impl EncodeIntoContext for NonZeroU32 {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.to_string().as_bytes())
    }
}

impl EncodeIntoContext for ModSeq {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.inner().to_string().as_bytes())
    }
}

// ----- Core --------------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for Atom<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.inner().as_bytes())
    }
}

impl<'a> EncodeIntoContext for AtomExt<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.inner().as_bytes())
    }
}

impl<'a> EncodeIntoContext for Quoted<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "\"{}\"", escape_quoted(self.inner()))
    }
}

impl<'a> EncodeIntoContext for Literal<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self.mode() {
            LiteralMode::Sync => write!(ctx, "{{{}}}\r\n", self.data().len())?,
            LiteralMode::NonSync => write!(ctx, "{{{}+}}\r\n", self.data().len())?,
        }

        // The line so far (ending with the literal announcement) is one
        // fragment, the literal bytes are the next one.
        ctx.push_line();

        ctx.write_all(self.data())?;
        ctx.push_literal(self.mode());

        Ok(())
    }
}

impl<'a> EncodeIntoContext for Literal8<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self.mode {
            LiteralMode::Sync => write!(ctx, "~{{{}}}\r\n", self.data.len())?,
            LiteralMode::NonSync => write!(ctx, "~{{{}+}}\r\n", self.data.len())?,
        }

        ctx.push_line();

        ctx.write_all(&self.data)?;
        ctx.push_literal(self.mode);

        Ok(())
    }
}

impl<'a> EncodeIntoContext for IString<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Literal(literal) => literal.encode_ctx(ctx),
            Self::Quoted(quoted) => quoted.encode_ctx(ctx),
        }
    }
}

impl<'a> EncodeIntoContext for NString<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match &self.0 {
            Some(istring) => istring.encode_ctx(ctx),
            None => ctx.write_all(b"NIL"),
        }
    }
}

impl<'a> EncodeIntoContext for NString8<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::NString(nstring) => nstring.encode_ctx(ctx),
            Self::Literal8(literal8) => literal8.encode_ctx(ctx),
        }
    }
}

impl<'a> EncodeIntoContext for LiteralOrLiteral8<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Literal(literal) => literal.encode_ctx(ctx),
            Self::Literal8(literal8) => literal8.encode_ctx(ctx),
        }
    }
}

impl<'a> EncodeIntoContext for AString<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            AString::Atom(atom) => atom.encode_ctx(ctx),
            AString::String(imap_str) => imap_str.encode_ctx(ctx),
        }
    }
}

impl<'a> EncodeIntoContext for Tag<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.inner().as_bytes())
    }
}

impl<'a> EncodeIntoContext for Text<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.inner().as_bytes())
    }
}

impl<'a> EncodeIntoContext for Charset<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Charset::Atom(atom) => atom.encode_ctx(ctx),
            Charset::Quoted(quoted) => quoted.encode_ctx(ctx),
        }
    }
}

impl EncodeIntoContext for QuotedChar {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self.inner() {
            c @ ('\\' | '"') => write!(ctx, "\"\\{c}\""),
            c => write!(ctx, "\"{c}\""),
        }
    }
}

// ----- DateTime ----------------------------------------------------------------------------------

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl EncodeIntoContext for DateTime {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        let inner = self.inner();

        let offset = inner.offset().local_minus_utc();
        let (sign, offset) = if offset < 0 { ('-', -offset) } else { ('+', offset) };

        write!(
            ctx,
            "\"{:02}-{}-{:04} {:02}:{:02}:{:02} {}{:02}{:02}\"",
            inner.day(),
            MONTHS[inner.month0() as usize],
            inner.year(),
            inner.hour(),
            inner.minute(),
            inner.second(),
            sign,
            offset / 3600,
            (offset % 3600) / 60,
        )
    }
}

impl EncodeIntoContext for NaiveDate {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        let inner = self.inner();

        write!(
            ctx,
            "{}-{}-{:04}",
            inner.day(),
            MONTHS[inner.month0() as usize],
            inner.year(),
        )
    }
}

// ----- Sequence ----------------------------------------------------------------------------------

impl EncodeIntoContext for SequenceSet {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::SavedResult => ctx.write_all(b"$"),
            Self::Sequences(sequences) => join_serializable(sequences.as_ref(), b",", ctx),
        }
    }
}

impl EncodeIntoContext for Sequence {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Sequence::Single(seq_or_uid) => seq_or_uid.encode_ctx(ctx),
            Sequence::Range(from, to) => {
                from.encode_ctx(ctx)?;
                ctx.write_all(b":")?;
                to.encode_ctx(ctx)
            }
        }
    }
}

impl EncodeIntoContext for SeqOrUid {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            SeqOrUid::Value(number) => number.encode_ctx(ctx),
            SeqOrUid::Asterisk => ctx.write_all(b"*"),
        }
    }
}

// ----- Flag --------------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for Flag<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "{}", self)
    }
}

impl<'a> EncodeIntoContext for FlagFetch<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Flag(flag) => flag.encode_ctx(ctx),
            Self::Recent => ctx.write_all(b"\\Recent"),
        }
    }
}

impl<'a> EncodeIntoContext for FlagPerm<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Flag(flag) => flag.encode_ctx(ctx),
            Self::Asterisk => ctx.write_all(b"\\*"),
        }
    }
}

impl<'a> EncodeIntoContext for FlagNameAttribute<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "{}", self)
    }
}

// ----- Mailbox -----------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for Mailbox<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Mailbox::Inbox => ctx.write_all(b"INBOX"),
            Mailbox::Other(other) => other.inner().encode_ctx(ctx),
        }
    }
}

impl<'a> EncodeIntoContext for ListMailbox<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            ListMailbox::Token(lcs) => ctx.write_all(lcs.inner().as_bytes()),
            ListMailbox::String(istring) => istring.encode_ctx(ctx),
        }
    }
}

// ----- Command -----------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for Command<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.tag.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.body.encode_ctx(ctx)?;
        ctx.write_all(b"\r\n")
    }
}

impl<'a> EncodeIntoContext for CommandBody<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            CommandBody::Capability => ctx.write_all(b"CAPABILITY"),
            CommandBody::Noop => ctx.write_all(b"NOOP"),
            CommandBody::Logout => ctx.write_all(b"LOGOUT"),
            CommandBody::StartTls => ctx.write_all(b"STARTTLS"),
            CommandBody::Authenticate {
                mechanism,
                initial_response,
            } => {
                ctx.write_all(b"AUTHENTICATE")?;
                ctx.write_all(b" ")?;
                mechanism.encode_ctx(ctx)?;

                if let Some(ir) = initial_response {
                    ctx.write_all(b" ")?;

                    // RFC 4959: "To send a zero-length initial response,
                    // the client MUST send a single pad character ("=")."
                    if ir.declassify().is_empty() {
                        ctx.write_all(b"=")?;
                    } else {
                        ctx.write_all(base64.encode(ir.declassify()).as_bytes())?;
                    };
                };

                Ok(())
            }
            CommandBody::Login { username, password } => {
                ctx.write_all(b"LOGIN")?;
                ctx.write_all(b" ")?;
                username.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                password.declassify().encode_ctx(ctx)
            }
            CommandBody::Select {
                mailbox,
                parameters,
            } => {
                ctx.write_all(b"SELECT")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)?;
                encode_select_parameters(parameters, ctx)
            }
            CommandBody::Examine {
                mailbox,
                parameters,
            } => {
                ctx.write_all(b"EXAMINE")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)?;
                encode_select_parameters(parameters, ctx)
            }
            CommandBody::Unselect => ctx.write_all(b"UNSELECT"),
            CommandBody::Create { mailbox } => {
                ctx.write_all(b"CREATE")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::Delete { mailbox } => {
                ctx.write_all(b"DELETE")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::Rename { from, to } => {
                ctx.write_all(b"RENAME")?;
                ctx.write_all(b" ")?;
                from.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                to.encode_ctx(ctx)
            }
            CommandBody::Subscribe { mailbox } => {
                ctx.write_all(b"SUBSCRIBE")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::Unsubscribe { mailbox } => {
                ctx.write_all(b"UNSUBSCRIBE")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::List {
                selection_options,
                reference,
                patterns,
                return_options,
            } => {
                ctx.write_all(b"LIST")?;

                if !selection_options.is_empty() {
                    ctx.write_all(b" (")?;
                    join_serializable(selection_options, b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                ctx.write_all(b" ")?;
                reference.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;

                if patterns.len() == 1 {
                    patterns.as_ref()[0].encode_ctx(ctx)?;
                } else {
                    ctx.write_all(b"(")?;
                    join_serializable(patterns.as_ref(), b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                if !return_options.is_empty() {
                    ctx.write_all(b" RETURN (")?;
                    join_serializable(return_options, b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                Ok(())
            }
            CommandBody::Lsub {
                reference,
                mailbox_wildcard,
            } => {
                ctx.write_all(b"LSUB")?;
                ctx.write_all(b" ")?;
                reference.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                mailbox_wildcard.encode_ctx(ctx)
            }
            CommandBody::Status {
                mailbox,
                item_names,
            } => {
                ctx.write_all(b"STATUS")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                ctx.write_all(b"(")?;
                join_serializable(item_names, b" ", ctx)?;
                ctx.write_all(b")")
            }
            CommandBody::Append { mailbox, messages } => {
                ctx.write_all(b"APPEND")?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)?;

                for message in messages {
                    message.encode_ctx(ctx)?;
                }

                Ok(())
            }
            CommandBody::Check => ctx.write_all(b"CHECK"),
            CommandBody::Close => ctx.write_all(b"CLOSE"),
            CommandBody::Expunge => ctx.write_all(b"EXPUNGE"),
            CommandBody::ExpungeUid { sequence_set } => {
                ctx.write_all(b"UID EXPUNGE ")?;
                sequence_set.encode_ctx(ctx)
            }
            CommandBody::Search {
                charset,
                criteria,
                uid,
            } => {
                if *uid {
                    ctx.write_all(b"UID ")?;
                }
                ctx.write_all(b"SEARCH")?;

                if let Some(charset) = charset {
                    ctx.write_all(b" CHARSET ")?;
                    charset.encode_ctx(ctx)?;
                }

                ctx.write_all(b" ")?;
                join_serializable(criteria.as_ref(), b" ", ctx)
            }
            CommandBody::ExtendedSearch {
                source_options,
                return_options,
                charset,
                criteria,
                uid,
            } => {
                if *uid {
                    ctx.write_all(b"UID ")?;
                }
                ctx.write_all(b"ESEARCH")?;

                if let Some(source_options) = source_options {
                    ctx.write_all(b" IN (")?;
                    join_serializable(source_options.as_ref(), b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                if !return_options.is_empty() {
                    ctx.write_all(b" RETURN (")?;
                    join_serializable(return_options, b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                if let Some(charset) = charset {
                    ctx.write_all(b" CHARSET ")?;
                    charset.encode_ctx(ctx)?;
                }

                ctx.write_all(b" ")?;
                join_serializable(criteria.as_ref(), b" ", ctx)
            }
            CommandBody::Fetch {
                sequence_set,
                macro_or_item_names,
                modifiers,
                uid,
            } => {
                if *uid {
                    ctx.write_all(b"UID ")?;
                }

                ctx.write_all(b"FETCH ")?;
                sequence_set.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                macro_or_item_names.encode_ctx(ctx)?;

                if !modifiers.is_empty() {
                    ctx.write_all(b" (")?;
                    join_serializable(modifiers, b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                Ok(())
            }
            CommandBody::Store {
                sequence_set,
                kind,
                response,
                flags,
                modifiers,
                uid,
            } => {
                if *uid {
                    ctx.write_all(b"UID ")?;
                }

                ctx.write_all(b"STORE ")?;
                sequence_set.encode_ctx(ctx)?;

                if !modifiers.is_empty() {
                    ctx.write_all(b" (")?;
                    join_serializable(modifiers, b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                ctx.write_all(b" ")?;

                match kind {
                    StoreType::Add => ctx.write_all(b"+")?,
                    StoreType::Remove => ctx.write_all(b"-")?,
                    StoreType::Replace => {}
                }

                ctx.write_all(b"FLAGS")?;

                match response {
                    StoreResponse::Answer => {}
                    StoreResponse::Silent => ctx.write_all(b".SILENT")?,
                }

                ctx.write_all(b" (")?;
                join_serializable(flags, b" ", ctx)?;
                ctx.write_all(b")")
            }
            CommandBody::Copy {
                sequence_set,
                mailbox,
                uid,
            } => {
                if *uid {
                    ctx.write_all(b"UID ")?;
                }
                ctx.write_all(b"COPY ")?;
                sequence_set.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::Move {
                sequence_set,
                mailbox,
                uid,
            } => {
                if *uid {
                    ctx.write_all(b"UID ")?;
                }
                ctx.write_all(b"MOVE ")?;
                sequence_set.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::Idle => ctx.write_all(b"IDLE"),
            CommandBody::Enable { capabilities } => {
                ctx.write_all(b"ENABLE ")?;
                join_serializable(capabilities.as_ref(), b" ", ctx)
            }
            CommandBody::Id { parameters } => {
                ctx.write_all(b"ID ")?;

                match parameters {
                    Some(parameters) => {
                        if let Some((first, tail)) = parameters.split_first() {
                            ctx.write_all(b"(")?;

                            first.0.encode_ctx(ctx)?;
                            ctx.write_all(b" ")?;
                            first.1.encode_ctx(ctx)?;

                            for parameter in tail {
                                ctx.write_all(b" ")?;
                                parameter.0.encode_ctx(ctx)?;
                                ctx.write_all(b" ")?;
                                parameter.1.encode_ctx(ctx)?;
                            }

                            ctx.write_all(b")")
                        } else {
                            ctx.write_all(b"()")
                        }
                    }
                    None => ctx.write_all(b"NIL"),
                }
            }
            CommandBody::GetQuota { root } => {
                ctx.write_all(b"GETQUOTA ")?;
                root.encode_ctx(ctx)
            }
            CommandBody::GetQuotaRoot { mailbox } => {
                ctx.write_all(b"GETQUOTAROOT ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::SetQuota { root, quotas } => {
                ctx.write_all(b"SETQUOTA ")?;
                root.encode_ctx(ctx)?;
                ctx.write_all(b" (")?;
                join_serializable(quotas, b" ", ctx)?;
                ctx.write_all(b")")
            }
            CommandBody::SetAcl {
                mailbox,
                identifier,
                rights,
            } => {
                ctx.write_all(b"SETACL ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                identifier.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                rights.encode_ctx(ctx)
            }
            CommandBody::DeleteAcl {
                mailbox,
                identifier,
            } => {
                ctx.write_all(b"DELETEACL ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                identifier.encode_ctx(ctx)
            }
            CommandBody::GetAcl { mailbox } => {
                ctx.write_all(b"GETACL ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::ListRights {
                mailbox,
                identifier,
            } => {
                ctx.write_all(b"LISTRIGHTS ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                identifier.encode_ctx(ctx)
            }
            CommandBody::MyRights { mailbox } => {
                ctx.write_all(b"MYRIGHTS ")?;
                mailbox.encode_ctx(ctx)
            }
            CommandBody::GetMetadata {
                options,
                mailbox,
                entries,
            } => {
                ctx.write_all(b"GETMETADATA")?;

                if !options.is_empty() {
                    ctx.write_all(b" (")?;
                    join_serializable(options, b" ", ctx)?;
                    ctx.write_all(b")")?;
                }

                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;

                if entries.len() == 1 {
                    entries.as_ref()[0].encode_ctx(ctx)
                } else {
                    ctx.write_all(b"(")?;
                    join_serializable(entries.as_ref(), b" ", ctx)?;
                    ctx.write_all(b")")
                }
            }
            CommandBody::SetMetadata { mailbox, entries } => {
                ctx.write_all(b"SETMETADATA ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" (")?;
                join_serializable(entries.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")
            }
            CommandBody::Namespace => ctx.write_all(b"NAMESPACE"),
            CommandBody::GenUrlAuth { items } => {
                ctx.write_all(b"GENURLAUTH ")?;
                join_serializable(items.as_ref(), b" ", ctx)
            }
            CommandBody::ResetKey {
                mailbox,
                mechanisms,
            } => {
                ctx.write_all(b"RESETKEY")?;

                if let Some(mailbox) = mailbox {
                    ctx.write_all(b" ")?;
                    mailbox.encode_ctx(ctx)?;

                    for mechanism in mechanisms {
                        ctx.write_all(b" ")?;
                        mechanism.encode_ctx(ctx)?;
                    }
                }

                Ok(())
            }
            CommandBody::UrlFetch { urls } => {
                ctx.write_all(b"URLFETCH ")?;
                join_serializable(urls.as_ref(), b" ", ctx)
            }
        }
    }
}

fn encode_select_parameters(
    parameters: &[SelectParameter],
    ctx: &mut EncodeContext,
) -> std::io::Result<()> {
    if parameters.is_empty() {
        return Ok(());
    }

    ctx.write_all(b" (")?;
    join_serializable(parameters, b" ", ctx)?;
    ctx.write_all(b")")
}

impl<'a> EncodeIntoContext for AppendMessage<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        if !self.flags.is_empty() {
            ctx.write_all(b" (")?;
            join_serializable(&self.flags, b" ", ctx)?;
            ctx.write_all(b")")?;
        }

        if let Some(date) = &self.date {
            ctx.write_all(b" ")?;
            date.encode_ctx(ctx)?;
        }

        ctx.write_all(b" ")?;
        self.message.encode_ctx(ctx)
    }
}

impl EncodeIntoContext for SelectParameter {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::CondStore => ctx.write_all(b"CONDSTORE"),
            Self::Qresync(parameter) => parameter.encode_ctx(ctx),
        }
    }
}

impl EncodeIntoContext for QresyncParameter {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"QRESYNC (")?;
        self.uid_validity.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.mod_seq.encode_ctx(ctx)?;

        if let Some(known_uids) = &self.known_uids {
            ctx.write_all(b" ")?;
            known_uids.encode_ctx(ctx)?;
        }

        if let Some((known_seqs, known_uids)) = &self.seq_match_data {
            ctx.write_all(b" (")?;
            known_seqs.encode_ctx(ctx)?;
            ctx.write_all(b" ")?;
            known_uids.encode_ctx(ctx)?;
            ctx.write_all(b")")?;
        }

        ctx.write_all(b")")
    }
}

impl EncodeIntoContext for FetchModifier {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::ChangedSince(mod_seq) => {
                ctx.write_all(b"CHANGEDSINCE ")?;
                mod_seq.encode_ctx(ctx)
            }
            Self::Vanished => ctx.write_all(b"VANISHED"),
        }
    }
}

impl EncodeIntoContext for StoreModifier {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::UnchangedSince(mod_seq) => {
                ctx.write_all(b"UNCHANGEDSINCE ")?;
                mod_seq.encode_ctx(ctx)
            }
        }
    }
}

impl<'a> EncodeIntoContext for ListSelectionOption<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Subscribed => ctx.write_all(b"SUBSCRIBED"),
            Self::Remote => ctx.write_all(b"REMOTE"),
            Self::RecursiveMatch => ctx.write_all(b"RECURSIVEMATCH"),
            Self::Other(atom) => atom.encode_ctx(ctx),
        }
    }
}

impl<'a> EncodeIntoContext for ListReturnOption<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Subscribed => ctx.write_all(b"SUBSCRIBED"),
            Self::Children => ctx.write_all(b"CHILDREN"),
            Self::Status(item_names) => {
                ctx.write_all(b"STATUS (")?;
                join_serializable(item_names, b" ", ctx)?;
                ctx.write_all(b")")
            }
            Self::Other(atom) => atom.encode_ctx(ctx),
        }
    }
}

// ----- Search ------------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for SearchKey<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            SearchKey::All => ctx.write_all(b"ALL"),
            SearchKey::Answered => ctx.write_all(b"ANSWERED"),
            SearchKey::Bcc(astring) => {
                ctx.write_all(b"BCC ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::Before(date) => {
                ctx.write_all(b"BEFORE ")?;
                date.encode_ctx(ctx)
            }
            SearchKey::Body(astring) => {
                ctx.write_all(b"BODY ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::Cc(astring) => {
                ctx.write_all(b"CC ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::Deleted => ctx.write_all(b"DELETED"),
            SearchKey::Draft => ctx.write_all(b"DRAFT"),
            SearchKey::Flagged => ctx.write_all(b"FLAGGED"),
            SearchKey::From(astring) => {
                ctx.write_all(b"FROM ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::Header(header_fld_name, astring) => {
                ctx.write_all(b"HEADER ")?;
                header_fld_name.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::Keyword(flag_keyword) => {
                ctx.write_all(b"KEYWORD ")?;
                flag_keyword.encode_ctx(ctx)
            }
            SearchKey::Larger(number) => {
                ctx.write_all(b"LARGER ")?;
                number.encode_ctx(ctx)
            }
            SearchKey::ModSeq { entry, mod_seq } => {
                ctx.write_all(b"MODSEQ")?;

                if let Some((flag, entry_type)) = entry {
                    ctx.write_all(b" \"/flags/")?;
                    match flag {
                        AttributeFlag::System(atom) => {
                            ctx.write_all(b"\\\\")?;
                            atom.encode_ctx(ctx)?;
                        }
                        AttributeFlag::Keyword(atom) => atom.encode_ctx(ctx)?,
                    }
                    ctx.write_all(b"\"")?;
                    write!(ctx, " {entry_type}")?;
                }

                ctx.write_all(b" ")?;
                mod_seq.encode_ctx(ctx)
            }
            SearchKey::New => ctx.write_all(b"NEW"),
            SearchKey::Not(search_key) => {
                ctx.write_all(b"NOT ")?;
                search_key.encode_ctx(ctx)
            }
            SearchKey::Old => ctx.write_all(b"OLD"),
            SearchKey::On(date) => {
                ctx.write_all(b"ON ")?;
                date.encode_ctx(ctx)
            }
            SearchKey::Or(search_key_a, search_key_b) => {
                ctx.write_all(b"OR ")?;
                search_key_a.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                search_key_b.encode_ctx(ctx)
            }
            SearchKey::Recent => ctx.write_all(b"RECENT"),
            SearchKey::Seen => ctx.write_all(b"SEEN"),
            SearchKey::SentBefore(date) => {
                ctx.write_all(b"SENTBEFORE ")?;
                date.encode_ctx(ctx)
            }
            SearchKey::SentOn(date) => {
                ctx.write_all(b"SENTON ")?;
                date.encode_ctx(ctx)
            }
            SearchKey::SentSince(date) => {
                ctx.write_all(b"SENTSINCE ")?;
                date.encode_ctx(ctx)
            }
            SearchKey::Since(date) => {
                ctx.write_all(b"SINCE ")?;
                date.encode_ctx(ctx)
            }
            SearchKey::Smaller(number) => {
                ctx.write_all(b"SMALLER ")?;
                number.encode_ctx(ctx)
            }
            SearchKey::Subject(astring) => {
                ctx.write_all(b"SUBJECT ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::Text(astring) => {
                ctx.write_all(b"TEXT ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::To(astring) => {
                ctx.write_all(b"TO ")?;
                astring.encode_ctx(ctx)
            }
            SearchKey::Uid(sequence_set) => {
                ctx.write_all(b"UID ")?;
                sequence_set.encode_ctx(ctx)
            }
            SearchKey::Unanswered => ctx.write_all(b"UNANSWERED"),
            SearchKey::Undeleted => ctx.write_all(b"UNDELETED"),
            SearchKey::Undraft => ctx.write_all(b"UNDRAFT"),
            SearchKey::Unflagged => ctx.write_all(b"UNFLAGGED"),
            SearchKey::Unkeyword(flag_keyword) => {
                ctx.write_all(b"UNKEYWORD ")?;
                flag_keyword.encode_ctx(ctx)
            }
            SearchKey::Unseen => ctx.write_all(b"UNSEEN"),
            SearchKey::SequenceSet(sequence_set) => sequence_set.encode_ctx(ctx),
            SearchKey::And(search_keys) => {
                ctx.write_all(b"(")?;
                join_serializable(search_keys.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")
            }
        }
    }
}

impl<'a> EncodeIntoContext for SearchSource<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Selected => ctx.write_all(b"selected"),
            Self::SelectedDelayed => ctx.write_all(b"selected-delayed"),
            Self::Inboxes => ctx.write_all(b"inboxes"),
            Self::Personal => ctx.write_all(b"personal"),
            Self::Subscribed => ctx.write_all(b"subscribed"),
            Self::Subtree(mailboxes) => {
                ctx.write_all(b"subtree ")?;
                encode_one_or_more_mailbox(mailboxes, ctx)
            }
            Self::Mailboxes(mailboxes) => {
                ctx.write_all(b"mailboxes ")?;
                encode_one_or_more_mailbox(mailboxes, ctx)
            }
        }
    }
}

fn encode_one_or_more_mailbox(
    mailboxes: &Vec1<Mailbox>,
    ctx: &mut EncodeContext,
) -> std::io::Result<()> {
    if mailboxes.len() == 1 {
        mailboxes.as_ref()[0].encode_ctx(ctx)
    } else {
        ctx.write_all(b"(")?;
        join_serializable(mailboxes.as_ref(), b" ", ctx)?;
        ctx.write_all(b")")
    }
}

impl EncodeIntoContext for SearchReturnOption {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Min => ctx.write_all(b"MIN"),
            Self::Max => ctx.write_all(b"MAX"),
            Self::All => ctx.write_all(b"ALL"),
            Self::Count => ctx.write_all(b"COUNT"),
            Self::Save => ctx.write_all(b"SAVE"),
        }
    }
}

impl EncodeIntoContext for SearchReturnData {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Min(min) => {
                ctx.write_all(b"MIN ")?;
                min.encode_ctx(ctx)
            }
            Self::Max(max) => {
                ctx.write_all(b"MAX ")?;
                max.encode_ctx(ctx)
            }
            Self::All(sequence_set) => {
                ctx.write_all(b"ALL ")?;
                sequence_set.encode_ctx(ctx)
            }
            Self::Count(count) => {
                ctx.write_all(b"COUNT ")?;
                count.encode_ctx(ctx)
            }
            Self::ModSeq(mod_seq) => {
                ctx.write_all(b"MODSEQ ")?;
                mod_seq.encode_ctx(ctx)
            }
        }
    }
}

// ----- Fetch -------------------------------------------------------------------------------------

impl EncodeIntoContext for Macro {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Macro::All => ctx.write_all(b"ALL"),
            Macro::Fast => ctx.write_all(b"FAST"),
            Macro::Full => ctx.write_all(b"FULL"),
        }
    }
}

impl<'a> EncodeIntoContext for MacroOrMessageDataItemNames<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Macro(m) => m.encode_ctx(ctx),
            Self::MessageDataItemNames(item_names) => {
                if item_names.len() == 1 {
                    item_names[0].encode_ctx(ctx)
                } else {
                    ctx.write_all(b"(")?;
                    join_serializable(item_names.as_slice(), b" ", ctx)?;
                    ctx.write_all(b")")
                }
            }
        }
    }
}

impl<'a> EncodeIntoContext for MessageDataItemName<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Body => ctx.write_all(b"BODY"),
            Self::BodyExt {
                section,
                partial,
                peek,
            } => {
                if *peek {
                    ctx.write_all(b"BODY.PEEK[")?;
                } else {
                    ctx.write_all(b"BODY[")?;
                }
                if let Some(section) = section {
                    section.encode_ctx(ctx)?;
                }
                ctx.write_all(b"]")?;
                if let Some((a, b)) = partial {
                    write!(ctx, "<{a}.{b}>")?;
                }

                Ok(())
            }
            Self::BodyStructure => ctx.write_all(b"BODYSTRUCTURE"),
            Self::Envelope => ctx.write_all(b"ENVELOPE"),
            Self::Flags => ctx.write_all(b"FLAGS"),
            Self::InternalDate => ctx.write_all(b"INTERNALDATE"),
            Self::Rfc822 => ctx.write_all(b"RFC822"),
            Self::Rfc822Header => ctx.write_all(b"RFC822.HEADER"),
            Self::Rfc822Size => ctx.write_all(b"RFC822.SIZE"),
            Self::Rfc822Text => ctx.write_all(b"RFC822.TEXT"),
            Self::Uid => ctx.write_all(b"UID"),
            Self::Binary {
                section,
                partial,
                peek,
            } => {
                if *peek {
                    ctx.write_all(b"BINARY.PEEK[")?;
                } else {
                    ctx.write_all(b"BINARY[")?;
                }
                if let Some(section) = section {
                    join_serializable(section.0.as_ref(), b".", ctx)?;
                }
                ctx.write_all(b"]")?;
                if let Some((a, b)) = partial {
                    write!(ctx, "<{a}.{b}>")?;
                }

                Ok(())
            }
            Self::BinarySize { section } => {
                ctx.write_all(b"BINARY.SIZE[")?;
                if let Some(section) = section {
                    join_serializable(section.0.as_ref(), b".", ctx)?;
                }
                ctx.write_all(b"]")
            }
            Self::ModSeq => ctx.write_all(b"MODSEQ"),
        }
    }
}

impl<'a> EncodeIntoContext for MessageDataItem<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Body(body) => {
                ctx.write_all(b"BODY ")?;
                body.encode_ctx(ctx)
            }
            Self::BodyExt {
                section,
                origin,
                data,
            } => {
                ctx.write_all(b"BODY[")?;
                if let Some(section) = section {
                    section.encode_ctx(ctx)?;
                }
                ctx.write_all(b"]")?;
                if let Some(origin) = origin {
                    write!(ctx, "<{origin}>")?;
                }
                ctx.write_all(b" ")?;
                data.encode_ctx(ctx)
            }
            Self::BodyStructure(body) => {
                ctx.write_all(b"BODYSTRUCTURE ")?;
                body.encode_ctx(ctx)
            }
            Self::Envelope(envelope) => {
                ctx.write_all(b"ENVELOPE ")?;
                envelope.encode_ctx(ctx)
            }
            Self::Flags(flags) => {
                ctx.write_all(b"FLAGS (")?;
                join_serializable(flags, b" ", ctx)?;
                ctx.write_all(b")")
            }
            Self::InternalDate(datetime) => {
                ctx.write_all(b"INTERNALDATE ")?;
                datetime.encode_ctx(ctx)
            }
            Self::Rfc822(nstring) => {
                ctx.write_all(b"RFC822 ")?;
                nstring.encode_ctx(ctx)
            }
            Self::Rfc822Header(nstring) => {
                ctx.write_all(b"RFC822.HEADER ")?;
                nstring.encode_ctx(ctx)
            }
            Self::Rfc822Size(size) => {
                ctx.write_all(b"RFC822.SIZE ")?;
                size.encode_ctx(ctx)
            }
            Self::Rfc822Text(nstring) => {
                ctx.write_all(b"RFC822.TEXT ")?;
                nstring.encode_ctx(ctx)
            }
            Self::Uid(uid) => {
                ctx.write_all(b"UID ")?;
                uid.encode_ctx(ctx)
            }
            Self::Binary { section, value } => {
                ctx.write_all(b"BINARY[")?;
                if let Some(section) = section {
                    join_serializable(section.0.as_ref(), b".", ctx)?;
                }
                ctx.write_all(b"] ")?;
                value.encode_ctx(ctx)
            }
            Self::BinarySize { section, size } => {
                ctx.write_all(b"BINARY.SIZE[")?;
                if let Some(section) = section {
                    join_serializable(section.0.as_ref(), b".", ctx)?;
                }
                ctx.write_all(b"] ")?;
                size.encode_ctx(ctx)
            }
            Self::ModSeq(mod_seq) => {
                ctx.write_all(b"MODSEQ (")?;
                mod_seq.encode_ctx(ctx)?;
                ctx.write_all(b")")
            }
        }
    }
}

impl<'a> EncodeIntoContext for Section<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Section::Part(part) => part.encode_ctx(ctx),
            Section::Header(maybe_part) => {
                if let Some(part) = maybe_part {
                    part.encode_ctx(ctx)?;
                    ctx.write_all(b".")?;
                }
                ctx.write_all(b"HEADER")
            }
            Section::HeaderFields(maybe_part, header_list) => {
                if let Some(part) = maybe_part {
                    part.encode_ctx(ctx)?;
                    ctx.write_all(b".")?;
                }
                ctx.write_all(b"HEADER.FIELDS (")?;
                join_serializable(header_list.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")
            }
            Section::HeaderFieldsNot(maybe_part, header_list) => {
                if let Some(part) = maybe_part {
                    part.encode_ctx(ctx)?;
                    ctx.write_all(b".")?;
                }
                ctx.write_all(b"HEADER.FIELDS.NOT (")?;
                join_serializable(header_list.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")
            }
            Section::Text(maybe_part) => {
                if let Some(part) = maybe_part {
                    part.encode_ctx(ctx)?;
                    ctx.write_all(b".")?;
                }
                ctx.write_all(b"TEXT")
            }
            Section::Mime(part) => {
                part.encode_ctx(ctx)?;
                ctx.write_all(b".MIME")
            }
        }
    }
}

impl EncodeIntoContext for Part {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        join_serializable(self.0.as_ref(), b".", ctx)
    }
}

// ----- Envelope & Body ---------------------------------------------------------------------------

impl<'a> EncodeIntoContext for Envelope<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"(")?;
        self.date.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.subject.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        List1OrNil(&self.from, b"").encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        List1OrNil(&self.sender, b"").encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        List1OrNil(&self.reply_to, b"").encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        List1OrNil(&self.to, b"").encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        List1OrNil(&self.cc, b"").encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        List1OrNil(&self.bcc, b"").encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.in_reply_to.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.message_id.encode_ctx(ctx)?;
        ctx.write_all(b")")
    }
}

impl<'a> EncodeIntoContext for Address<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"(")?;
        self.name.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.adl.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.mailbox.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.host.encode_ctx(ctx)?;
        ctx.write_all(b")")
    }
}

impl<'a> EncodeIntoContext for BodyStructure<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"(")?;
        match self {
            BodyStructure::Single {
                body,
                extension_data: extension,
            } => {
                body.encode_ctx(ctx)?;
                if let Some(extension) = extension {
                    ctx.write_all(b" ")?;
                    extension.encode_ctx(ctx)?;
                }
            }
            BodyStructure::Multi {
                bodies,
                subtype,
                extension_data,
            } => {
                for body in bodies {
                    body.encode_ctx(ctx)?;
                }
                ctx.write_all(b" ")?;
                subtype.encode_ctx(ctx)?;

                if let Some(extension) = extension_data {
                    ctx.write_all(b" ")?;
                    extension.encode_ctx(ctx)?;
                }
            }
        }
        ctx.write_all(b")")
    }
}

impl<'a> EncodeIntoContext for Body<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self.specific {
            SpecificFields::Basic {
                ref r#type,
                ref subtype,
            } => {
                r#type.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                subtype.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                self.basic.encode_ctx(ctx)
            }
            SpecificFields::Message {
                ref envelope,
                ref body_structure,
                number_of_lines,
            } => {
                ctx.write_all(b"\"MESSAGE\" \"RFC822\" ")?;
                self.basic.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                envelope.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                body_structure.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                number_of_lines.encode_ctx(ctx)
            }
            SpecificFields::Text {
                ref subtype,
                number_of_lines,
            } => {
                ctx.write_all(b"\"TEXT\" ")?;
                subtype.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                self.basic.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                number_of_lines.encode_ctx(ctx)
            }
        }
    }
}

impl<'a> EncodeIntoContext for BasicFields<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        List1AttributeValueOrNil(&self.parameter_list).encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.id.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.description.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.content_transfer_encoding.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.size.encode_ctx(ctx)
    }
}

impl<'a> EncodeIntoContext for SinglePartExtensionData<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.md5.encode_ctx(ctx)?;

        if let Some(disposition) = &self.tail {
            ctx.write_all(b" ")?;
            disposition.encode_ctx(ctx)?;
        }

        Ok(())
    }
}

impl<'a> EncodeIntoContext for MultiPartExtensionData<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        List1AttributeValueOrNil(&self.parameter_list).encode_ctx(ctx)?;

        if let Some(disposition) = &self.tail {
            ctx.write_all(b" ")?;
            disposition.encode_ctx(ctx)?;
        }

        Ok(())
    }
}

impl<'a> EncodeIntoContext for Disposition<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match &self.disposition {
            Some((s, param)) => {
                ctx.write_all(b"(")?;
                s.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                List1AttributeValueOrNil(param).encode_ctx(ctx)?;
                ctx.write_all(b")")?;
            }
            None => ctx.write_all(b"NIL")?,
        }

        if let Some(language) = &self.tail {
            ctx.write_all(b" ")?;
            language.encode_ctx(ctx)?;
        }

        Ok(())
    }
}

impl<'a> EncodeIntoContext for Language<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        List1OrNil(&self.language, b" ").encode_ctx(ctx)?;

        if let Some(location) = &self.tail {
            ctx.write_all(b" ")?;
            location.encode_ctx(ctx)?;
        }

        Ok(())
    }
}

impl<'a> EncodeIntoContext for Location<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.location.encode_ctx(ctx)?;

        for body_extension in &self.extensions {
            ctx.write_all(b" ")?;
            body_extension.encode_ctx(ctx)?;
        }

        Ok(())
    }
}

impl<'a> EncodeIntoContext for BodyExtension<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            BodyExtension::NString(nstring) => nstring.encode_ctx(ctx),
            BodyExtension::Number(number) => number.encode_ctx(ctx),
            BodyExtension::List(list) => {
                ctx.write_all(b"(")?;
                join_serializable(list.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")
            }
        }
    }
}

// ----- Auth --------------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for AuthMechanism<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "{}", self)
    }
}

impl<'a> EncodeIntoContext for AuthenticateData<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Continue(data) => {
                let encoded = base64.encode(data.declassify());
                ctx.write_all(encoded.as_bytes())?;
                ctx.write_all(b"\r\n")
            }
            Self::Cancel => ctx.write_all(b"*\r\n"),
        }
    }
}

impl EncodeIntoContext for IdleDone {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"DONE\r\n")
    }
}

// ----- Status items ------------------------------------------------------------------------------

impl EncodeIntoContext for StatusDataItemName {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Messages => ctx.write_all(b"MESSAGES"),
            Self::Recent => ctx.write_all(b"RECENT"),
            Self::UidNext => ctx.write_all(b"UIDNEXT"),
            Self::UidValidity => ctx.write_all(b"UIDVALIDITY"),
            Self::Unseen => ctx.write_all(b"UNSEEN"),
            Self::Size => ctx.write_all(b"SIZE"),
            Self::HighestModSeq => ctx.write_all(b"HIGHESTMODSEQ"),
        }
    }
}

impl EncodeIntoContext for StatusDataItem {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Messages(count) => {
                ctx.write_all(b"MESSAGES ")?;
                count.encode_ctx(ctx)
            }
            Self::Recent(count) => {
                ctx.write_all(b"RECENT ")?;
                count.encode_ctx(ctx)
            }
            Self::UidNext(next) => {
                ctx.write_all(b"UIDNEXT ")?;
                next.encode_ctx(ctx)
            }
            Self::UidValidity(identifier) => {
                ctx.write_all(b"UIDVALIDITY ")?;
                identifier.encode_ctx(ctx)
            }
            Self::Unseen(count) => {
                ctx.write_all(b"UNSEEN ")?;
                count.encode_ctx(ctx)
            }
            Self::Size(size) => {
                ctx.write_all(b"SIZE ")?;
                size.encode_ctx(ctx)
            }
            Self::HighestModSeq(mod_seq) => {
                ctx.write_all(b"HIGHESTMODSEQ ")?;
                mod_seq.encode_ctx(ctx)
            }
        }
    }
}

// ----- Extensions --------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for CapabilityEnable<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "{}", self)
    }
}

impl<'a> EncodeIntoContext for Resource<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "{}", self)
    }
}

impl<'a> EncodeIntoContext for QuotaGet<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.resource.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.usage.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.limit.encode_ctx(ctx)
    }
}

impl<'a> EncodeIntoContext for QuotaSet<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.resource.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.limit.encode_ctx(ctx)
    }
}

impl<'a> EncodeIntoContext for Rights<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.0.encode_ctx(ctx)
    }
}

impl<'a> EncodeIntoContext for ModRights<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self.mode {
            ModRightsMode::Add => ctx.write_all(b"+")?,
            ModRightsMode::Remove => ctx.write_all(b"-")?,
            ModRightsMode::Replace => {}
        }

        self.rights.encode_ctx(ctx)
    }
}

impl<'a> EncodeIntoContext for AclEntry<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.identifier.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.rights.encode_ctx(ctx)
    }
}

impl<'a> EncodeIntoContext for Entry<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.0.encode_ctx(ctx)
    }
}

impl<'a> EncodeIntoContext for EntryValue<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.entry.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.value.encode_ctx(ctx)
    }
}

impl EncodeIntoContext for GetMetadataOption {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::MaxSize(size) => {
                ctx.write_all(b"MAXSIZE ")?;
                size.encode_ctx(ctx)
            }
            Self::Depth(depth) => {
                ctx.write_all(b"DEPTH ")?;
                depth.encode_ctx(ctx)
            }
        }
    }
}

impl EncodeIntoContext for MetadataDepth {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Null => ctx.write_all(b"0"),
            Self::One => ctx.write_all(b"1"),
            Self::Infinity => ctx.write_all(b"infinity"),
        }
    }
}

impl EncodeIntoContext for MetadataCode {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"METADATA ")?;

        match self {
            Self::LongEntries(number) => {
                ctx.write_all(b"LONGENTRIES ")?;
                number.encode_ctx(ctx)
            }
            Self::MaxSize(number) => {
                ctx.write_all(b"MAXSIZE ")?;
                number.encode_ctx(ctx)
            }
            Self::TooMany => ctx.write_all(b"TOOMANY"),
            Self::NoPrivate => ctx.write_all(b"NOPRIVATE"),
        }
    }
}

impl<'a> EncodeIntoContext for MetadataResponse<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::WithValues(entry_values) => {
                ctx.write_all(b"(")?;
                join_serializable(entry_values.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")
            }
            Self::WithoutValues(entries) => join_serializable(entries.as_ref(), b" ", ctx),
        }
    }
}

impl<'a> EncodeIntoContext for NamespaceDescr<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"(")?;
        self.prefix.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;

        match &self.delimiter {
            Some(delimiter) => delimiter.encode_ctx(ctx)?,
            None => ctx.write_all(b"NIL")?,
        }

        ctx.write_all(b")")
    }
}

impl<'a> EncodeIntoContext for UrlMechanism<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "{}", self)
    }
}

impl<'a> EncodeIntoContext for UrlAuthItem<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        self.url.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;
        self.mechanism.encode_ctx(ctx)
    }
}

// ----- Response ----------------------------------------------------------------------------------

impl<'a> EncodeIntoContext for Response<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Response::Status(status) => status.encode_ctx(ctx),
            Response::Data(data) => data.encode_ctx(ctx),
            Response::CommandContinuationRequest(continue_request) => {
                continue_request.encode_ctx(ctx)
            }
        }
    }
}

impl<'a> EncodeIntoContext for Greeting<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"* ")?;
        self.kind.encode_ctx(ctx)?;
        ctx.write_all(b" ")?;

        if let Some(code) = &self.code {
            ctx.write_all(b"[")?;
            code.encode_ctx(ctx)?;
            ctx.write_all(b"] ")?;
        }

        self.text.encode_ctx(ctx)?;
        ctx.write_all(b"\r\n")
    }
}

impl EncodeIntoContext for GreetingKind {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            GreetingKind::Ok => ctx.write_all(b"OK"),
            GreetingKind::PreAuth => ctx.write_all(b"PREAUTH"),
            GreetingKind::Bye => ctx.write_all(b"BYE"),
        }
    }
}

impl<'a> EncodeIntoContext for Status<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        fn format_status_body(ctx: &mut EncodeContext, body: &StatusBody) -> std::io::Result<()> {
            match body.kind {
                StatusKind::Ok => ctx.write_all(b"OK ")?,
                StatusKind::No => ctx.write_all(b"NO ")?,
                StatusKind::Bad => ctx.write_all(b"BAD ")?,
            }

            if let Some(code) = &body.code {
                ctx.write_all(b"[")?;
                code.encode_ctx(ctx)?;
                ctx.write_all(b"] ")?;
            }

            body.text.encode_ctx(ctx)
        }

        match self {
            Self::Untagged(body) => {
                ctx.write_all(b"* ")?;
                format_status_body(ctx, body)?;
                ctx.write_all(b"\r\n")
            }
            Self::Tagged(Tagged { tag, body }) => {
                tag.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                format_status_body(ctx, body)?;
                ctx.write_all(b"\r\n")
            }
            Self::Bye(Bye { code, text }) => {
                ctx.write_all(b"* BYE ")?;

                if let Some(code) = code {
                    ctx.write_all(b"[")?;
                    code.encode_ctx(ctx)?;
                    ctx.write_all(b"] ")?;
                }

                text.encode_ctx(ctx)?;
                ctx.write_all(b"\r\n")
            }
        }
    }
}

impl<'a> EncodeIntoContext for Code<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Code::Alert => ctx.write_all(b"ALERT"),
            Code::BadCharset { allowed } => {
                ctx.write_all(b"BADCHARSET")?;
                if !allowed.is_empty() {
                    ctx.write_all(b" (")?;
                    join_serializable(allowed, b" ", ctx)?;
                    ctx.write_all(b")")?;
                }
                Ok(())
            }
            Code::Capability(caps) => {
                ctx.write_all(b"CAPABILITY ")?;
                join_serializable(caps.as_ref(), b" ", ctx)
            }
            Code::Parse => ctx.write_all(b"PARSE"),
            Code::PermanentFlags(flags) => {
                ctx.write_all(b"PERMANENTFLAGS (")?;
                join_serializable(flags, b" ", ctx)?;
                ctx.write_all(b")")
            }
            Code::ReadOnly => ctx.write_all(b"READ-ONLY"),
            Code::ReadWrite => ctx.write_all(b"READ-WRITE"),
            Code::TryCreate => ctx.write_all(b"TRYCREATE"),
            Code::UidNext(next) => {
                ctx.write_all(b"UIDNEXT ")?;
                next.encode_ctx(ctx)
            }
            Code::UidValidity(validity) => {
                ctx.write_all(b"UIDVALIDITY ")?;
                validity.encode_ctx(ctx)
            }
            Code::Unseen(unseen) => {
                ctx.write_all(b"UNSEEN ")?;
                unseen.encode_ctx(ctx)
            }
            Code::AppendUid { uid_validity, uid } => {
                ctx.write_all(b"APPENDUID ")?;
                uid_validity.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                uid.encode_ctx(ctx)
            }
            Code::CopyUid {
                uid_validity,
                source,
                destination,
            } => {
                ctx.write_all(b"COPYUID ")?;
                uid_validity.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                source.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                destination.encode_ctx(ctx)
            }
            Code::UidNotSticky => ctx.write_all(b"UIDNOTSTICKY"),
            Code::HighestModSeq(mod_seq) => {
                ctx.write_all(b"HIGHESTMODSEQ ")?;
                mod_seq.encode_ctx(ctx)
            }
            Code::NoModSeq => ctx.write_all(b"NOMODSEQ"),
            Code::Modified(sequence_set) => {
                ctx.write_all(b"MODIFIED ")?;
                sequence_set.encode_ctx(ctx)
            }
            Code::Closed => ctx.write_all(b"CLOSED"),
            Code::NotSaved => ctx.write_all(b"NOTSAVED"),
            Code::Metadata(code) => code.encode_ctx(ctx),
            Code::UnknownCte => ctx.write_all(b"UNKNOWN-CTE"),
            Code::TooBig => ctx.write_all(b"TOOBIG"),
            Code::OverQuota => ctx.write_all(b"OVERQUOTA"),
            Code::Other(unknown) => unknown.encode_ctx(ctx),
        }
    }
}

impl<'a> EncodeIntoContext for CodeOther<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(self.inner())
    }
}

impl<'a> EncodeIntoContext for Capability<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        write!(ctx, "{}", self)
    }
}

impl<'a> EncodeIntoContext for Data<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Data::Capability(caps) => {
                ctx.write_all(b"* CAPABILITY ")?;
                join_serializable(caps.as_ref(), b" ", ctx)?;
            }
            Data::List {
                items,
                delimiter,
                mailbox,
            } => {
                ctx.write_all(b"* LIST (")?;
                join_serializable(items, b" ", ctx)?;
                ctx.write_all(b") ")?;

                match delimiter {
                    Some(delimiter) => delimiter.encode_ctx(ctx)?,
                    None => ctx.write_all(b"NIL")?,
                }

                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)?;
            }
            Data::Lsub {
                items,
                delimiter,
                mailbox,
            } => {
                ctx.write_all(b"* LSUB (")?;
                join_serializable(items, b" ", ctx)?;
                ctx.write_all(b") ")?;

                match delimiter {
                    Some(delimiter) => delimiter.encode_ctx(ctx)?,
                    None => ctx.write_all(b"NIL")?,
                }

                ctx.write_all(b" ")?;
                mailbox.encode_ctx(ctx)?;
            }
            Data::Status { mailbox, items } => {
                ctx.write_all(b"* STATUS ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" (")?;
                join_serializable(items, b" ", ctx)?;
                ctx.write_all(b")")?;
            }
            Data::Search { seqs, mod_seq } => {
                if seqs.is_empty() {
                    ctx.write_all(b"* SEARCH")?;
                } else {
                    ctx.write_all(b"* SEARCH ")?;
                    join_serializable(seqs, b" ", ctx)?;
                }

                if let Some(mod_seq) = mod_seq {
                    ctx.write_all(b" (MODSEQ ")?;
                    mod_seq.encode_ctx(ctx)?;
                    ctx.write_all(b")")?;
                }
            }
            Data::ESearch(esearch) => {
                esearch.encode_ctx(ctx)?;
            }
            Data::Flags(flags) => {
                ctx.write_all(b"* FLAGS (")?;
                join_serializable(flags, b" ", ctx)?;
                ctx.write_all(b")")?;
            }
            Data::Exists(count) => {
                write!(ctx, "* {count} EXISTS")?;
            }
            Data::Recent(count) => {
                write!(ctx, "* {count} RECENT")?;
            }
            Data::Expunge(msg) => {
                write!(ctx, "* {msg} EXPUNGE")?;
            }
            Data::Fetch { seq, items } => {
                write!(ctx, "* {seq} FETCH (")?;
                join_serializable(items.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")?;
            }
            Data::Enabled { capabilities } => {
                write!(ctx, "* ENABLED")?;

                for cap in capabilities {
                    ctx.write_all(b" ")?;
                    cap.encode_ctx(ctx)?;
                }
            }
            Data::Vanished { earlier, uids } => {
                if *earlier {
                    ctx.write_all(b"* VANISHED (EARLIER) ")?;
                } else {
                    ctx.write_all(b"* VANISHED ")?;
                }
                uids.encode_ctx(ctx)?;
            }
            Data::Namespace {
                personal,
                other,
                shared,
            } => {
                ctx.write_all(b"* NAMESPACE ")?;
                encode_namespace(personal, ctx)?;
                ctx.write_all(b" ")?;
                encode_namespace(other, ctx)?;
                ctx.write_all(b" ")?;
                encode_namespace(shared, ctx)?;
            }
            Data::Quota { root, quotas } => {
                ctx.write_all(b"* QUOTA ")?;
                root.encode_ctx(ctx)?;
                ctx.write_all(b" (")?;
                join_serializable(quotas.as_ref(), b" ", ctx)?;
                ctx.write_all(b")")?;
            }
            Data::QuotaRoot { mailbox, roots } => {
                ctx.write_all(b"* QUOTAROOT ")?;
                mailbox.encode_ctx(ctx)?;

                for root in roots {
                    ctx.write_all(b" ")?;
                    root.encode_ctx(ctx)?;
                }
            }
            Data::Acl { mailbox, entries } => {
                ctx.write_all(b"* ACL ")?;
                mailbox.encode_ctx(ctx)?;

                for entry in entries {
                    ctx.write_all(b" ")?;
                    entry.encode_ctx(ctx)?;
                }
            }
            Data::ListRights {
                mailbox,
                identifier,
                required,
                optional,
            } => {
                ctx.write_all(b"* LISTRIGHTS ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                identifier.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                required.encode_ctx(ctx)?;

                for rights in optional {
                    ctx.write_all(b" ")?;
                    rights.encode_ctx(ctx)?;
                }
            }
            Data::MyRights { mailbox, rights } => {
                ctx.write_all(b"* MYRIGHTS ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                rights.encode_ctx(ctx)?;
            }
            Data::Metadata { mailbox, items } => {
                ctx.write_all(b"* METADATA ")?;
                mailbox.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                items.encode_ctx(ctx)?;
            }
            Data::GenUrlAuth(urls) => {
                ctx.write_all(b"* GENURLAUTH ")?;
                join_serializable(urls.as_ref(), b" ", ctx)?;
            }
            Data::UrlFetch(items) => {
                ctx.write_all(b"* URLFETCH")?;

                for (url, data) in items {
                    ctx.write_all(b" ")?;
                    url.encode_ctx(ctx)?;
                    ctx.write_all(b" ")?;
                    data.encode_ctx(ctx)?;
                }
            }
            Data::Id { parameters } => {
                ctx.write_all(b"* ID ")?;

                match parameters {
                    Some(parameters) => {
                        if let Some((first, tail)) = parameters.split_first() {
                            ctx.write_all(b"(")?;

                            first.0.encode_ctx(ctx)?;
                            ctx.write_all(b" ")?;
                            first.1.encode_ctx(ctx)?;

                            for parameter in tail {
                                ctx.write_all(b" ")?;
                                parameter.0.encode_ctx(ctx)?;
                                ctx.write_all(b" ")?;
                                parameter.1.encode_ctx(ctx)?;
                            }

                            ctx.write_all(b")")?;
                        } else {
                            ctx.write_all(b"()")?;
                        }
                    }
                    None => ctx.write_all(b"NIL")?,
                }
            }
        }

        ctx.write_all(b"\r\n")
    }
}

fn encode_namespace(
    namespace: &Option<Vec1<NamespaceDescr>>,
    ctx: &mut EncodeContext,
) -> std::io::Result<()> {
    match namespace {
        Some(descrs) => {
            ctx.write_all(b"(")?;
            for descr in descrs {
                descr.encode_ctx(ctx)?;
            }
            ctx.write_all(b")")
        }
        None => ctx.write_all(b"NIL"),
    }
}

impl<'a> EncodeIntoContext for ESearchResponse<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        ctx.write_all(b"* ESEARCH")?;

        if let Some(correlator) = &self.correlator {
            ctx.write_all(b" (TAG \"")?;
            correlator.encode_ctx(ctx)?;
            ctx.write_all(b"\")")?;
        }

        if self.uid {
            ctx.write_all(b" UID")?;
        }

        for data in &self.data {
            ctx.write_all(b" ")?;
            data.encode_ctx(ctx)?;
        }

        Ok(())
    }
}

impl<'a> EncodeIntoContext for CommandContinuationRequest<'a> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        match self {
            Self::Basic { code, text } => {
                ctx.write_all(b"+ ")?;

                if let Some(code) = code {
                    ctx.write_all(b"[")?;
                    code.encode_ctx(ctx)?;
                    ctx.write_all(b"] ")?;
                }

                text.encode_ctx(ctx)?;
                ctx.write_all(b"\r\n")
            }
            Self::Base64(data) => {
                ctx.write_all(base64.encode(data).as_bytes())?;
                ctx.write_all(b"\r\n")
            }
        }
    }
}

// ----- Helpers -----------------------------------------------------------------------------------

pub(crate) fn join_serializable<I: EncodeIntoContext>(
    elements: &[I],
    sep: &[u8],
    ctx: &mut EncodeContext,
) -> std::io::Result<()> {
    if let Some((last, head)) = elements.split_last() {
        for item in head {
            item.encode_ctx(ctx)?;
            ctx.write_all(sep)?;
        }

        last.encode_ctx(ctx)
    } else {
        Ok(())
    }
}

/// A parenthesized non-empty list, or `NIL` when empty.
pub(crate) struct List1OrNil<'a, T>(pub(crate) &'a Vec<T>, pub(crate) &'a [u8]);

impl<'a, T> EncodeIntoContext for List1OrNil<'a, T>
where
    T: EncodeIntoContext,
{
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        if let Some((last, head)) = self.0.split_last() {
            ctx.write_all(b"(")?;

            for item in head {
                item.encode_ctx(ctx)?;
                ctx.write_all(self.1)?;
            }

            last.encode_ctx(ctx)?;

            ctx.write_all(b")")
        } else {
            ctx.write_all(b"NIL")
        }
    }
}

/// A parenthesized non-empty list of attribute/value pairs, or `NIL` when empty.
pub(crate) struct List1AttributeValueOrNil<'a, T>(pub(crate) &'a Vec<(T, T)>);

impl<'a, T> EncodeIntoContext for List1AttributeValueOrNil<'a, T>
where
    T: EncodeIntoContext,
{
    fn encode_ctx(&self, ctx: &mut EncodeContext) -> std::io::Result<()> {
        if let Some(((last_attribute, last_value), head)) = self.0.split_last() {
            ctx.write_all(b"(")?;

            for (attribute, value) in head {
                attribute.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
                value.encode_ctx(ctx)?;
                ctx.write_all(b" ")?;
            }

            last_attribute.encode_ctx(ctx)?;
            ctx.write_all(b" ")?;
            last_value.encode_ctx(ctx)?;

            ctx.write_all(b")")
        } else {
            ctx.write_all(b"NIL")
        }
    }
}
