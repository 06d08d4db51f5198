//! Incremental decoding of the client side of a connection.

#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::streaming::sp;
use bytes::{Buf, BytesMut};
use imap_stream_types::{
    auth::AuthenticateData,
    command::{Command, CommandBody},
    core::{LiteralMode, Tag},
    datetime::DateTime,
    extensions::idle::IdleDone,
    flag::Flag,
    mailbox::Mailbox,
};
use nom::{
    bytes::streaming::tag_no_case,
    combinator::{opt, recognize},
    sequence::{preceded, terminated, tuple},
};

use crate::{
    auth::authenticate_data,
    command::command,
    core::{literal_header, tag_imap},
    datetime::date_time,
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    extensions::idle::idle_done,
    flag::flag_list,
    mailbox::mailbox,
    scanner::LiteralScanner,
    stream::{StreamError, DEFAULT_BUFFER_LIMIT},
};

/// One event of the decoded command stream.
#[derive(Debug)]
pub enum CommandEvent<'a> {
    /// A synchronizing literal was announced; the server must send a
    /// command continuation request (`+ ...`) before the client will
    /// transmit the announced bytes.
    ///
    /// One event is emitted per outstanding literal, before any decoding
    /// of the affected command is attempted. The text of the continuation
    /// line is up to the caller.
    ContinuationRequest,

    /// One complete command.
    ///
    /// APPEND and the IDLE `DONE` line never show up here; they are
    /// streamed through the events below.
    Command(Command<'a>),

    /// An APPEND begins.
    AppendStart {
        tag: Tag<'a>,
        mailbox: Mailbox<'a>,
    },

    /// One message of the APPEND begins; `length` bytes follow.
    AppendMessageBegin {
        flags: Vec<Flag<'a>>,
        date: Option<DateTime>,
        length: u32,
        mode: LiteralMode,
        /// Whether the client used a binary literal (`~{n}`, RFC 3516).
        binary: bool,
    },

    /// A chunk of the current APPEND message.
    ///
    /// Bytes are forwarded as they arrive; the message is never buffered
    /// in full.
    AppendMessageBytes(&'a [u8]),

    /// The current APPEND message is complete.
    AppendMessageEnd,

    /// The APPEND is complete (the final CRLF was consumed).
    AppendEnd,

    /// The `DONE` line ending an IDLE.
    IdleDone,

    /// A line of authentication data (see
    /// [`CommandStream::expect_authenticate_data`]).
    AuthenticateData(AuthenticateData<'a>),
}

/// The decoder state between two events.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    /// Expecting a command line.
    Command,
    /// Inside an APPEND, before a message or the terminating CRLF.
    AppendMessage,
    /// Inside an APPEND message body.
    AppendBytes { remaining: u32 },
    /// Expecting the `DONE` line of an IDLE.
    IdleDone,
    /// Expecting a line of authentication data.
    AuthenticateData,
}

/// Incremental decoder for client commands.
///
/// For each decode round the stream first consults the
/// [`LiteralScanner`]: every synchronizing literal the client announced is
/// answered with one [`CommandEvent::ContinuationRequest`] before parsing
/// is attempted — without the continuation the client will never send the
/// bytes the parser is waiting for. APPEND message bodies are forwarded
/// chunk by chunk; everything else is decoded as one value per command.
#[derive(Debug)]
pub struct CommandStream {
    buffer: BytesMut,
    /// Bytes already parsed, discarded on the next call.
    pending_discard: usize,
    scanner: LiteralScanner,
    /// How many continuation requests were already emitted for the
    /// literals the scanner counted.
    continuations_sent: usize,
    mode: Mode,
    buffer_limit: usize,
}

impl Default for CommandStream {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandStream {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            pending_discard: 0,
            scanner: LiteralScanner::new(),
            continuations_sent: 0,
            mode: Mode::Command,
            buffer_limit: DEFAULT_BUFFER_LIMIT,
        }
    }

    /// Use a lookahead bound other than
    /// [`DEFAULT_BUFFER_LIMIT`](crate::stream::DEFAULT_BUFFER_LIMIT).
    pub fn with_buffer_limit(buffer_limit: usize) -> Self {
        Self {
            buffer_limit,
            ..Self::new()
        }
    }

    /// Enqueue received bytes.
    pub fn enqueue_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Switch to decoding authentication data lines.
    ///
    /// Which lines are authentication data depends on the state of the
    /// AUTHENTICATE exchange, which only the caller knows; the stream
    /// returns to command decoding after each decoded line.
    pub fn expect_authenticate_data(&mut self) {
        debug_assert_eq!(self.mode, Mode::Command);
        self.mode = Mode::AuthenticateData;
    }

    /// Decode the next event.
    ///
    /// Returns `Ok(None)` when more bytes are needed. A returned event may
    /// borrow from the internal buffer and must be processed (or converted
    /// to an owned value) before the next call.
    pub fn progress(&mut self) -> Result<Option<CommandEvent<'_>>, StreamError> {
        if self.pending_discard > 0 {
            let dropped_marks = self.scanner.note_consumed(self.pending_discard);
            self.continuations_sent -= dropped_marks;
            self.buffer.advance(self.pending_discard);
            self.pending_discard = 0;
        }

        // One continuation request per synchronizing literal, before any
        // parsing: the remaining bytes of the command will not arrive
        // until the client saw the `+`.
        let framing = self.scanner.scan(&self.buffer);
        if self.continuations_sent < framing.sync_literals {
            self.continuations_sent += 1;
            return Ok(Some(CommandEvent::ContinuationRequest));
        }

        match self.mode {
            Mode::Command => {
                if self.buffer.is_empty() {
                    return Ok(None);
                }

                // APPEND is streamed; try its prefix first so the whole
                // message is never buffered.
                match append_start(&self.buffer[..]) {
                    Ok((remaining, (tag, mailbox))) => {
                        self.pending_discard = self.buffer.len() - remaining.len();
                        self.mode = Mode::AppendMessage;
                        return Ok(Some(CommandEvent::AppendStart { tag, mailbox }));
                    }
                    Err(nom::Err::Incomplete(_)) => return self.need_more(),
                    Err(nom::Err::Failure(IMAPParseError {
                        kind: IMAPErrorKind::Literal { .. },
                        ..
                    })) => return self.need_more(),
                    Err(_) => {}
                }

                let input = &self.buffer[..];

                match command(input) {
                    Ok((remaining, command)) => {
                        self.pending_discard = input.len() - remaining.len();

                        if matches!(command.body, CommandBody::Idle) {
                            self.mode = Mode::IdleDone;
                        }

                        Ok(Some(CommandEvent::Command(command)))
                    }
                    Err(error) => self.handle_error(error),
                }
            }
            Mode::AppendMessage => {
                // The terminating CRLF ends the APPEND ...
                match append_end(&self.buffer[..]) {
                    Ok((remaining, _)) => {
                        self.pending_discard = self.buffer.len() - remaining.len();
                        self.mode = Mode::Command;
                        return Ok(Some(CommandEvent::AppendEnd));
                    }
                    Err(nom::Err::Incomplete(_)) => return self.need_more(),
                    Err(_) => {}
                }

                // ... otherwise another message follows.
                let input = &self.buffer[..];

                match append_message_start(input) {
                    Ok((remaining, (flags, date, (length, mode, binary)))) => {
                        self.pending_discard = input.len() - remaining.len();
                        self.mode = Mode::AppendBytes { remaining: length };

                        Ok(Some(CommandEvent::AppendMessageBegin {
                            flags: flags.unwrap_or_default(),
                            date,
                            length,
                            mode,
                            binary,
                        }))
                    }
                    Err(error) => self.handle_error(error),
                }
            }
            Mode::AppendBytes { remaining } => {
                if remaining == 0 {
                    self.mode = Mode::AppendMessage;
                    return Ok(Some(CommandEvent::AppendMessageEnd));
                }

                if self.buffer.is_empty() {
                    return Ok(None);
                }

                let chunk_len = self.buffer.len().min(remaining as usize);
                self.pending_discard = chunk_len;
                self.mode = Mode::AppendBytes {
                    remaining: remaining - chunk_len as u32,
                };

                Ok(Some(CommandEvent::AppendMessageBytes(
                    &self.buffer[..chunk_len],
                )))
            }
            Mode::IdleDone => {
                let input = &self.buffer[..];

                match idle_done(input) {
                    Ok((remaining, IdleDone)) => {
                        self.pending_discard = input.len() - remaining.len();
                        self.mode = Mode::Command;
                        Ok(Some(CommandEvent::IdleDone))
                    }
                    Err(error) => self.handle_error(error),
                }
            }
            Mode::AuthenticateData => {
                let input = &self.buffer[..];

                match authenticate_data(input) {
                    Ok((remaining, data)) => {
                        self.pending_discard = input.len() - remaining.len();
                        self.mode = Mode::Command;
                        Ok(Some(CommandEvent::AuthenticateData(data)))
                    }
                    Err(error) => self.handle_error(error),
                }
            }
        }
    }

    /// The tag of the in-flight command, decoded on a best-effort basis.
    ///
    /// Useful to still answer `BAD` when the command itself is malformed
    /// or overlong.
    pub fn decode_tag(&self) -> Option<Tag> {
        terminated(tag_imap, sp)(&self.buffer[..])
            .ok()
            .map(|(_, tag)| tag)
    }

    fn handle_error<T>(
        &self,
        error: nom::Err<IMAPParseError<'_, &[u8]>>,
    ) -> Result<Option<T>, StreamError> {
        match error {
            nom::Err::Incomplete(_) => self.need_more(),
            nom::Err::Failure(IMAPParseError {
                kind: IMAPErrorKind::Literal { .. },
                ..
            }) => self.need_more(),
            nom::Err::Error(_) | nom::Err::Failure(_) => {
                Err(StreamError::violation(&self.buffer))
            }
        }
    }

    fn need_more<T>(&self) -> Result<Option<T>, StreamError> {
        // Literal bodies are exempt from the lookahead limit.
        let head_bytes = self.buffer.len() - self.scanner.literal_body_bytes(self.buffer.len());

        if head_bytes > self.buffer_limit {
            return Err(StreamError::ExcessiveLookahead {
                limit: self.buffer_limit,
            });
        }

        Ok(None)
    }
}

/// The CRLF terminating the APPEND command after its last message.
fn append_end(input: &[u8]) -> IMAPResult<&[u8], &[u8]> {
    recognize(crlf)(input)
}

/// `tag SP "APPEND" SP mailbox`
#[allow(clippy::type_complexity)]
fn append_start(input: &[u8]) -> IMAPResult<&[u8], (Tag, Mailbox)> {
    tuple((
        terminated(tag_imap, sp),
        preceded(tag_no_case(b"APPEND "), mailbox),
    ))(input)
}

/// `append-opts SP append-data` up to and including the literal
/// announcement (RFC 3502).
#[allow(clippy::type_complexity)]
fn append_message_start(
    input: &[u8],
) -> IMAPResult<&[u8], (Option<Vec<Flag>>, Option<DateTime>, (u32, LiteralMode, bool))> {
    tuple((
        opt(preceded(sp, flag_list)),
        opt(preceded(sp, date_time)),
        preceded(sp, literal_header),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_need_more(stream: &mut CommandStream) {
        assert!(stream.progress().unwrap().is_none());
    }

    #[test]
    fn test_simple_command() {
        let mut stream = CommandStream::new();
        stream.enqueue_bytes(b"a1 NOOP\r\n");

        match stream.progress().unwrap().unwrap() {
            CommandEvent::Command(command) => assert_eq!(command.name(), "NOOP"),
            other => panic!("unexpected event: {other:?}"),
        }

        assert_need_more(&mut stream);
    }

    #[test]
    fn test_sync_literal_handshake() {
        let mut stream = CommandStream::new();

        // First read: the announcement of the first literal.
        stream.enqueue_bytes(b"a2 LOGIN {4}\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::ContinuationRequest
        ));
        assert_need_more(&mut stream);

        // Second read: first body, second announcement, second body.
        stream.enqueue_bytes(b"user {4}\r\npass\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::ContinuationRequest
        ));

        match stream.progress().unwrap().unwrap() {
            CommandEvent::Command(command) => {
                assert_eq!(command.tag.inner(), "a2");
                match command.body {
                    CommandBody::Login { username, password } => {
                        assert_eq!(username.as_ref(), b"user");
                        assert_eq!(password.declassify().as_ref(), b"pass");
                    }
                    other => panic!("unexpected body: {other:?}"),
                }
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert_need_more(&mut stream);
    }

    #[test]
    fn test_non_sync_literal_needs_no_continuation() {
        let mut stream = CommandStream::new();
        stream.enqueue_bytes(b"a3 LOGIN {4+}\r\nuser {4+}\r\npass\r\n");

        match stream.progress().unwrap().unwrap() {
            CommandEvent::Command(command) => {
                assert_eq!(command.tag.inner(), "a3");
                assert!(matches!(command.body, CommandBody::Login { .. }));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert_need_more(&mut stream);
    }

    #[test]
    fn test_streamed_append() {
        let mut stream = CommandStream::new();
        stream.enqueue_bytes(b"a4 APPEND inbox (\\Seen) {5+}\r\nhello {3+}\r\nxyz\r\na5 NOOP\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendStart { mailbox: Mailbox::Inbox, .. }
        ));
        match stream.progress().unwrap().unwrap() {
            CommandEvent::AppendMessageBegin { flags, length, .. } => {
                assert_eq!(flags, vec![Flag::Seen]);
                assert_eq!(length, 5);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendMessageBytes(b"hello")
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendMessageEnd
        ));
        match stream.progress().unwrap().unwrap() {
            CommandEvent::AppendMessageBegin { flags, length, .. } => {
                assert!(flags.is_empty());
                assert_eq!(length, 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendMessageBytes(b"xyz")
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendMessageEnd
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendEnd
        ));

        // The pipelined NOOP follows.
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::Command(_)
        ));
    }

    #[test]
    fn test_append_with_sync_literal_prompts_continuation() {
        let mut stream = CommandStream::new();
        stream.enqueue_bytes(b"a6 APPEND inbox {5}\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::ContinuationRequest
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendStart { .. }
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendMessageBegin { length: 5, .. }
        ));
        assert_need_more(&mut stream);

        stream.enqueue_bytes(b"hello\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendMessageBytes(b"hello")
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendMessageEnd
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::AppendEnd
        ));
    }

    #[test]
    fn test_idle_done() {
        let mut stream = CommandStream::new();
        stream.enqueue_bytes(b"a7 IDLE\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::Command(Command {
                body: CommandBody::Idle,
                ..
            })
        ));

        // The DONE line follows (after the server's continuation).
        stream.enqueue_bytes(b"DONE\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::IdleDone
        ));
        assert_need_more(&mut stream);
    }

    #[test]
    fn test_authenticate_data_round() {
        let mut stream = CommandStream::new();
        stream.enqueue_bytes(b"a8 AUTHENTICATE PLAIN\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::Command(Command {
                body: CommandBody::Authenticate { .. },
                ..
            })
        ));

        stream.expect_authenticate_data();
        stream.enqueue_bytes(b"VGVzdA==\r\n");

        match stream.progress().unwrap().unwrap() {
            CommandEvent::AuthenticateData(AuthenticateData::Continue(data)) => {
                assert_eq!(data.declassify().as_ref(), b"Test");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_command_is_fatal_but_tag_is_recoverable() {
        let mut stream = CommandStream::new();
        stream.enqueue_bytes(b"a9 FROBNICATE now\r\n");

        assert_eq!(stream.decode_tag(), Some(Tag::try_from("a9").unwrap()));
        assert!(matches!(
            stream.progress(),
            Err(StreamError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn test_lookahead_limit_exempts_literal_bodies() {
        let mut stream = CommandStream::with_buffer_limit(64);

        // A 1024-byte literal body must not trip the 64-byte limit.
        stream.enqueue_bytes(b"b1 LOGIN {1024+}\r\n");
        stream.enqueue_bytes(&[b'x'; 1024]);

        // More bytes are needed (the password is still missing), but the
        // lookahead is fine.
        assert_need_more(&mut stream);

        stream.enqueue_bytes(b" pass\r\n");
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            CommandEvent::Command(Command {
                body: CommandBody::Login { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_lookahead_limit_applies_to_lines() {
        let mut stream = CommandStream::with_buffer_limit(32);
        stream.enqueue_bytes(&[b'x'; 64]);

        assert!(matches!(
            stream.progress(),
            Err(StreamError::ExcessiveLookahead { limit: 32 })
        ));
    }
}
