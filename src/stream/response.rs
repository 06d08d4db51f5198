//! Incremental decoding of the server side of a connection.

use std::num::NonZeroU32;

use abnf_core::streaming::sp;
#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use bytes::{Buf, BytesMut};
use imap_stream_types::{
    fetch::{MessageDataItem, Part, Section},
    response::{
        Bye, CommandContinuationRequest, Data, Greeting, Response, Status, StatusBody, Tagged,
    },
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, recognize},
    sequence::{delimited, tuple},
};

use crate::{
    core::{literal_header, number, nz_number},
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    extensions::binary::section_binary,
    fetch::{msg_att_dynamic, msg_att_static, section},
    response::{greeting, response},
    stream::{StreamError, DEFAULT_BUFFER_LIMIT},
};

/// One event of the decoded response stream.
///
/// A session starts with exactly one [`Greeting`](ResponseEvent::Greeting).
/// After that, events form *response groups*: a
/// [`ResponseBegin`](ResponseEvent::ResponseBegin), for FETCH payloads an
/// attribute sequence, and a closing
/// [`ResponseEnd`](ResponseEvent::ResponseEnd) whose payload is `None`. A
/// tagged completion (or a fatal BYE) is a bare `ResponseEnd` carrying
/// `Some(done)`.
#[derive(Debug)]
pub enum ResponseEvent<'a> {
    /// The one-and-only session greeting.
    Greeting(Greeting<'a>),

    /// A command continuation request (`+ ...`).
    ContinuationRequest(CommandContinuationRequest<'a>),

    /// An untagged response begins.
    ResponseBegin(UntaggedPayload<'a>),

    /// The `(` of a FETCH attribute list.
    AttributesStart,

    /// One fully parsed FETCH attribute.
    SimpleAttribute(MessageDataItem<'a>),

    /// A literal-valued FETCH attribute begins; `length` bytes follow.
    StreamingAttributeBegin {
        item: StreamingItem<'a>,
        length: u32,
    },

    /// A chunk of the current literal-valued attribute.
    ///
    /// Bytes are forwarded as they arrive; the attribute body is never
    /// buffered in full.
    StreamingAttributeBytes(&'a [u8]),

    /// The current literal-valued attribute is complete.
    StreamingAttributeEnd,

    /// The `)` closing a FETCH attribute list.
    AttributesFinish,

    /// A response ends.
    ///
    /// `None` closes the current untagged response group; `Some` is a
    /// terminal tagged completion or a fatal BYE.
    ResponseEnd(Option<ResponseDone<'a>>),
}

/// The payload opening an untagged response group.
#[derive(Debug)]
pub enum UntaggedPayload<'a> {
    /// An untagged condition, e.g., `* OK [UNSEEN 17] ...`.
    Status(StatusBody<'a>),

    /// Untagged data, fully parsed.
    Data(Data<'a>),

    /// `* <seq> FETCH` — the attributes follow as separate events.
    FetchBegin { seq: NonZeroU32 },
}

/// A terminal response.
#[derive(Debug)]
pub enum ResponseDone<'a> {
    /// The tagged completion of a command.
    Tagged(Tagged<'a>),

    /// The server is about to close the connection.
    Fatal(Bye<'a>),
}

/// The descriptor of a literal-valued FETCH attribute.
#[derive(Debug, Eq, PartialEq)]
pub enum StreamingItem<'a> {
    /// `RFC822`
    Rfc822,
    /// `RFC822.HEADER`
    Rfc822Header,
    /// `RFC822.TEXT`
    Rfc822Text,
    /// `BODY[<section>]<<origin>>`
    BodyExt {
        section: Option<Section<'a>>,
        origin: Option<u32>,
    },
    /// `BINARY[<part>]` (RFC 3516)
    Binary { section: Option<Part> },
}

/// The decoder state between two events.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    /// Waiting for the session greeting.
    Greeting,
    /// Between responses.
    Response,
    /// Inside a FETCH attribute list.
    Attributes(AttrState),
    /// Inside a literal-valued attribute body.
    AttributeBytes { remaining: u32 },
    /// An untagged group is fully parsed; its `ResponseEnd` is still owed.
    GroupEnd,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AttrState {
    /// Before the `(`.
    Head,
    /// Before an attribute.
    Item,
    /// Before the ` ` or `)` following an attribute.
    Separator,
}

/// Incremental decoder for server responses.
///
/// Call [`ResponseStream::enqueue_bytes`] with whatever the transport
/// delivered, then [`ResponseStream::progress`] until it returns
/// `Ok(None)`. The decoder is resumable across any number of buffer
/// top-ups and never buffers a streamed attribute body in full.
#[derive(Debug)]
pub struct ResponseStream {
    buffer: BytesMut,
    /// Bytes already parsed, discarded on the next call.
    ///
    /// Consumption is deferred so that emitted events can borrow from the
    /// buffer.
    pending_discard: usize,
    mode: Mode,
    buffer_limit: usize,
}

impl Default for ResponseStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseStream {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            pending_discard: 0,
            mode: Mode::Greeting,
            buffer_limit: DEFAULT_BUFFER_LIMIT,
        }
    }

    /// Use a lookahead bound other than [`DEFAULT_BUFFER_LIMIT`].
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

    /// Decode the next event.
    ///
    /// Returns `Ok(None)` when more bytes are needed. A returned event may
    /// borrow from the internal buffer and must be processed (or converted
    /// to an owned value) before the next call.
    pub fn progress(&mut self) -> Result<Option<ResponseEvent<'_>>, StreamError> {
        self.buffer.advance(self.pending_discard);
        self.pending_discard = 0;

        loop {
            match self.mode {
                Mode::Greeting => {
                    let input = &self.buffer[..];

                    return match greeting(input) {
                        Ok((remaining, greeting)) => {
                            self.pending_discard = input.len() - remaining.len();
                            self.mode = Mode::Response;
                            Ok(Some(ResponseEvent::Greeting(greeting)))
                        }
                        Err(error) => self.handle_error(error),
                    };
                }
                Mode::Response => {
                    if self.buffer.is_empty() {
                        return Ok(None);
                    }

                    // A FETCH response is streamed, everything else is
                    // parsed as one line.
                    match fetch_begin(&self.buffer[..]) {
                        Ok((remaining, seq)) => {
                            self.pending_discard = self.buffer.len() - remaining.len();
                            self.mode = Mode::Attributes(AttrState::Head);
                            return Ok(Some(ResponseEvent::ResponseBegin(
                                UntaggedPayload::FetchBegin { seq },
                            )));
                        }
                        Err(nom::Err::Incomplete(_)) => return self.need_more(),
                        Err(_) => {}
                    }

                    let input = &self.buffer[..];

                    return match response(input) {
                        Ok((remaining, response)) => {
                            self.pending_discard = input.len() - remaining.len();

                            Ok(Some(match response {
                                Response::CommandContinuationRequest(request) => {
                                    ResponseEvent::ContinuationRequest(request)
                                }
                                Response::Data(data) => {
                                    self.mode = Mode::GroupEnd;
                                    ResponseEvent::ResponseBegin(UntaggedPayload::Data(data))
                                }
                                Response::Status(Status::Untagged(body)) => {
                                    self.mode = Mode::GroupEnd;
                                    ResponseEvent::ResponseBegin(UntaggedPayload::Status(body))
                                }
                                Response::Status(Status::Tagged(tagged)) => {
                                    ResponseEvent::ResponseEnd(Some(ResponseDone::Tagged(tagged)))
                                }
                                Response::Status(Status::Bye(bye)) => {
                                    ResponseEvent::ResponseEnd(Some(ResponseDone::Fatal(bye)))
                                }
                            }))
                        }
                        Err(error) => self.handle_error(error),
                    };
                }
                Mode::Attributes(AttrState::Head) => {
                    let input = &self.buffer[..];

                    return match attributes_open(input) {
                        Ok((remaining, _)) => {
                            self.pending_discard = input.len() - remaining.len();
                            self.mode = Mode::Attributes(AttrState::Item);
                            Ok(Some(ResponseEvent::AttributesStart))
                        }
                        Err(error) => self.handle_error(error),
                    };
                }
                Mode::Attributes(AttrState::Item) => {
                    // A literal-valued attribute switches to streaming ...
                    match streaming_att_begin(&self.buffer[..]) {
                        Ok((remaining, (item, length))) => {
                            self.pending_discard = self.buffer.len() - remaining.len();
                            self.mode = Mode::AttributeBytes { remaining: length };
                            return Ok(Some(ResponseEvent::StreamingAttributeBegin {
                                item,
                                length,
                            }));
                        }
                        Err(nom::Err::Incomplete(_)) => return self.need_more(),
                        Err(_) => {}
                    }

                    // ... everything else is parsed in one go.
                    let input = &self.buffer[..];

                    return match alt((msg_att_dynamic, msg_att_static))(input) {
                        Ok((remaining, item)) => {
                            self.pending_discard = input.len() - remaining.len();
                            self.mode = Mode::Attributes(AttrState::Separator);
                            Ok(Some(ResponseEvent::SimpleAttribute(item)))
                        }
                        Err(error) => self.handle_error(error),
                    };
                }
                Mode::Attributes(AttrState::Separator) => {
                    match self.buffer.first().copied() {
                        None => return Ok(None),
                        Some(b' ') => {
                            self.buffer.advance(1);
                            self.mode = Mode::Attributes(AttrState::Item);
                            // Tail-call into the attribute state.
                            continue;
                        }
                        Some(_) => {}
                    }

                    let input = &self.buffer[..];

                    return match attributes_close(input) {
                        Ok((remaining, _)) => {
                            self.pending_discard = input.len() - remaining.len();
                            self.mode = Mode::GroupEnd;
                            Ok(Some(ResponseEvent::AttributesFinish))
                        }
                        Err(error) => self.handle_error(error),
                    };
                }
                Mode::AttributeBytes { remaining } => {
                    if remaining == 0 {
                        self.mode = Mode::Attributes(AttrState::Separator);
                        return Ok(Some(ResponseEvent::StreamingAttributeEnd));
                    }

                    if self.buffer.is_empty() {
                        return Ok(None);
                    }

                    let chunk_len = self.buffer.len().min(remaining as usize);
                    self.pending_discard = chunk_len;
                    self.mode = Mode::AttributeBytes {
                        remaining: remaining - chunk_len as u32,
                    };

                    return Ok(Some(ResponseEvent::StreamingAttributeBytes(
                        &self.buffer[..chunk_len],
                    )));
                }
                Mode::GroupEnd => {
                    self.mode = Mode::Response;
                    return Ok(Some(ResponseEvent::ResponseEnd(None)));
                }
            }
        }
    }

    /// Classify a parser error.
    ///
    /// `Incomplete` and a literal announcement at the end of the buffer
    /// both mean "wait for more bytes"; everything else poisons the
    /// connection.
    fn handle_error<T>(
        &self,
        error: nom::Err<IMAPParseError<'_, &[u8]>>,
    ) -> Result<Option<T>, StreamError> {
        match error {
            nom::Err::Incomplete(_) => self.check_lookahead(),
            nom::Err::Failure(IMAPParseError {
                kind: IMAPErrorKind::Literal { .. },
                ..
            }) => self.check_lookahead(),
            nom::Err::Error(_) | nom::Err::Failure(_) => {
                Err(StreamError::violation(&self.buffer))
            }
        }
    }

    fn need_more<T>(&self) -> Result<Option<T>, StreamError> {
        self.check_lookahead()
    }

    fn check_lookahead<T>(&self) -> Result<Option<T>, StreamError> {
        // Streamed attribute bodies never take this path; only line
        // material counts against the limit.
        if self.buffer.len() > self.buffer_limit {
            return Err(StreamError::ExcessiveLookahead {
                limit: self.buffer_limit,
            });
        }

        Ok(None)
    }
}

/// `"*" SP nz-number SP "FETCH" SP`
fn fetch_begin(input: &[u8]) -> IMAPResult<&[u8], NonZeroU32> {
    delimited(tag(b"* "), nz_number, tag_no_case(b" FETCH "))(input)
}

/// `message-attribute-start`, i.e., the `(` opening the attribute list.
fn attributes_open(input: &[u8]) -> IMAPResult<&[u8], &[u8]> {
    tag(b"(")(input)
}

/// The `)` closing the attribute list, plus the line ending.
fn attributes_close(input: &[u8]) -> IMAPResult<&[u8], (&[u8], &[u8])> {
    tuple((tag(b")"), recognize(crlf)))(input)
}

/// The head of a literal-valued FETCH attribute, up to and including the
/// literal announcement.
fn streaming_att_begin(input: &[u8]) -> IMAPResult<&[u8], (StreamingItem, u32)> {
    alt((
        map(
            tuple((
                tag_no_case(b"BODY"),
                section,
                opt(delimited(tag(b"<"), number, tag(b">"))),
                sp,
                literal_header,
            )),
            |(_, section, origin, _, (length, _, _))| {
                (StreamingItem::BodyExt { section, origin }, length)
            },
        ),
        map(
            tuple((tag_no_case(b"RFC822.HEADER"), sp, literal_header)),
            |(_, _, (length, _, _))| (StreamingItem::Rfc822Header, length),
        ),
        map(
            tuple((tag_no_case(b"RFC822.TEXT"), sp, literal_header)),
            |(_, _, (length, _, _))| (StreamingItem::Rfc822Text, length),
        ),
        map(
            tuple((tag_no_case(b"RFC822"), sp, literal_header)),
            |(_, _, (length, _, _))| (StreamingItem::Rfc822, length),
        ),
        map(
            tuple((tag_no_case(b"BINARY"), section_binary, sp, literal_header)),
            |(_, section, _, (length, _, _))| (StreamingItem::Binary { section }, length),
        ),
    ))(input)
}

#[cfg(test)]
mod tests {
    use imap_stream_types::response::GreetingKind;

    use super::*;

    fn collect_events(stream: &mut ResponseStream) -> Vec<String> {
        let mut events = Vec::new();

        while let Some(event) = stream.progress().unwrap() {
            events.push(format!("{event:?}"));
        }

        events
    }

    #[test]
    fn test_greeting_and_tagged_ok() {
        let mut stream = ResponseStream::new();
        stream.enqueue_bytes(b"* OK IMAP4rev1 Service Ready\r\na1 OK LOGIN completed\r\n");

        let event = stream.progress().unwrap().unwrap();
        match event {
            ResponseEvent::Greeting(greeting) => {
                assert_eq!(greeting.kind, GreetingKind::Ok);
                assert_eq!(greeting.text.inner(), "IMAP4rev1 Service Ready");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let event = stream.progress().unwrap().unwrap();
        match event {
            ResponseEvent::ResponseEnd(Some(ResponseDone::Tagged(tagged))) => {
                assert_eq!(tagged.tag.inner(), "a1");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert!(stream.progress().unwrap().is_none());
    }

    #[test]
    fn test_fetch_with_streamed_body() {
        let mut stream = ResponseStream::with_buffer_limit(1000);
        stream.enqueue_bytes(b"* OK ready\r\n");
        let _greeting = stream.progress().unwrap().unwrap();

        stream.enqueue_bytes(b"* 1 FETCH (UID 42 BODY[TEXT] {11}\r\nHello world)\r\n");

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::ResponseBegin(UntaggedPayload::FetchBegin { seq }) if seq.get() == 1
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::AttributesStart
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::SimpleAttribute(MessageDataItem::Uid(uid)) if uid.get() == 42
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::StreamingAttributeBegin {
                item: StreamingItem::BodyExt {
                    section: Some(Section::Text(None)),
                    origin: None,
                },
                length: 11,
            }
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::StreamingAttributeBytes(b"Hello world")
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::StreamingAttributeEnd
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::AttributesFinish
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::ResponseEnd(None)
        ));
        assert!(stream.progress().unwrap().is_none());
    }

    #[test]
    fn test_fetch_body_streamed_in_chunks() {
        let mut stream = ResponseStream::new();
        stream.enqueue_bytes(b"* OK ready\r\n");
        let _greeting = stream.progress().unwrap().unwrap();

        stream.enqueue_bytes(b"* 7 FETCH (BODY[] {10}\r\nHello");

        let mut labels = collect_events(&mut stream);

        // Begin, start, streaming begin, and the first five bytes.
        assert_eq!(labels.len(), 4);
        assert!(labels.pop().unwrap().contains("StreamingAttributeBytes"));

        // The remaining bytes arrive.
        stream.enqueue_bytes(b"World)\r\n");

        let labels = collect_events(&mut stream);
        assert!(labels[0].contains("StreamingAttributeBytes"));
        assert!(labels[1].contains("StreamingAttributeEnd"));
        assert!(labels[2].contains("AttributesFinish"));
        assert!(labels[3].contains("ResponseEnd"));
    }

    #[test]
    fn test_untagged_data_group() {
        let mut stream = ResponseStream::new();
        stream.enqueue_bytes(b"* OK ready\r\n* SEARCH 2 3 5\r\n");

        let _greeting = stream.progress().unwrap().unwrap();

        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::ResponseBegin(UntaggedPayload::Data(Data::Search { .. }))
        ));
        assert!(matches!(
            stream.progress().unwrap().unwrap(),
            ResponseEvent::ResponseEnd(None)
        ));
    }

    #[test]
    fn test_lookahead_limit() {
        let mut stream = ResponseStream::with_buffer_limit(32);
        stream.enqueue_bytes(b"* OK ready\r\n");
        let _greeting = stream.progress().unwrap().unwrap();

        // A line that never ends.
        stream.enqueue_bytes(&[b'x'; 64]);

        assert!(matches!(
            stream.progress(),
            Err(StreamError::ExcessiveLookahead { limit: 32 })
        ));
    }

    #[test]
    fn test_protocol_violation() {
        let mut stream = ResponseStream::new();
        stream.enqueue_bytes(b"!!! not imap\r\n");

        assert!(matches!(
            stream.progress(),
            Err(StreamError::ProtocolViolation { .. })
        ));
    }
}
