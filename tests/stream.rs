//! End-to-end tests for the streaming layer: continuation handshakes,
//! streamed FETCH bodies, and streamed APPEND uploads.

use imap_stream::{
    scanner::LiteralScanner,
    stream::{
        command::{CommandEvent, CommandStream},
        response::{ResponseDone, ResponseEvent, ResponseStream, StreamingItem, UntaggedPayload},
    },
    types::{
        command::CommandBody,
        fetch::{MessageDataItem, Section},
        response::GreetingKind,
    },
};

#[test]
fn test_login_round_trip() {
    use imap_stream::{decode::Decoder, encode::Encoder, CommandCodec};

    let input = b"a1 LOGIN \"user\" \"pass\"\r\n";

    let (rem, command) = CommandCodec::default().decode(input).unwrap();
    assert!(rem.is_empty());

    assert_eq!(command.tag.inner(), "a1");
    match &command.body {
        CommandBody::Login { username, password } => {
            assert_eq!(username.as_ref(), b"user");
            assert_eq!(password.declassify().as_ref(), b"pass");
        }
        other => panic!("unexpected body: {other:?}"),
    }

    // `encode` of that value equals the input.
    let encoded = CommandCodec::default().encode(&command).dump();
    assert_eq!(encoded.as_slice(), input.as_ref());

    // ... and is a fixpoint.
    let (_, reparsed) = CommandCodec::default().decode(&encoded).unwrap();
    assert_eq!(reparsed, command);
}

#[test]
fn test_synchronizing_literal_handshake() {
    let mut stream = CommandStream::new();

    // First read.
    stream.enqueue_bytes(b"a2 LOGIN {4}\r\n");

    // One continuation request, then "need more".
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::ContinuationRequest)
    ));
    assert!(stream.progress().unwrap().is_none());

    // Second read.
    stream.enqueue_bytes(b"user {4}\r\npass\r\n");

    // One continuation request, then the complete command.
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::ContinuationRequest)
    ));
    match stream.progress().unwrap() {
        Some(CommandEvent::Command(command)) => {
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
}

#[test]
fn test_non_synchronizing_literals_decode_without_continuation() {
    let mut stream = CommandStream::new();
    stream.enqueue_bytes(b"a3 LOGIN {4+}\r\nuser {4+}\r\npass\r\n");

    // Zero continuation requests; one complete command.
    match stream.progress().unwrap() {
        Some(CommandEvent::Command(command)) => {
            assert_eq!(command.tag.inner(), "a3");
            assert!(matches!(command.body, CommandBody::Login { .. }));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(stream.progress().unwrap().is_none());
}

#[test]
fn test_fetch_streamed_body() {
    let mut stream = ResponseStream::new();
    stream.enqueue_bytes(b"* OK ready\r\n");
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::Greeting(_))
    ));

    stream.enqueue_bytes(b"* 1 FETCH (UID 42 BODY[TEXT] {11}\r\nHello world)\r\n");

    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::ResponseBegin(UntaggedPayload::FetchBegin { seq })) if seq.get() == 1
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::AttributesStart)
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::SimpleAttribute(MessageDataItem::Uid(uid))) if uid.get() == 42
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::StreamingAttributeBegin {
            item: StreamingItem::BodyExt {
                section: Some(Section::Text(None)),
                origin: None,
            },
            length: 11,
        })
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::StreamingAttributeBytes(b"Hello world"))
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::StreamingAttributeEnd)
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::AttributesFinish)
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(ResponseEvent::ResponseEnd(None))
    ));
    assert!(stream.progress().unwrap().is_none());
}

#[test]
fn test_greeting_followed_by_tagged_ok() {
    let mut stream = ResponseStream::new();
    stream.enqueue_bytes(b"* OK IMAP4rev1 Service Ready\r\na1 OK LOGIN completed\r\n");

    match stream.progress().unwrap() {
        Some(ResponseEvent::Greeting(greeting)) => {
            assert_eq!(greeting.kind, GreetingKind::Ok);
            assert_eq!(greeting.text.inner(), "IMAP4rev1 Service Ready");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    match stream.progress().unwrap() {
        Some(ResponseEvent::ResponseEnd(Some(ResponseDone::Tagged(tagged)))) => {
            assert_eq!(tagged.tag.inner(), "a1");
            assert_eq!(tagged.body.text.inner(), "LOGIN completed");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_esearch_with_source_and_return_options() {
    use imap_stream::{
        decode::Decoder,
        encode::Encoder,
        types::extensions::esearch::{SearchReturnOption, SearchSource},
        types::search::SearchKey,
        CommandCodec,
    };

    let input = b"A ESEARCH IN (inboxes) RETURN (MIN MAX COUNT) CHARSET UTF-8 FROM \"alice\"\r\n";

    let (rem, command) = CommandCodec::default().decode(input).unwrap();
    assert!(rem.is_empty());
    assert_eq!(command.tag.inner(), "A");

    match &command.body {
        CommandBody::ExtendedSearch {
            source_options,
            return_options,
            charset,
            criteria,
            uid,
        } => {
            assert_eq!(
                source_options.as_ref().unwrap().as_ref(),
                &[SearchSource::Inboxes]
            );
            assert_eq!(
                return_options,
                &[
                    SearchReturnOption::Min,
                    SearchReturnOption::Max,
                    SearchReturnOption::Count
                ]
            );
            assert_eq!(charset.as_ref().unwrap().as_ref(), "UTF-8");
            assert!(matches!(criteria.as_ref()[0], SearchKey::From(_)));
            assert!(!uid);
        }
        other => panic!("unexpected body: {other:?}"),
    }

    // `encode` produces byte-identical output.
    let encoded = CommandCodec::default().encode(&command).dump();
    assert_eq!(encoded.as_slice(), input.as_ref());
}

#[test]
fn test_streamed_multiappend_upload() {
    let mut stream = CommandStream::new();

    stream.enqueue_bytes(b"a4 APPEND inbox {3}\r\n");

    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::ContinuationRequest)
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendStart { .. })
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendMessageBegin { length: 3, .. })
    ));
    assert!(stream.progress().unwrap().is_none());

    // The body arrives byte by byte.
    stream.enqueue_bytes(b"a");
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendMessageBytes(b"a"))
    ));
    stream.enqueue_bytes(b"bc");
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendMessageBytes(b"bc"))
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendMessageEnd)
    ));

    // A second message follows, then the final CRLF.
    stream.enqueue_bytes(b" {2+}\r\nhi\r\n");
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendMessageBegin { length: 2, .. })
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendMessageBytes(b"hi"))
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendMessageEnd)
    ));
    assert!(matches!(
        stream.progress().unwrap(),
        Some(CommandEvent::AppendEnd)
    ));
}

#[test]
fn test_streaming_attribute_begin_end_pairing() {
    // For every FETCH response group, the number of begin events equals
    // the number of end events before the next group starts.
    let mut stream = ResponseStream::new();
    stream.enqueue_bytes(b"* OK ready\r\n");
    let _ = stream.progress().unwrap();

    stream.enqueue_bytes(
        b"* 3 FETCH (BODY[HEADER] {6}\r\nX: y\r\n BODY[TEXT] {2}\r\nhi UID 3)\r\n",
    );

    let mut begins = 0;
    let mut ends = 0;

    loop {
        match stream.progress().unwrap() {
            Some(ResponseEvent::StreamingAttributeBegin { .. }) => begins += 1,
            Some(ResponseEvent::StreamingAttributeEnd) => ends += 1,
            Some(ResponseEvent::ResponseEnd(None)) => break,
            Some(_) => {}
            None => panic!("ran out of bytes"),
        }
    }

    assert_eq!(begins, 2);
    assert_eq!(begins, ends);
}

#[test]
fn test_scanner_prefix_monotonicity() {
    // For all prefixes P of B: scan(P).sync_literals <= scan(B).sync_literals.
    let buffer =
        b"x1 LOGIN {4}\r\nuser {4}\r\npass\r\nx2 APPEND inbox \"a {9} b\" ~{3}\r\nabc\r\n";

    let mut previous = 0;
    for length in 0..=buffer.len() {
        let mut scanner = LiteralScanner::new();
        let status = scanner.scan(&buffer[..length]);

        assert!(status.sync_literals >= previous);
        assert!(status.max_valid <= length);
        previous = status.sync_literals;
    }
}

#[test]
fn test_exactly_one_continuation_per_sync_literal() {
    let mut stream = CommandStream::new();

    // Three synchronizing literals across two commands.
    stream.enqueue_bytes(b"a1 LOGIN {1}\r\nu {1}\r\np\r\na2 SELECT {5}\r\ninbox\r\n");

    let mut continuations = 0;
    let mut commands = 0;

    while let Some(event) = stream.progress().unwrap() {
        match event {
            CommandEvent::ContinuationRequest => continuations += 1,
            CommandEvent::Command(_) => commands += 1,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    assert_eq!(continuations, 3);
    assert_eq!(commands, 2);
}

#[test]
fn test_empty_buffer_yields_need_more() {
    let mut command_stream = CommandStream::new();
    assert!(command_stream.progress().unwrap().is_none());

    let mut response_stream = ResponseStream::new();
    assert!(response_stream.progress().unwrap().is_none());
}

#[test]
fn test_zero_length_literal_round_trips() {
    use imap_stream::{decode::Decoder, encode::Encoder, CommandCodec};

    let input = b"a1 LOGIN {0}\r\n pass\r\n";

    let (rem, command) = CommandCodec::default().decode(input).unwrap();
    assert!(rem.is_empty());

    let encoded = CommandCodec::default().encode(&command).dump();
    let (rem, reparsed) = CommandCodec::default().decode(&encoded).unwrap();
    assert!(rem.is_empty());
    assert_eq!(command, reparsed);
}
