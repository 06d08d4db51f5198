use imap_stream::{
    decode::Decoder,
    encode::Encoder,
    types::{
        command::{Command, CommandBody},
        response::Response,
    },
    CommandCodec, GreetingCodec, ResponseCodec,
};

enum Who {
    Client,
    Server,
}

struct TraceLines<'a> {
    trace: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for TraceLines<'a> {
    type Item = (Who, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let input = &self.trace[self.offset..];

        if let Some(pos) = input.iter().position(|b| *b == b'\n') {
            let who = match &input[..3] {
                b"C: " => Who::Client,
                b"S: " => Who::Server,
                _ => panic!("Line must begin with \"C: \" or \"S: \"."),
            };

            self.offset += pos + 1;

            Some((who, &input[3..pos + 1]))
        } else {
            None
        }
    }
}

fn split_trace(trace: &[u8]) -> impl Iterator<Item = (Who, &[u8])> {
    TraceLines { trace, offset: 0 }
}

/// Parse every line of a recorded conversation, re-encode the parsed value,
/// and check that the re-encoding parses to the same value.
fn test_lines_of_trace(trace: &[u8]) {
    for (who, line) in split_trace(trace) {
        // Replace last "\n" with "\r\n".
        let line = {
            let mut line = line[..line.len().saturating_sub(1)].to_vec();
            line.extend_from_slice(b"\r\n");
            line
        };

        match who {
            Who::Client => {
                println!("C:          {}", String::from_utf8_lossy(&line).trim());
                let (rem, parsed) = CommandCodec::default().decode(&line).unwrap();
                assert!(rem.is_empty());
                let serialized = CommandCodec::default().encode(&parsed).dump();
                println!(
                    "Serialized: {}",
                    String::from_utf8_lossy(&serialized).trim()
                );
                let (rem, parsed2) = CommandCodec::default().decode(&serialized).unwrap();
                assert!(rem.is_empty());
                assert_eq!(parsed, parsed2);
            }
            Who::Server => {
                println!("S:          {}", String::from_utf8_lossy(&line).trim());
                let (rem, parsed) = ResponseCodec::default().decode(&line).unwrap();
                assert!(rem.is_empty());
                let serialized = ResponseCodec::default().encode(&parsed).dump();
                println!(
                    "Serialized: {}",
                    String::from_utf8_lossy(&serialized).trim()
                );
                let (rem, parsed2) = ResponseCodec::default().decode(&serialized).unwrap();
                assert!(rem.is_empty());
                assert_eq!(parsed, parsed2);
            }
        }
    }
}

#[test]
fn test_trace_rfc3501_session() {
    // Taken from RFC 3501 section 8 (greeting omitted, APPEND omitted).
    let trace = br#"C: a441 CAPABILITY
S: * CAPABILITY IMAP4rev1 STARTTLS AUTH=GSSAPI
S: a441 OK CAPABILITY completed
C: a001 LOGIN mrc secret
S: a001 OK LOGIN completed
C: a002 SELECT inbox
S: * 18 EXISTS
S: * FLAGS (\Answered \Flagged \Deleted \Seen \Draft)
S: * 2 RECENT
S: * OK [UNSEEN 17] Message 17 is the first unseen message
S: * OK [UIDVALIDITY 3857529045] UIDs valid
S: a002 OK [READ-WRITE] SELECT completed
C: a003 FETCH 12 FULL
S: a003 OK FETCH completed
C: a004 FETCH 12 BODY[HEADER]
S: a004 OK FETCH completed
C: a005 STORE 12 +FLAGS \Deleted
S: * 12 FETCH (FLAGS (\Seen \Deleted))
S: a005 OK +FLAGS completed
C: a006 LOGOUT
S: * BYE IMAP4rev1 server terminating connection
S: a006 OK LOGOUT completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc3501_search_and_fetch() {
    let trace = br#"C: A282 SEARCH FLAGGED SINCE 1-Feb-1994 NOT FROM "Smith"
S: * SEARCH 2 84 882
S: A282 OK SEARCH completed
C: A283 SEARCH TEXT "string not in mailbox"
S: * SEARCH
S: A283 OK SEARCH completed
C: A654 FETCH 2:4 (FLAGS BODY[HEADER.FIELDS (DATE FROM)])
S: A654 OK FETCH completed
C: A999 UID FETCH 4827313:4828442 FLAGS
S: * 23 FETCH (FLAGS (\Seen) UID 4827313)
S: * 24 FETCH (FLAGS (\Seen) UID 4827943)
S: * 25 FETCH (FLAGS (\Seen) UID 4828442)
S: A999 OK UID FETCH completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc2342_namespace() {
    let trace = br#"C: A001 NAMESPACE
S: * NAMESPACE (("" "/")) (("~" "/")) NIL
S: A001 OK NAMESPACE command completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc2087_quota() {
    let trace = br#"C: A003 GETQUOTA ""
S: * QUOTA "" (STORAGE 10 512)
S: A003 OK Getquota completed
C: A004 GETQUOTAROOT INBOX
S: * QUOTAROOT INBOX ""
S: * QUOTA "" (STORAGE 10 512)
S: A004 OK Getquotaroot completed
C: A001 SETQUOTA "" (STORAGE 512)
S: * QUOTA "" (STORAGE 10 512)
S: A001 OK Setquota completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc4314_acl() {
    let trace = br#"C: A001 GETACL INBOX
S: * ACL INBOX Fred rwipsldexta
S: A001 OK Getacl complete
C: A002 SETACL INBOX Chris +lrswi
S: A002 OK Setacl complete
C: A003 LISTRIGHTS INBOX Chris
S: * LISTRIGHTS INBOX Chris lrswipkxtecda
S: A003 OK Listrights completed
C: A004 MYRIGHTS INBOX
S: * MYRIGHTS INBOX rwiptsldaex
S: A004 OK Myrights complete
C: A005 DELETEACL INBOX Chris
S: A005 OK Deleteacl complete
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc5464_metadata() {
    let trace = br#"C: a GETMETADATA "" /shared/comment
S: * METADATA "" (/shared/comment "Shared comment")
S: a OK GETMETADATA complete
C: b GETMETADATA (MAXSIZE 1024) INBOX (/shared/comment /private/comment)
S: * METADATA INBOX (/shared/comment "Shared comment" /private/comment "My comment")
S: b OK GETMETADATA complete
C: c SETMETADATA INBOX (/private/comment "My new comment")
S: c OK SETMETADATA complete
C: d SETMETADATA INBOX (/private/comment NIL)
S: d OK SETMETADATA complete
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc7162_condstore() {
    let trace = br#"C: A042 SELECT INBOX (CONDSTORE)
S: * OK [HIGHESTMODSEQ 715194045007] Highest mailbox mod-sequence
S: A042 OK [READ-WRITE] SELECT completed, CONDSTORE is now enabled
C: a103 UID FETCH 1:* (FLAGS) (CHANGEDSINCE 12345)
S: * 1 FETCH (UID 4 MODSEQ (12121231000) FLAGS (\Seen))
S: a103 OK FETCH completed
C: a104 STORE 7,9 (UNCHANGEDSINCE 320162338) +FLAGS.SILENT (\Deleted)
S: a104 OK [MODIFIED 9] Conditional STORE failed
C: a105 SEARCH MODSEQ "/flags/\\draft" all 620162338
S: * SEARCH 2 5 6 (MODSEQ 917162500)
S: a105 OK Search complete
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc7162_qresync() {
    let trace = br#"C: A02 SELECT INBOX (QRESYNC (67890007 20050715194045000 41,43:211,214:541))
S: * OK [CLOSED] Previous mailbox closed
S: * VANISHED (EARLIER) 41,43:116,118,120:211,214:540
S: A02 OK [READ-WRITE] mailbox selected
C: A03 UID FETCH 300:500 (FLAGS) (CHANGEDSINCE 12345 VANISHED)
S: * VANISHED 300:310,405,411
S: A03 OK FETCH completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc4731_esearch() {
    let trace = br#"C: A282 ESEARCH RETURN (MIN COUNT) FLAGGED SINCE 1-Feb-1994 NOT FROM "Smith"
S: * ESEARCH (TAG "A282") MIN 2 COUNT 3
S: A282 OK ESEARCH completed
C: A283 UID ESEARCH RETURN (ALL) UID 100:200 FLAGGED
S: * ESEARCH (TAG "A283") UID ALL 17,900,901
S: A283 OK ESEARCH completed
C: A284 ESEARCH RETURN (SAVE) SINCE 1-Jan-2004 NOT FROM "Smith"
S: A284 OK SEARCH completed, result saved
C: A285 COPY $ "Other Messages"
S: A285 OK COPY completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc7377_multisearch() {
    let trace = br#"C: A ESEARCH IN (inboxes) RETURN (MIN MAX COUNT) CHARSET UTF-8 FROM "alice"
S: * ESEARCH (TAG "A") MIN 1 MAX 17 COUNT 12
S: A OK done
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc6851_move() {
    let trace = br#"C: a UID MOVE 42:69 foo
S: * OK [COPYUID 432432 42:69 1202:1229] Moved UIDs.
S: * 22 EXPUNGE
S: a OK Done
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc4315_uidplus() {
    let trace = br#"C: A003 UID COPY 2:4 meeting
S: A003 OK [COPYUID 38505 304,319:320 3956:3958] Done
C: A004 UID EXPUNGE 3000:3002
S: * 3 EXPUNGE
S: A004 OK UID EXPUNGE completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc5161_enable() {
    let trace = br#"C: t1 CAPABILITY
S: * CAPABILITY IMAP4rev1 ID LITERAL+ ENABLE X-GOOD-IDEA
S: t1 OK foo
C: t2 ENABLE CONDSTORE X-GOOD-IDEA
S: * ENABLED X-GOOD-IDEA
S: t2 OK foo
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc2971_id() {
    let trace = br#"C: a023 ID ("name" "sodr" "version" "19.34" "vendor" "Pink Floyd Music Limited")
S: * ID NIL
S: a023 OK ID completed
C: a042 ID NIL
S: * ID ("name" "Cyrus" "version" "1.5")
S: a042 OK ID completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc5258_list_extended() {
    let trace = br#"C: A01 LIST "" %
S: * LIST (\Marked \NoInferiors) "/" inbox
S: * LIST () "/" Fruit
S: A01 OK done
C: A02 LIST (SUBSCRIBED) "" "*" RETURN (CHILDREN)
S: * LIST (\Marked \NoInferiors \Subscribed) "/" inbox
S: * LIST (\Subscribed \HasChildren) "/" Fruit
S: A02 OK done
C: A03 LIST "" % RETURN (STATUS (MESSAGES UNSEEN))
S: * LIST () "/" music
S: * STATUS music (MESSAGES 20 UNSEEN 1)
S: A03 OK List completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_rfc4467_urlauth() {
    let trace = br#"C: a777 GENURLAUTH "imap://joe@example.com/INBOX/;uid=20;expire=2006-10-20T00:00:00Z;urlauth=submit+fred" INTERNAL
S: * GENURLAUTH "imap://joe@example.com/INBOX/;uid=20;expire=2006-10-20T00:00:00Z;urlauth=submit+fred:internal:91354a473744909de610943775f92038"
S: a777 OK GENURLAUTH completed
C: a782 RESETKEY INBOX INTERNAL
S: a782 OK RESETKEY completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_status_size() {
    let trace = br#"C: A042 STATUS blurdybloop (UIDNEXT MESSAGES SIZE)
S: * STATUS blurdybloop (MESSAGES 231 UIDNEXT 44292 SIZE 22513)
S: A042 OK STATUS completed
"#;

    test_lines_of_trace(trace);
}

#[test]
fn test_trace_greeting() {
    let (rem, greeting) = GreetingCodec::default()
        .decode(b"* OK IMAP4rev1 Service Ready\r\n")
        .unwrap();
    assert!(rem.is_empty());

    let serialized = GreetingCodec::default().encode(&greeting).dump();
    assert_eq!(serialized, b"* OK IMAP4rev1 Service Ready\r\n");
}

#[test]
fn test_trace_command_with_literal_round_trip() {
    let tests: Vec<&[u8]> = vec![
        b"a1 LOGIN {4}\r\nuser {4}\r\npass\r\n",
        b"a2 LOGIN {4+}\r\nuser {4+}\r\npass\r\n",
        b"a3 SELECT {5}\r\ninbox\r\n",
        b"a4 APPEND saved-messages (\\Seen) {15}\r\nDate: (omitted)\r\n",
    ];

    for test in tests {
        let (rem, parsed) = CommandCodec::default().decode(test).unwrap();
        assert!(rem.is_empty());

        let serialized = CommandCodec::default().encode(&parsed).dump();
        let (rem, parsed2) = CommandCodec::default().decode(&serialized).unwrap();
        assert!(rem.is_empty());
        assert_eq!(parsed, parsed2);
    }
}

#[test]
fn test_trace_idempotent_canonicalization() {
    // Non-canonical input: lowercase command, upper-case flags.
    let (_, parsed) = CommandCodec::default()
        .decode(b"a5 store 1:* +flags.silent (\\SEEN \\ANSWERED)\r\n")
        .unwrap();

    let first = CommandCodec::default().encode(&parsed).dump();
    let (_, reparsed) = CommandCodec::default().decode(&first).unwrap();
    let second = CommandCodec::default().encode(&reparsed).dump();

    // `encode(parse(encode(c))) == encode(c)`
    assert_eq!(first, second);
    // ... and the canonical form uses mixed-case flags.
    assert_eq!(
        std::str::from_utf8(&first).unwrap(),
        "a5 STORE 1:* +FLAGS.SILENT (\\Seen \\Answered)\r\n"
    );
}

#[test]
fn test_trace_command_kinds_cover_all_operations() {
    // One line per supported command; every one must round-trip.
    let lines: Vec<&[u8]> = vec![
        b"a CAPABILITY\r\n",
        b"a NOOP\r\n",
        b"a LOGOUT\r\n",
        b"a STARTTLS\r\n",
        b"a AUTHENTICATE PLAIN\r\n",
        b"a AUTHENTICATE PLAIN AGFsaWNlAHBhc3M=\r\n",
        b"a LOGIN alice pass\r\n",
        b"a SELECT INBOX\r\n",
        b"a EXAMINE Archive (CONDSTORE)\r\n",
        b"a UNSELECT\r\n",
        b"a CREATE owatagusiam/blurdybloop\r\n",
        b"a DELETE blurdybloop\r\n",
        b"a RENAME blurdybloop sarasoop\r\n",
        b"a SUBSCRIBE #news.comp.mail.mime\r\n",
        b"a UNSUBSCRIBE #news.comp.mail.mime\r\n",
        b"a LIST \"\" *\r\n",
        b"a LSUB \"#news.\" \"comp.mail.*\"\r\n",
        b"a STATUS blurdybloop (UIDNEXT MESSAGES HIGHESTMODSEQ)\r\n",
        b"a CHECK\r\n",
        b"a CLOSE\r\n",
        b"a EXPUNGE\r\n",
        b"a UID EXPUNGE 3:5\r\n",
        b"a SEARCH UNSEEN\r\n",
        b"a UID SEARCH 1:100 UNSEEN\r\n",
        b"a ESEARCH RETURN (MIN MAX) UNSEEN\r\n",
        b"a FETCH 1 (FLAGS UID MODSEQ)\r\n",
        b"a FETCH 1 BODY.PEEK[HEADER.FIELDS (DATE FROM)]<0.100>\r\n",
        b"a FETCH 1 (BINARY[1.2] BINARY.SIZE[1])\r\n",
        b"a STORE 1 -FLAGS (\\Seen)\r\n",
        b"a COPY 1:3 Archive\r\n",
        b"a MOVE 1:3 Archive\r\n",
        b"a UID COPY 100:200 Archive\r\n",
        b"a IDLE\r\n",
        b"a ENABLE QRESYNC UTF8=ACCEPT\r\n",
        b"a ID NIL\r\n",
        b"a GETQUOTA \"\"\r\n",
        b"a GETQUOTAROOT INBOX\r\n",
        b"a SETQUOTA \"\" (STORAGE 512 MESSAGE 1000)\r\n",
        b"a SETACL INBOX alice +lrswi\r\n",
        b"a DELETEACL INBOX alice\r\n",
        b"a GETACL INBOX\r\n",
        b"a LISTRIGHTS INBOX alice\r\n",
        b"a MYRIGHTS INBOX\r\n",
        b"a GETMETADATA (DEPTH 1) INBOX /shared/comment\r\n",
        b"a SETMETADATA INBOX (/shared/comment \"comment\")\r\n",
        b"a NAMESPACE\r\n",
        b"a GENURLAUTH \"imap://example.com/INBOX/;uid=1;urlauth=anonymous\" INTERNAL\r\n",
        b"a RESETKEY\r\n",
        b"a URLFETCH \"imap://example.com/INBOX/;uid=1\"\r\n",
    ];

    for line in lines {
        println!("// {}", String::from_utf8_lossy(line).trim());

        let (rem, parsed) = CommandCodec::default().decode(line).unwrap();
        assert!(rem.is_empty());

        let serialized = CommandCodec::default().encode(&parsed).dump();
        let (rem, parsed2) = CommandCodec::default().decode(&serialized).unwrap();
        assert!(rem.is_empty());
        assert_eq!(parsed, parsed2);
    }
}

#[test]
fn test_trace_response_fetch_with_literal() {
    let input = b"* 1 FETCH (RFC822 {15}\r\nDate: (omitted))\r\n";

    let (rem, parsed) = ResponseCodec::default().decode(input).unwrap();
    assert!(rem.is_empty());

    match &parsed {
        Response::Data(_) => {}
        other => panic!("unexpected response: {other:?}"),
    }

    let serialized = ResponseCodec::default().encode(&parsed).dump();
    assert_eq!(serialized.as_slice(), input.as_ref());
}

#[test]
fn test_trace_multiappend() {
    let input: &[u8] = b"A003 APPEND saved-messages (\\Seen) {15}\r\nDate: (omitted) (\\Seen) \"07-Feb-1994 22:43:04 -0800\" {15}\r\nDate: (omitted)\r\n";

    let (rem, parsed) = CommandCodec::default().decode(input).unwrap();
    assert!(rem.is_empty());

    match &parsed {
        Command {
            body: CommandBody::Append { messages, .. },
            ..
        } => assert_eq!(messages.len(), 2),
        other => panic!("unexpected command: {other:?}"),
    }

    let serialized = CommandCodec::default().encode(&parsed).dump();
    let (rem, parsed2) = CommandCodec::default().decode(&serialized).unwrap();
    assert!(rem.is_empty());
    assert_eq!(parsed, parsed2);
}
