#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::streaming::sp;
use base64::{engine::general_purpose::STANDARD as _base64, Engine};
use imap_stream_types::{
    core::{Text, Vec1},
    response::{
        Bye, Capability, Code, CodeOther, CommandContinuationRequest, Data, Greeting, GreetingKind,
        Response, Status, StatusBody, StatusKind, Tagged,
    },
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_until, take_while},
    combinator::{map, map_res, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    core::{atom, charset, nz_number, tag_imap, text},
    decode::IMAPResult,
    extensions::{
        acl::{acl_data, listrights_data, myrights_data},
        condstore_qresync::{mod_sequence_value, vanished_data},
        enable::enable_data,
        id::id_response,
        metadata::{metadata_code, metadata_resp},
        namespace::namespace_response,
        quota::{quota_response, quotaroot_response},
        uidplus::{resp_code_apnd, resp_code_copy},
        urlauth::{genurlauth_data, urlfetch_data},
    },
    fetch::msg_att,
    flag::flag_perm,
    mailbox::mailbox_data,
    sequence::sequence_set,
};

// ----- greeting -----

/// `greeting = "*" SP (resp-cond-auth / resp-cond-bye) CRLF`
pub(crate) fn greeting(input: &[u8]) -> IMAPResult<&[u8], Greeting> {
    let mut parser = delimited(
        tag(b"* "),
        alt((
            resp_cond_auth,
            map(resp_cond_bye, |resp_text| (GreetingKind::Bye, resp_text)),
        )),
        crlf,
    );

    let (remaining, (kind, (code, text))) = parser(input)?;

    Ok((remaining, Greeting { kind, code, text }))
}

/// `resp-cond-auth = ("OK" / "PREAUTH") SP resp-text`
///
/// Authentication condition
#[allow(clippy::type_complexity)]
pub(crate) fn resp_cond_auth(
    input: &[u8],
) -> IMAPResult<&[u8], (GreetingKind, (Option<Code>, Text))> {
    let mut parser = tuple((
        alt((
            value(GreetingKind::Ok, tag_no_case(b"OK ")),
            value(GreetingKind::PreAuth, tag_no_case(b"PREAUTH ")),
        )),
        resp_text,
    ));

    let (remaining, (kind, resp_text)) = parser(input)?;

    Ok((remaining, (kind, resp_text)))
}

/// `resp-text = ["[" resp-text-code "]" SP] text`
pub(crate) fn resp_text(input: &[u8]) -> IMAPResult<&[u8], (Option<Code>, Text)> {
    // When the text starts with "[", we insist on parsing a code.
    // Otherwise, a broken code could be interpreted as text.
    let (_, start) = opt(tag(b"["))(input)?;

    if start.is_some() {
        tuple((
            preceded(
                tag(b"["),
                map(
                    alt((
                        terminated(resp_text_code, tag(b"]")),
                        map(
                            terminated(
                                take_while(|b: u8| b != b']' && b != b'\r' && b != b'\n'),
                                tag(b"]"),
                            ),
                            |bytes: &[u8]| Code::Other(CodeOther::unvalidated(bytes)),
                        ),
                    )),
                    Some,
                ),
            ),
            preceded(sp, text),
        ))(input)
    } else {
        map(text, |text| (None, text))(input)
    }
}

/// ```abnf
/// resp-text-code = "ALERT" /
///                  "BADCHARSET" [SP "(" charset *(SP charset) ")" ] /
///                  capability-data /
///                  "PARSE" /
///                  "PERMANENTFLAGS" SP "(" [flag-perm *(SP flag-perm)] ")" /
///                  "READ-ONLY" /
///                  "READ-WRITE" /
///                  "TRYCREATE" /
///                  "UIDNEXT" SP nz-number /
///                  "UIDVALIDITY" SP nz-number /
///                  "UNSEEN" SP nz-number /
///                  resp-code-apnd / resp-code-copy / "UIDNOTSTICKY" / ; RFC 4315
///                  "HIGHESTMODSEQ" SP mod-sequence-value /            ; RFC 7162
///                  "NOMODSEQ" /                                       ; RFC 7162
///                  "MODIFIED" SP sequence-set /                       ; RFC 7162
///                  "CLOSED" /                                         ; RFC 7162
///                  "NOTSAVED" /                                       ; RFC 5182
///                  "METADATA" SP (...) /                              ; RFC 5464
///                  "UNKNOWN-CTE" /                                    ; RFC 3516
///                  "TOOBIG" /                                         ; RFC 4469
///                  "OVERQUOTA" /                                      ; RFC 9208
///                  atom [SP 1*<any TEXT-CHAR except "]">]
/// ```
///
/// Note: See errata id: 261
pub(crate) fn resp_text_code(input: &[u8]) -> IMAPResult<&[u8], Code> {
    alt((
        alt((
            value(Code::Alert, tag_no_case(b"ALERT")),
            map(
                preceded(
                    tag_no_case(b"BADCHARSET"),
                    opt(delimited(
                        tag(b" ("),
                        separated_list1(sp, charset),
                        tag(b")"),
                    )),
                ),
                |maybe_charsets| Code::BadCharset {
                    allowed: maybe_charsets.unwrap_or_default(),
                },
            ),
            map(capability_data, Code::Capability),
            value(Code::Parse, tag_no_case(b"PARSE")),
            map(
                preceded(
                    tag_no_case(b"PERMANENTFLAGS "),
                    delimited(
                        tag(b"("),
                        map(opt(separated_list1(sp, flag_perm)), |maybe_flags| {
                            maybe_flags.unwrap_or_default()
                        }),
                        tag(b")"),
                    ),
                ),
                Code::PermanentFlags,
            ),
            value(Code::ReadOnly, tag_no_case(b"READ-ONLY")),
            value(Code::ReadWrite, tag_no_case(b"READ-WRITE")),
            value(Code::TryCreate, tag_no_case(b"TRYCREATE")),
            map(preceded(tag_no_case(b"UIDNEXT "), nz_number), Code::UidNext),
            map(
                preceded(tag_no_case(b"UIDVALIDITY "), nz_number),
                Code::UidValidity,
            ),
            map(preceded(tag_no_case(b"UNSEEN "), nz_number), Code::Unseen),
        )),
        alt((
            resp_code_apnd,
            resp_code_copy,
            value(Code::UidNotSticky, tag_no_case(b"UIDNOTSTICKY")),
            map(
                preceded(tag_no_case(b"HIGHESTMODSEQ "), mod_sequence_value),
                Code::HighestModSeq,
            ),
            value(Code::NoModSeq, tag_no_case(b"NOMODSEQ")),
            map(
                preceded(tag_no_case(b"MODIFIED "), sequence_set),
                Code::Modified,
            ),
            value(Code::Closed, tag_no_case(b"CLOSED")),
            value(Code::NotSaved, tag_no_case(b"NOTSAVED")),
            map(
                preceded(tag_no_case(b"METADATA "), metadata_code),
                Code::Metadata,
            ),
            value(Code::UnknownCte, tag_no_case(b"UNKNOWN-CTE")),
            value(Code::TooBig, tag_no_case(b"TOOBIG")),
            value(Code::OverQuota, tag_no_case(b"OVERQUOTA")),
        )),
    ))(input)
}

/// `capability-data = "CAPABILITY" *(SP capability) SP "IMAP4rev1" *(SP capability)`
///
/// Simplified: the IMAP4rev1 capability is not treated specially while
/// parsing; servers MUST include it, clients should check for it.
pub(crate) fn capability_data(input: &[u8]) -> IMAPResult<&[u8], Vec1<Capability>> {
    map(
        preceded(tag_no_case("CAPABILITY "), separated_list1(sp, capability)),
        Vec1::unvalidated,
    )(input)
}

/// `capability = ("AUTH=" auth-type) / atom`
pub(crate) fn capability(input: &[u8]) -> IMAPResult<&[u8], Capability> {
    map(atom, Capability::from)(input)
}

/// `resp-cond-bye = "BYE" SP resp-text`
pub(crate) fn resp_cond_bye(input: &[u8]) -> IMAPResult<&[u8], (Option<Code>, Text)> {
    preceded(tag_no_case(b"BYE "), resp_text)(input)
}

// ----- response -----

/// `response = *(continue-req / response-data) response-done`
pub(crate) fn response(input: &[u8]) -> IMAPResult<&[u8], Response> {
    // Divert from standard here for better usability.
    // response_data already contains the bye response, thus
    // response_done could also be response_tagged.
    alt((
        map(continue_req, Response::CommandContinuationRequest),
        response_data,
        map(response_done, Response::Status),
    ))(input)
}

/// `continue-req = "+" SP (resp-text / base64) CRLF`
pub(crate) fn continue_req(input: &[u8]) -> IMAPResult<&[u8], CommandContinuationRequest> {
    // We can't map the output of `resp_text` directly to `basic()` because
    // we might end up with a subset of `Text` that is valid base64 and
    // would panic on `unwrap()`. Thus, we first let the parsing finish and
    // only later map to `CommandContinuationRequest`.

    // A helper to postpone the unification in the `alt` combinator below.
    enum Either<A, B> {
        Base64(A),
        Basic(B),
    }

    let mut parser = tuple((
        tag(b"+ "),
        alt((
            #[cfg(not(feature = "quirk_crlf_relaxed"))]
            map(
                map_res(take_until("\r\n"), |input| _base64.decode(input)),
                Either::Base64,
            ),
            #[cfg(feature = "quirk_crlf_relaxed")]
            map(
                map_res(take_until("\n"), |input: &[u8]| {
                    if !input.is_empty() && input[input.len().saturating_sub(1)] == b'\r' {
                        _base64.decode(&input[..input.len().saturating_sub(1)])
                    } else {
                        _base64.decode(input)
                    }
                }),
                Either::Base64,
            ),
            map(resp_text, Either::Basic),
        )),
        crlf,
    ));

    let (remaining, (_, either, _)) = parser(input)?;

    let continue_request = match either {
        Either::Base64(data) => CommandContinuationRequest::base64(data),
        Either::Basic((code, text)) => CommandContinuationRequest::Basic { code, text },
    };

    Ok((remaining, continue_request))
}

/// ```abnf
/// response-data = "*" SP (
///                    resp-cond-state /
///                    resp-cond-bye /
///                    mailbox-data /
///                    message-data /
///                    capability-data /
///                    enable-data /     ; RFC 5161
///                    expunged-resp /   ; RFC 7162
///                    namespace-resp /  ; RFC 2342
///                    quota-resp /      ; RFC 2087
///                    acl-data /        ; RFC 4314
///                    metadata-resp /   ; RFC 5464
///                    urlauth-data /    ; RFC 4467
///                    id-response       ; RFC 2971
///                  ) CRLF
/// ```
pub(crate) fn response_data(input: &[u8]) -> IMAPResult<&[u8], Response> {
    delimited(
        tag(b"* "),
        alt((
            map(resp_cond_state, |(kind, code, text)| {
                Response::Status(Status::Untagged(StatusBody { kind, code, text }))
            }),
            map(resp_cond_bye, |(code, text)| {
                Response::Status(Status::Bye(Bye { code, text }))
            }),
            map(mailbox_data, Response::Data),
            map(message_data, Response::Data),
            map(capability_data, |caps| {
                Response::Data(Data::Capability(caps))
            }),
            map(enable_data, Response::Data),
            map(vanished_data, Response::Data),
            map(namespace_response, Response::Data),
            map(quota_response, Response::Data),
            map(quotaroot_response, Response::Data),
            map(acl_data, Response::Data),
            map(listrights_data, Response::Data),
            map(myrights_data, Response::Data),
            map(metadata_resp, Response::Data),
            map(genurlauth_data, Response::Data),
            map(urlfetch_data, Response::Data),
            map(id_response, |parameters| {
                Response::Data(Data::Id { parameters })
            }),
        )),
        crlf,
    )(input)
}

/// `resp-cond-state = ("OK" / "NO" / "BAD") SP resp-text`
///
/// Status condition
pub(crate) fn resp_cond_state(input: &[u8]) -> IMAPResult<&[u8], (StatusKind, Option<Code>, Text)> {
    let mut parser = tuple((
        alt((
            value(StatusKind::Ok, tag_no_case("OK ")),
            value(StatusKind::No, tag_no_case("NO ")),
            value(StatusKind::Bad, tag_no_case("BAD ")),
        )),
        resp_text,
    ));

    let (remaining, (kind, (maybe_code, text))) = parser(input)?;

    Ok((remaining, (kind, maybe_code, text)))
}

/// `response-done = response-tagged / response-fatal`
pub(crate) fn response_done(input: &[u8]) -> IMAPResult<&[u8], Status> {
    alt((response_tagged, response_fatal))(input)
}

/// `response-tagged = tag SP resp-cond-state CRLF`
pub(crate) fn response_tagged(input: &[u8]) -> IMAPResult<&[u8], Status> {
    let mut parser = tuple((tag_imap, sp, resp_cond_state, crlf));

    let (remaining, (tag, _, (kind, code, text), _)) = parser(input)?;

    Ok((
        remaining,
        Status::Tagged(Tagged {
            tag,
            body: StatusBody { kind, code, text },
        }),
    ))
}

/// `response-fatal = "*" SP resp-cond-bye CRLF`
///
/// Server closes connection immediately
pub(crate) fn response_fatal(input: &[u8]) -> IMAPResult<&[u8], Status> {
    let mut parser = delimited(tag(b"* "), resp_cond_bye, crlf);

    let (remaining, (code, text)) = parser(input)?;

    Ok((remaining, Status::Bye(Bye { code, text })))
}

/// `message-data = nz-number SP ("EXPUNGE" / ("FETCH" SP msg-att))`
pub(crate) fn message_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let (remaining, seq) = terminated(nz_number, sp)(input)?;

    alt((
        map(tag_no_case(b"EXPUNGE"), move |_| Data::Expunge(seq)),
        map(preceded(tag_no_case(b"FETCH "), msg_att), move |items| {
            Data::Fetch { seq, items }
        }),
    ))(remaining)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use imap_stream_types::{
        core::{QuotedChar, Tag},
        extensions::condstore_qresync::ModSeq,
        flag::FlagNameAttribute,
        sequence::SequenceSet,
    };

    use super::*;
    use crate::testing::{kat_inverse_greeting, kat_inverse_response};

    #[test]
    fn test_kat_inverse_greeting() {
        kat_inverse_greeting(&[
            (
                b"* OK [badcharset] ...\r\n".as_slice(),
                b"".as_slice(),
                Greeting::ok(Some(Code::BadCharset { allowed: vec![] }), "...").unwrap(),
            ),
            (
                b"* OK [UnSEEN 12345] ...\r\naaa".as_slice(),
                b"aaa".as_slice(),
                Greeting::ok(
                    Some(Code::Unseen(NonZeroU32::try_from(12345).unwrap())),
                    "...",
                )
                .unwrap(),
            ),
            (
                b"* PREAUTH [ALERT] hello\r\n".as_ref(),
                b"".as_ref(),
                Greeting::new(GreetingKind::PreAuth, Some(Code::Alert), "hello").unwrap(),
            ),
        ]);
    }

    #[test]
    fn test_kat_inverse_response_data() {
        kat_inverse_response(&[
            (
                b"* CAPABILITY IMAP4rev1\r\n".as_ref(),
                b"".as_ref(),
                Response::Data(Data::Capability(Vec1::from(Capability::Imap4Rev1))),
            ),
            (
                b"* LIST (\\Noselect) \"/\" bbb\r\n",
                b"",
                Response::Data(Data::List {
                    items: vec![FlagNameAttribute::Noselect],
                    delimiter: Some(QuotedChar::try_from('/').unwrap()),
                    mailbox: "bbb".try_into().unwrap(),
                }),
            ),
            (
                b"* SEARCH 1 2 3 42\r\n",
                b"",
                Response::Data(Data::Search {
                    seqs: vec![
                        1.try_into().unwrap(),
                        2.try_into().unwrap(),
                        3.try_into().unwrap(),
                        42.try_into().unwrap(),
                    ],
                    mod_seq: None,
                }),
            ),
            (b"* 42 EXISTS\r\n", b"", Response::Data(Data::Exists(42))),
            (
                b"* 12345 RECENT\r\n",
                b"",
                Response::Data(Data::Recent(12345)),
            ),
            (
                b"* 123 EXPUNGE\r\n",
                b"",
                Response::Data(Data::Expunge(123.try_into().unwrap())),
            ),
            (
                b"* VANISHED (EARLIER) 41,43:116\r\n",
                b"",
                Response::Data(Data::Vanished {
                    earlier: true,
                    uids: SequenceSet::try_from("41,43:116").unwrap(),
                }),
            ),
        ]);
    }

    #[test]
    fn test_kat_inverse_response_status() {
        kat_inverse_response(&[
            (
                b"A1 OK [ALERT] hello\r\n".as_ref(),
                b"".as_ref(),
                Response::Status(
                    Status::ok(
                        Some(Tag::try_from("A1").unwrap()),
                        Some(Code::Alert),
                        "hello",
                    )
                    .unwrap(),
                ),
            ),
            (
                b"A1 NO hello\r\n",
                b"".as_ref(),
                Response::Status(
                    Status::no(Some(Tag::try_from("A1").unwrap()), None, "hello").unwrap(),
                ),
            ),
            (
                b"* BAD hello\r\n",
                b"".as_ref(),
                Response::Status(Status::bad(None, None, "hello").unwrap()),
            ),
            (
                b"* BYE [ALERT] hello\r\n",
                b"",
                Response::Status(Status::bye(Some(Code::Alert), "hello").unwrap()),
            ),
            (
                b"A2 OK [HIGHESTMODSEQ 715194045007] Highest\r\n",
                b"",
                Response::Status(
                    Status::ok(
                        Some(Tag::try_from("A2").unwrap()),
                        Some(Code::HighestModSeq(ModSeq::try_from(715194045007).unwrap())),
                        "Highest",
                    )
                    .unwrap(),
                ),
            ),
        ]);
    }

    #[test]
    fn test_parse_resp_text_requires_text() {
        assert!(resp_text(b"[IMAP4rev1]\r\n").is_err());
        assert!(resp_text(b"[IMAP4rev1] \r\n").is_err());
        assert!(resp_text(b"[IMAP4rev1]  \r\n").is_ok());
    }

    #[test]
    fn test_parse_response_space_strictness() {
        assert!(response_data(b"* STATUS INBOX (MESSAGES 100 UNSEEN 0)\r\n").is_ok());
        assert!(response_data(b"* STATUS INBOX (MESSAGES 100 UNSEEN 0) \r\n").is_err());
        assert!(response_data(b"*  SEARCH 1 2 3\r\n").is_err());
    }
}
