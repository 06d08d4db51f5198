use abnf_core::streaming::sp;
use imap_stream_types::envelope::{Address, Envelope};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    multi::many1,
    sequence::{delimited, tuple},
};

use crate::{
    core::{nil, nstring},
    decode::IMAPResult,
};

/// ```abnf
/// envelope = "("
///            env-date SP
///            env-subject SP
///            env-from SP
///            env-sender SP
///            env-reply-to SP
///            env-to SP
///            env-cc SP
///            env-bcc SP
///            env-in-reply-to SP
///            env-message-id
///            ")"
/// ```
pub(crate) fn envelope(input: &[u8]) -> IMAPResult<&[u8], Envelope> {
    let mut parser = delimited(
        tag(b"("),
        tuple((
            nstring, // env-date
            sp,
            nstring, // env-subject
            sp,
            env_address_list, // env-from
            sp,
            env_address_list, // env-sender
            sp,
            env_address_list, // env-reply-to
            sp,
            env_address_list, // env-to
            sp,
            env_address_list, // env-cc
            sp,
            env_address_list, // env-bcc
            sp,
            nstring, // env-in-reply-to
            sp,
            nstring, // env-message-id
        )),
        tag(b")"),
    );

    let (remaining, (date, _, subject, _, from, _, sender, _, reply_to, _, to, _, cc, _, bcc, _, in_reply_to, _, message_id)) =
        parser(input)?;

    Ok((
        remaining,
        Envelope {
            date,
            subject,
            from,
            sender,
            reply_to,
            to,
            cc,
            bcc,
            in_reply_to,
            message_id,
        },
    ))
}

/// `env-from = "(" 1*address ")" / nil` (and friends)
fn env_address_list(input: &[u8]) -> IMAPResult<&[u8], Vec<Address>> {
    alt((
        delimited(tag(b"("), many1(address), tag(b")")),
        value(Vec::default(), nil),
    ))(input)
}

/// `address = "(" addr-name SP addr-adl SP addr-mailbox SP addr-host ")"`
pub(crate) fn address(input: &[u8]) -> IMAPResult<&[u8], Address> {
    let mut parser = delimited(
        tag(b"("),
        tuple((nstring, sp, nstring, sp, nstring, sp, nstring)),
        tag(b")"),
    );

    let (remaining, (name, _, adl, _, mailbox, _, host)) = parser(input)?;

    Ok((
        remaining,
        Address {
            name,
            adl,
            mailbox,
            host,
        },
    ))
}

#[cfg(test)]
mod tests {
    use imap_stream_types::core::NString;

    use super::*;

    #[test]
    fn test_parse_address() {
        let (rem, val) =
            address(b"(NIL NIL \"alice\" \"example.org\")?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(
            val,
            Address {
                name: NString(None),
                adl: NString(None),
                mailbox: NString::try_from("alice").unwrap(),
                host: NString::try_from("example.org").unwrap(),
            }
        );
    }

    #[test]
    fn test_parse_envelope_all_nil() {
        let (rem, val) =
            envelope(b"(NIL NIL NIL NIL NIL NIL NIL NIL NIL NIL)?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(
            val,
            Envelope {
                date: NString(None),
                subject: NString(None),
                from: vec![],
                sender: vec![],
                reply_to: vec![],
                to: vec![],
                cc: vec![],
                bcc: vec![],
                in_reply_to: NString(None),
                message_id: NString(None),
            }
        );
    }
}
