use std::str::from_utf8;

use abnf_core::streaming::{dquote, sp};
use imap_stream_types::{
    core::QuotedChar,
    flag::FlagNameAttribute,
    mailbox::{ListCharString, ListMailbox, Mailbox},
    response::Data,
    utils::indicators::is_list_char,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_while1},
    combinator::{map, opt, value},
    multi::{many0, separated_list0},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    core::{astring, nil, number, nz_number, quoted_char, string},
    decode::IMAPResult,
    extensions::{condstore_qresync::mod_sequence_value, esearch::esearch_response},
    flag::{flag_fetch, mbx_list_flags},
    status::status_att_list,
};

/// `list-mailbox = 1*list-char / string`
pub(crate) fn list_mailbox(input: &[u8]) -> IMAPResult<&[u8], ListMailbox> {
    alt((
        map(take_while1(is_list_char), |run: &[u8]| {
            // `is_list_char` admits ASCII only, so the conversion can't fail.
            ListMailbox::Token(ListCharString::unvalidated(
                from_utf8(run).expect("byte class is ASCII-only"),
            ))
        }),
        map(string, ListMailbox::String),
    ))(input)
}

/// `mailbox = "INBOX" / astring`
///
/// INBOX is case-insensitive. All case variants of INBOX (e.g., "iNbOx")
/// MUST be interpreted as INBOX, not as an astring.
pub(crate) fn mailbox(input: &[u8]) -> IMAPResult<&[u8], Mailbox> {
    map(astring, Mailbox::from)(input)
}

/// ```abnf
/// mailbox-data = "FLAGS" SP flag-list /
///                "LIST" SP mailbox-list /
///                "LSUB" SP mailbox-list /
///                "SEARCH" *(SP nz-number) [SP "(" "MODSEQ" SP mod-sequence-value ")"] /
///                esearch-response /  ; RFC 4731
///                "STATUS" SP mailbox SP "(" [status-att-list] ")" /
///                number SP "EXISTS" /
///                number SP "RECENT"
/// ```
pub(crate) fn mailbox_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    alt((
        map(
            preceded(
                tag_no_case(b"FLAGS "),
                delimited(
                    tag(b"("),
                    separated_list0(sp, flag_fetch),
                    tag(b")"),
                ),
            ),
            Data::Flags,
        ),
        preceded(tag_no_case(b"LIST "), mailbox_list),
        preceded(tag_no_case(b"LSUB "), mailbox_list_lsub),
        search_data,
        map(esearch_response, Data::ESearch),
        map(
            tuple((
                tag_no_case(b"STATUS "),
                mailbox,
                sp,
                delimited(tag(b"("), status_att_list, tag(b")")),
            )),
            |(_, mailbox, _, items)| Data::Status { mailbox, items },
        ),
        map(terminated(number, tag_no_case(b" EXISTS")), Data::Exists),
        map(terminated(number, tag_no_case(b" RECENT")), Data::Recent),
    ))(input)
}

/// `SEARCH *(SP nz-number) [SP "(" "MODSEQ" SP mod-sequence-value ")"]`
///
/// The trailing MODSEQ group was added by RFC 7162.
fn search_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let (remaining, _) = tag_no_case(b"SEARCH")(input)?;

    let (remaining, seqs) = many0(preceded(sp, nz_number))(remaining)?;

    let (remaining, mod_seq) = opt(delimited(
        tag_no_case(b" (MODSEQ "),
        mod_sequence_value,
        tag(b")"),
    ))(remaining)?;

    Ok((remaining, Data::Search { seqs, mod_seq }))
}

/// `mailbox-list = "(" [mbx-list-flags] ")" SP
///                 (DQUOTE QUOTED-CHAR DQUOTE / nil) SP mailbox`
fn mailbox_list_parts(
    input: &[u8],
) -> IMAPResult<&[u8], (Vec<FlagNameAttribute>, Option<QuotedChar>, Mailbox)> {
    let mut parser = tuple((
        delimited(tag(b"("), mbx_list_flags, tag(b")")),
        sp,
        alt((
            map(delimited(dquote, quoted_char, dquote), Some),
            value(None, nil),
        )),
        sp,
        mailbox,
    ));

    let (remaining, (items, _, delimiter, _, mailbox)) = parser(input)?;

    Ok((remaining, (items, delimiter, mailbox)))
}

fn mailbox_list(input: &[u8]) -> IMAPResult<&[u8], Data> {
    map(mailbox_list_parts, |(items, delimiter, mailbox)| {
        Data::List {
            items,
            delimiter,
            mailbox,
        }
    })(input)
}

fn mailbox_list_lsub(input: &[u8]) -> IMAPResult<&[u8], Data> {
    map(mailbox_list_parts, |(items, delimiter, mailbox)| {
        Data::Lsub {
            items,
            delimiter,
            mailbox,
        }
    })(input)
}

#[cfg(test)]
mod tests {
    use imap_stream_types::flag::FlagFetch;

    use super::*;

    #[test]
    fn test_parse_mailbox() {
        let (_, val) = mailbox(b"iNbOx ").unwrap();
        assert_eq!(val, Mailbox::Inbox);

        let (_, val) = mailbox(b"Archive ").unwrap();
        assert!(matches!(val, Mailbox::Other(_)));
    }

    #[test]
    fn test_parse_mailbox_data_list() {
        let (rem, val) = mailbox_data(b"LIST (\\Noselect) \"/\" foo\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(
            val,
            Data::List {
                items: vec![FlagNameAttribute::Noselect],
                delimiter: Some(QuotedChar::try_from('/').unwrap()),
                mailbox: Mailbox::try_from("foo").unwrap(),
            }
        );

        // NIL delimiter.
        let (_, val) = mailbox_data(b"LIST () NIL foo\r\n").unwrap();
        assert!(matches!(val, Data::List { delimiter: None, .. }));
    }

    #[test]
    fn test_parse_mailbox_data_search() {
        let (rem, val) = mailbox_data(b"SEARCH 1 2 42\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(
            val,
            Data::Search {
                seqs: vec![
                    1.try_into().unwrap(),
                    2.try_into().unwrap(),
                    42.try_into().unwrap()
                ],
                mod_seq: None,
            }
        );

        // Empty result.
        let (_, val) = mailbox_data(b"SEARCH\r\n").unwrap();
        assert_eq!(
            val,
            Data::Search {
                seqs: vec![],
                mod_seq: None
            }
        );

        // With MODSEQ (RFC 7162).
        let (_, val) = mailbox_data(b"SEARCH 2 5 6 (MODSEQ 917162500)\r\n").unwrap();
        assert!(matches!(
            val,
            Data::Search {
                mod_seq: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_mailbox_data_flags() {
        let (_, val) = mailbox_data(b"FLAGS (\\Answered \\Seen)\r\n").unwrap();
        assert_eq!(
            val,
            Data::Flags(vec![
                FlagFetch::Flag(imap_stream_types::flag::Flag::Answered),
                FlagFetch::Flag(imap_stream_types::flag::Flag::Seen),
            ])
        );
    }

    #[test]
    fn test_parse_mailbox_data_exists_recent() {
        let (_, val) = mailbox_data(b"42 EXISTS\r\n").unwrap();
        assert_eq!(val, Data::Exists(42));

        let (_, val) = mailbox_data(b"0 RECENT\r\n").unwrap();
        assert_eq!(val, Data::Recent(0));
    }
}
