use abnf_core::streaming::sp;
use imap_stream_types::status::{StatusDataItem, StatusDataItemName};
use nom::{
    branch::alt,
    bytes::streaming::tag_no_case,
    combinator::{map, value},
    multi::separated_list0,
    sequence::tuple,
};

use crate::{
    core::{number, number64, nz_number},
    decode::IMAPResult,
    extensions::condstore_qresync::mod_sequence_valzer,
};

/// ```abnf
/// status-att = "MESSAGES" / "RECENT" / "UIDNEXT" / "UIDVALIDITY" / "UNSEEN" /
///              "SIZE" /          ; STATUS=SIZE
///              "HIGHESTMODSEQ"   ; RFC 7162
/// ```
pub(crate) fn status_att(input: &[u8]) -> IMAPResult<&[u8], StatusDataItemName> {
    alt((
        value(StatusDataItemName::Messages, tag_no_case(b"MESSAGES")),
        value(StatusDataItemName::Recent, tag_no_case(b"RECENT")),
        value(StatusDataItemName::UidNext, tag_no_case(b"UIDNEXT")),
        value(StatusDataItemName::UidValidity, tag_no_case(b"UIDVALIDITY")),
        value(StatusDataItemName::Unseen, tag_no_case(b"UNSEEN")),
        value(StatusDataItemName::Size, tag_no_case(b"SIZE")),
        value(
            StatusDataItemName::HighestModSeq,
            tag_no_case(b"HIGHESTMODSEQ"),
        ),
    ))(input)
}

/// `status-att-list = status-att-val *(SP status-att-val)` (edited)
///
/// An empty list is allowed (`STATUS <mailbox> ()` responses occur in the
/// wild for mailboxes the server knows nothing about).
pub(crate) fn status_att_list(input: &[u8]) -> IMAPResult<&[u8], Vec<StatusDataItem>> {
    separated_list0(sp, status_att_val)(input)
}

/// ```abnf
/// status-att-val = "MESSAGES" SP number /
///                  "RECENT" SP number /
///                  "UIDNEXT" SP nz-number /
///                  "UIDVALIDITY" SP nz-number /
///                  "UNSEEN" SP number /
///                  "SIZE" SP number64 /
///                  "HIGHESTMODSEQ" SP mod-sequence-valzer
/// ```
fn status_att_val(input: &[u8]) -> IMAPResult<&[u8], StatusDataItem> {
    alt((
        map(
            tuple((tag_no_case(b"MESSAGES"), sp, number)),
            |(_, _, num)| StatusDataItem::Messages(num),
        ),
        map(
            tuple((tag_no_case(b"RECENT"), sp, number)),
            |(_, _, num)| StatusDataItem::Recent(num),
        ),
        map(
            tuple((tag_no_case(b"UIDNEXT"), sp, nz_number)),
            |(_, _, next)| StatusDataItem::UidNext(next),
        ),
        map(
            tuple((tag_no_case(b"UIDVALIDITY"), sp, nz_number)),
            |(_, _, val)| StatusDataItem::UidValidity(val),
        ),
        map(
            tuple((tag_no_case(b"UNSEEN"), sp, number)),
            |(_, _, num)| StatusDataItem::Unseen(num),
        ),
        map(
            tuple((tag_no_case(b"SIZE"), sp, number64)),
            |(_, _, size)| StatusDataItem::Size(size),
        ),
        map(
            tuple((tag_no_case(b"HIGHESTMODSEQ"), sp, mod_sequence_valzer)),
            |(_, _, mod_seq)| StatusDataItem::HighestModSeq(mod_seq),
        ),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_att_list() {
        let (rem, val) = status_att_list(b"MESSAGES 100 UNSEEN 0)").unwrap();
        assert_eq!(rem, b")");
        assert_eq!(
            val,
            vec![StatusDataItem::Messages(100), StatusDataItem::Unseen(0)]
        );
    }

    #[test]
    fn test_parse_status_att_val_size_and_modseq() {
        let (_, val) = status_att_val(b"SIZE 18446744073709551615)").unwrap();
        assert_eq!(val, StatusDataItem::Size(u64::MAX));

        let (_, val) = status_att_val(b"HIGHESTMODSEQ 0)").unwrap();
        assert!(matches!(val, StatusDataItem::HighestModSeq(_)));

        // 2^63 is out of the mod-sequence domain.
        assert!(matches!(
            status_att_val(b"HIGHESTMODSEQ 9223372036854775808)"),
            Err(nom::Err::Failure(_))
        ));
    }
}
