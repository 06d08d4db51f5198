use abnf_core::streaming::sp;
use imap_stream_types::{
    core::Vec1,
    flag::{Flag, FlagFetch, FlagNameAttribute, FlagPerm},
};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    multi::separated_list0,
    sequence::{delimited, preceded},
};

use crate::{core::atom, decode::IMAPResult};

/// `flag = "\Answered" / "\Flagged" / "\Deleted" / "\Seen" / "\Draft" /
///         flag-keyword / flag-extension`
///
/// Note: Does not include "\Recent"
pub(crate) fn flag(input: &[u8]) -> IMAPResult<&[u8], Flag> {
    alt((
        map(preceded(tag(b"\\"), atom), Flag::system),
        map(atom, Flag::keyword),
    ))(input)
}

/// `flag-fetch = flag / "\Recent"`
pub(crate) fn flag_fetch(input: &[u8]) -> IMAPResult<&[u8], FlagFetch> {
    alt((
        map(preceded(tag(b"\\"), atom), |atom| {
            // Match on the whole atom so that, e.g., `\Recently` is not cut short.
            if atom.as_ref().eq_ignore_ascii_case("Recent") {
                FlagFetch::Recent
            } else {
                FlagFetch::Flag(Flag::system(atom))
            }
        }),
        map(flag, FlagFetch::Flag),
    ))(input)
}

/// `flag-perm = flag / "\*"`
pub(crate) fn flag_perm(input: &[u8]) -> IMAPResult<&[u8], FlagPerm> {
    alt((
        value(FlagPerm::Asterisk, tag(b"\\*")),
        map(flag, FlagPerm::Flag),
    ))(input)
}

/// `flag-list = "(" [flag *(SP flag)] ")"`
pub(crate) fn flag_list(input: &[u8]) -> IMAPResult<&[u8], Vec<Flag>> {
    delimited(tag(b"("), separated_list0(sp, flag), tag(b")"))(input)
}

/// `mbx-list-flags = *(mbx-list-oflag SP) mbx-list-sflag *(SP mbx-list-oflag) /
///                   mbx-list-oflag *(SP mbx-list-oflag)`
///
/// Simplified: all flags are parsed alike and, where needed, checked by the
/// caller via [`FlagNameAttribute::is_selectability`].
pub(crate) fn mbx_list_flags(input: &[u8]) -> IMAPResult<&[u8], Vec<FlagNameAttribute>> {
    separated_list0(
        sp,
        map(preceded(tag(b"\\"), atom), FlagNameAttribute::from),
    )(input)
}

#[cfg(test)]
mod tests {
    use imap_stream_types::flag::Keyword;

    use super::*;
    use crate::testing::known_answer_test_encode;

    #[test]
    fn test_parse_flag_fetch() {
        let (rem, val) = flag_fetch(b"\\recent ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(val, FlagFetch::Recent);

        let (rem, val) = flag_fetch(b"\\SEEN ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(val, FlagFetch::Flag(Flag::Seen));
    }

    #[test]
    fn test_parse_flag_keyword_canonicalization() {
        let (_, val) = flag(b"$forwarded ").unwrap();
        assert_eq!(val, Flag::Keyword(Keyword::Forwarded));

        let (_, val) = flag(b"$MDNSENT ").unwrap();
        assert_eq!(val, Flag::Keyword(Keyword::MdnSent));

        // Unknown keywords keep their wire bytes.
        let (_, val) = flag(b"SomeThing ").unwrap();
        assert_eq!(
            val,
            Flag::Keyword(Keyword::Other("SomeThing".try_into().unwrap()))
        );
    }

    #[test]
    fn test_parse_flag_list() {
        let (rem, val) = flag_list(b"(\\Seen \\Draft)?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(val, vec![Flag::Seen, Flag::Draft]);

        let (rem, val) = flag_list(b"()?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(val, vec![]);
    }

    #[test]
    fn test_encode_flag() {
        let tests = [
            (Flag::Seen, b"\\Seen".as_ref()),
            (Flag::try_from("\\answered").unwrap(), b"\\Answered"),
            (Flag::Keyword(Keyword::Forwarded), b"$Forwarded"),
            (Flag::Keyword(Keyword::MailFlagBit1), b"$MailFlagBit1"),
        ];

        for test in tests {
            known_answer_test_encode(test);
        }
    }
}
