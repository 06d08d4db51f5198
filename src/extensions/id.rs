//! The IMAP ID extension (RFC 2971).

use abnf_core::streaming::sp;
use imap_stream_types::core::{IString, NString};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{nil, nstring, string},
    decode::IMAPResult,
};

/// ```abnf
/// id = "ID" SP id-params-list
/// id-params-list = "(" [string SP nstring *(SP string SP nstring)] ")" / nil
/// ```
pub(crate) fn id(input: &[u8]) -> IMAPResult<&[u8], Option<Vec<(IString, NString)>>> {
    preceded(tag_no_case(b"ID "), id_params_list)(input)
}

/// ```abnf
/// id-response = "ID" SP id-params-list
/// ```
pub(crate) fn id_response(input: &[u8]) -> IMAPResult<&[u8], Option<Vec<(IString, NString)>>> {
    id(input)
}

fn id_params_list(input: &[u8]) -> IMAPResult<&[u8], Option<Vec<(IString, NString)>>> {
    alt((
        map(
            delimited(
                tag(b"("),
                separated_list1(
                    sp,
                    map(tuple((string, sp, nstring)), |(key, _, value)| (key, value)),
                ),
                tag(b")"),
            ),
            Some,
        ),
        // Note: `()` is a valid empty list.
        value(Some(vec![]), tag(b"()")),
        value(None, nil),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let (rem, val) = id(b"ID (\"name\" \"sodr\" \"version\" \"19.34\")\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(val.unwrap().len(), 2);

        let (_, val) = id(b"ID NIL\r\n").unwrap();
        assert!(val.is_none());

        let (_, val) = id(b"ID ()\r\n").unwrap();
        assert_eq!(val, Some(vec![]));
    }
}
