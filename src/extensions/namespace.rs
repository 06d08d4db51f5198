//! The IMAP NAMESPACE extension (RFC 2342).

use abnf_core::streaming::{dquote, sp};
use imap_stream_types::{
    extensions::namespace::{Namespace, NamespaceDescr},
    core::Vec1,
    response::Data,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, value},
    multi::many1,
    sequence::{delimited, tuple},
};

use crate::{
    core::{nil, quoted_char, string},
    decode::IMAPResult,
};

/// ```abnf
/// Namespace-Response = "NAMESPACE" SP Namespace SP Namespace SP Namespace
/// ```
///
/// The first namespace is the personal namespace(s), the second is the other
/// users' namespace(s), and the third is the shared namespace(s).
pub(crate) fn namespace_response(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((
        tag_no_case(b"NAMESPACE "),
        namespace,
        sp,
        namespace,
        sp,
        namespace,
    ));

    let (remaining, (_, personal, _, other, _, shared)) = parser(input)?;

    Ok((
        remaining,
        Data::Namespace {
            personal,
            other,
            shared,
        },
    ))
}

/// ```abnf
/// Namespace = nil / "(" 1*Namespace-Descr ")"
/// ```
fn namespace(input: &[u8]) -> IMAPResult<&[u8], Namespace> {
    alt((
        value(None, nil),
        map(
            delimited(tag(b"("), many1(namespace_descr), tag(b")")),
            |descrs| Some(Vec1::unvalidated(descrs)),
        ),
    ))(input)
}

/// ```abnf
/// Namespace-Descr = "(" string SP (DQUOTE QUOTED-CHAR DQUOTE / nil) ")"
/// ```
///
/// Note: Namespace response extensions are not generated by this crate and
/// are rejected on parse.
fn namespace_descr(input: &[u8]) -> IMAPResult<&[u8], NamespaceDescr> {
    let mut parser = delimited(
        tag(b"("),
        tuple((
            string,
            sp,
            alt((
                map(delimited(dquote, quoted_char, dquote), Some),
                value(None, nil),
            )),
        )),
        tag(b")"),
    );

    let (remaining, (prefix, _, delimiter)) = parser(input)?;

    Ok((remaining, NamespaceDescr { prefix, delimiter }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespace_response() {
        let (rem, val) =
            namespace_response(b"NAMESPACE ((\"\" \"/\")) NIL NIL\r\n").unwrap();
        assert_eq!(rem, b"\r\n");

        match val {
            Data::Namespace {
                personal,
                other,
                shared,
            } => {
                assert_eq!(personal.unwrap().len(), 1);
                assert!(other.is_none());
                assert!(shared.is_none());
            }
            _ => panic!("expected NAMESPACE"),
        }
    }
}
