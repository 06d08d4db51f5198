//! The IMAP BINARY extension (RFC 3516).

use std::{borrow::Cow, num::NonZeroU32};

use imap_stream_types::{
    core::Vec1,
    extensions::binary::Literal8,
    fetch::Part,
};
use nom::{
    bytes::streaming::{tag, take},
    combinator::map,
    multi::separated_list0,
    sequence::{delimited, tuple},
};

use crate::{
    core::{literal_header, number, nz_number},
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
};

/// ```abnf
/// literal8 = "~{" number ["+"] "}" CRLF *OCTET
///             ; <number> represents the number of OCTETs
///             ; in the response string.
/// ```
///
/// The `["+"]` was added by RFC 7888. Unlike a plain literal, the body may
/// contain any octet, including NUL.
pub(crate) fn literal8(input: &[u8]) -> IMAPResult<&[u8], Literal8> {
    let (remaining, (length, mode, binary)) = literal_header(input)?;

    // Without the tilde this is a plain literal.
    if !binary {
        return Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::Nom(nom::error::ErrorKind::Tag),
        }));
    }

    // An announcement at the end of the input may require a continuation
    // request; raise the literal signal instead of `Incomplete`.
    if remaining.is_empty() {
        return Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::Literal {
                tag: None,
                length,
                mode,
                binary: true,
            },
        }));
    }

    let (remaining, data) = take(length)(remaining)?;

    Ok((
        remaining,
        Literal8 {
            data: Cow::Borrowed(data),
            mode,
        },
    ))
}

/// `section-binary = "[" [section-part] "]"`
pub(crate) fn section_binary(input: &[u8]) -> IMAPResult<&[u8], Option<Part>> {
    map(
        delimited(
            tag(b"["),
            separated_list0(tag(b"."), nz_number),
            tag(b"]"),
        ),
        |part| {
            if part.is_empty() {
                None
            } else {
                Some(Part(Vec1::unvalidated(part)))
            }
        },
    )(input)
}

/// `partial = "<" number "." nz-number ">"`
pub(crate) fn partial(input: &[u8]) -> IMAPResult<&[u8], (u32, NonZeroU32)> {
    map(
        delimited(
            tag(b"<"),
            tuple((number, tag(b"."), nz_number)),
            tag(b">"),
        ),
        |(start, _, end)| (start, end),
    )(input)
}

#[cfg(test)]
mod tests {
    use imap_stream_types::core::LiteralMode;

    use super::*;

    #[test]
    fn test_parse_literal8() {
        let (rem, val) = literal8(b"~{5}\r\nab\x00dexxx").unwrap();
        assert_eq!(rem, b"xxx");
        // A binary literal may contain NUL.
        assert_eq!(val.data.as_ref(), b"ab\x00de");
        assert_eq!(val.mode, LiteralMode::Sync);

        let (_, val) = literal8(b"~{2+}\r\nab ").unwrap();
        assert_eq!(val.mode, LiteralMode::NonSync);
    }

    #[test]
    fn test_parse_section_binary() {
        let (rem, val) = section_binary(b"[]?").unwrap();
        assert_eq!(rem, b"?");
        assert!(val.is_none());

        let (rem, val) = section_binary(b"[1.2.3]?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(val.unwrap().0.as_ref().len(), 3);
    }
}
