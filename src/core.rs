//! Lexical primitives.
//!
//! The parsers in this module consume one lexical unit each — an atom, a
//! string in one of its wire forms, a number, a tag — and are the building
//! blocks every production in the other modules is assembled from. All of
//! them follow the streaming convention: running out of input is
//! `Incomplete`, a mismatch on unconsumed input is a recoverable `Error`,
//! and a structurally impossible input is a `Failure`.

use std::{borrow::Cow, num::NonZeroU32, str::from_utf8};

#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::{is_alpha, is_digit, streaming::dquote};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use imap_stream_types::{
    core::{
        AString, Atom, AtomExt, Charset, IString, Literal, LiteralMode, NString, Quoted,
        QuotedChar, Tag, Text,
    },
    utils::{
        indicators::{
            is_any_text_char_except_quoted_specials, is_astring_char, is_atom_char, is_text_char,
        },
        unescape_quoted,
    },
};
use nom::{
    branch::alt,
    bytes::streaming::{escaped, tag, tag_no_case, take, take_while, take_while1, take_while_m_n},
    character::streaming::{char, digit1, one_of},
    combinator::{map, opt, recognize},
    sequence::{delimited, pair, terminated, tuple},
};

use crate::decode::{IMAPErrorKind, IMAPParseError, IMAPResult};

/// View a run of class-checked bytes as `&str`.
///
/// Every character class used in this module is a subset of ASCII, so the
/// conversion cannot fail.
fn ascii_str(bytes: &[u8]) -> &str {
    from_utf8(bytes).expect("byte class is ASCII-only")
}

// ----- character runs -----

/// `atom = 1*ATOM-CHAR`
pub(crate) fn atom(input: &[u8]) -> IMAPResult<&[u8], Atom> {
    map(take_while1(is_atom_char), |run| {
        Atom::unvalidated(ascii_str(run))
    })(input)
}

/// `1*ASTRING-CHAR`, i.e., an atom that may also contain `]`.
fn atom_ext(input: &[u8]) -> IMAPResult<&[u8], AtomExt> {
    map(take_while1(is_astring_char), |run| {
        AtomExt::unvalidated(Cow::Borrowed(ascii_str(run)))
    })(input)
}

/// `astring = 1*ASTRING-CHAR / string`
pub(crate) fn astring(input: &[u8]) -> IMAPResult<&[u8], AString> {
    alt((map(atom_ext, AString::Atom), map(string, AString::String)))(input)
}

/// `text = 1*TEXT-CHAR`
pub(crate) fn text(input: &[u8]) -> IMAPResult<&[u8], Text> {
    map(take_while1(is_text_char), |run| {
        Text::unvalidated(ascii_str(run))
    })(input)
}

/// `tag = 1*<any ASTRING-CHAR except "+">`
///
/// Tags longer than 255 bytes are cut short here and rejected by the
/// surrounding grammar.
pub(crate) fn tag_imap(input: &[u8]) -> IMAPResult<&[u8], Tag> {
    map(
        take_while_m_n(1, Tag::MAX_LENGTH, |b| is_astring_char(b) && b != b'+'),
        |run| Tag::unvalidated(ascii_str(run)),
    )(input)
}

// ----- strings -----

/// `string = quoted / literal`
pub(crate) fn string(input: &[u8]) -> IMAPResult<&[u8], IString> {
    alt((map(quoted, IString::Quoted), map(literal, IString::Literal)))(input)
}

/// `quoted = DQUOTE *QUOTED-CHAR DQUOTE`
///
/// The returned value is unescaped; an allocation only happens when the
/// input actually contains `\\` or `\"` sequences.
pub(crate) fn quoted(input: &[u8]) -> IMAPResult<&[u8], Quoted> {
    let (remaining, escaped_text) = delimited(
        dquote,
        map(
            escaped(
                take_while1(is_any_text_char_except_quoted_specials),
                '\\',
                one_of("\\\""),
            ),
            ascii_str,
        ),
        dquote,
    )(input)?;

    Ok((remaining, Quoted::unvalidated(unescape_quoted(escaped_text))))
}

/// `QUOTED-CHAR = <any TEXT-CHAR except quoted-specials> / "\" quoted-specials`
pub(crate) fn quoted_char(input: &[u8]) -> IMAPResult<&[u8], QuotedChar> {
    alt((
        map(preceded_backslash_special, QuotedChar::unvalidated),
        map(
            take_while_m_n(1, 1, is_any_text_char_except_quoted_specials),
            |plain: &[u8]| QuotedChar::unvalidated(plain[0] as char),
        ),
    ))(input)
}

/// `"\" quoted-specials`
fn preceded_backslash_special(input: &[u8]) -> IMAPResult<&[u8], char> {
    let (remaining, (_, special)) = pair(char('\\'), one_of("\\\""))(input)?;

    Ok((remaining, special))
}

/// `nstring = string / nil`
pub(crate) fn nstring(input: &[u8]) -> IMAPResult<&[u8], NString> {
    alt((
        map(nil, |_| NString(None)),
        map(string, |value| NString(Some(value))),
    ))(input)
}

#[inline]
/// `nil = "NIL"`
pub(crate) fn nil(input: &[u8]) -> IMAPResult<&[u8], &[u8]> {
    tag_no_case(b"NIL")(input)
}

// ----- literals -----

/// A literal announcement, i.e., `"{" number ["+"] "}" CRLF` or (RFC 3516)
/// `"~{" number ["+"] "}" CRLF`.
///
/// Returns the octet count, the literal mode, and whether the binary form
/// was used. The announced bytes are *not* consumed; the streamed APPEND
/// and FETCH paths feed them through chunk by chunk.
pub(crate) fn literal_header(input: &[u8]) -> IMAPResult<&[u8], (u32, LiteralMode, bool)> {
    let (remaining, (binary, (length, mode))) = terminated(
        tuple((
            map(opt(char('~')), |tilde| tilde.is_some()),
            delimited(
                tag(b"{"),
                tuple((
                    number,
                    map(opt(char('+')), |plus| match plus {
                        Some(_) => LiteralMode::NonSync,
                        None => LiteralMode::Sync,
                    }),
                )),
                tag(b"}"),
            ),
        )),
        crlf,
    )(input)?;

    Ok((remaining, (length, mode, binary)))
}

/// `literal = "{" number ["+"] "}" CRLF *CHAR8`
///
/// The `["+"]` is the non-synchronizing form of RFC 7888. The binary
/// `~{n}` form is *not* accepted here; see
/// [`literal8`](crate::extensions::binary::literal8).
///
/// When the announcement sits at the very end of the input, a `Failure`
/// carrying the announcement is raised instead of `Incomplete`: the peer
/// may be waiting for a continuation request, and the caller must be able
/// to tell this apart from a short read.
pub(crate) fn literal(input: &[u8]) -> IMAPResult<&[u8], Literal> {
    let (remaining, (length, mode, binary)) = literal_header(input)?;

    if binary {
        return Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::Nom(nom::error::ErrorKind::Tag),
        }));
    }

    if remaining.is_empty() {
        return Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::Literal {
                // The tag is filled in by the `command` parser.
                tag: None,
                length,
                mode,
                binary: false,
            },
        }));
    }

    let (remaining, data) = take(length)(remaining)?;

    match Literal::try_from(data) {
        Ok(mut literal) => {
            literal.set_mode(mode);

            Ok((remaining, literal))
        }
        Err(_) => Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::LiteralContainsNull,
        })),
    }
}

// ----- numbers -----

/// `number = 1*DIGIT`
///
/// Unsigned 32-bit integer; longer digit runs are a recoverable mismatch.
pub(crate) fn number(input: &[u8]) -> IMAPResult<&[u8], u32> {
    let (remaining, digits) = digit1(input)?;

    match ascii_str(digits).parse::<u32>() {
        Ok(number) => Ok((remaining, number)),
        Err(_) => Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadNumber,
        })),
    }
}

/// ```abnf
/// number64 = 1*DIGIT
/// ```
///
/// Unsigned 64-bit integer (RFC 9051). Callers with a narrower domain,
/// e.g., the 63-bit mod-sequence, bound the value themselves.
pub(crate) fn number64(input: &[u8]) -> IMAPResult<&[u8], u64> {
    let (remaining, digits) = digit1(input)?;

    match ascii_str(digits).parse::<u64>() {
        Ok(number) => Ok((remaining, number)),
        Err(_) => Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadNumber,
        })),
    }
}

/// `nz-number = digit-nz *DIGIT`
pub(crate) fn nz_number(input: &[u8]) -> IMAPResult<&[u8], NonZeroU32> {
    let (remaining, value) = number(input)?;

    match NonZeroU32::new(value) {
        Some(value) => Ok((remaining, value)),
        None => Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadNumber,
        })),
    }
}

// ----- charset & base64 -----

/// `charset = atom / quoted`
///
/// The quoted alternative exists per errata id 261.
pub(crate) fn charset(input: &[u8]) -> IMAPResult<&[u8], Charset> {
    alt((map(atom, Charset::Atom), map(quoted, Charset::Quoted)))(input)
}

/// `base64 = *(4base64-char) [base64-terminal]`
pub(crate) fn base64(input: &[u8]) -> IMAPResult<&[u8], Vec<u8>> {
    let (remaining, encoded) = recognize(pair(
        take_while(is_base64_char),
        opt(alt((tag(b"=="), tag(b"=")))),
    ))(input)?;

    match BASE64.decode(encoded) {
        Ok(decoded) => Ok((remaining, decoded)),
        Err(_) => Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadBase64,
        })),
    }
}

/// `base64-char = ALPHA / DIGIT / "+" / "/" ; Case-sensitive`
pub(crate) fn is_base64_char(i: u8) -> bool {
    is_alpha(i) || is_digit(i) || i == b'+' || i == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{EncodeContext, EncodeIntoContext};

    #[test]
    fn test_parse_atom_stops_at_delimiters() {
        let tests = [
            (b"box99 ".as_ref(), "box99", b" ".as_ref()),
            (b"$Forwarded)", "$Forwarded", b")"),
            (b"a(b", "a", b"(b"),
        ];

        for (input, expected, expected_remainder) in tests {
            let (remainder, got) = atom(input).unwrap();
            assert_eq!(got, Atom::try_from(expected).unwrap());
            assert_eq!(remainder, expected_remainder);
        }

        // An atom needs at least one char; a run of atom chars at the end
        // of the input may still grow.
        assert!(atom(b"(").is_err());
        assert!(matches!(atom(b"box"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_parse_astring_shapes() {
        // `]` is fine in an astring but not in an atom.
        let (_, got) = astring(b"box]9 ").unwrap();
        assert!(matches!(got, AString::Atom(_)));

        let (_, got) = astring(b"\"two words\" ").unwrap();
        assert!(matches!(got, AString::String(IString::Quoted(_))));

        let (_, got) = astring(b"{2}\r\nhi ").unwrap();
        assert!(matches!(got, AString::String(IString::Literal(_))));
    }

    #[test]
    fn test_parse_quoted_unescapes() {
        let (remainder, got) = quoted(b"\"plain\" ").unwrap();
        assert_eq!(remainder, b" ");
        assert_eq!(got, Quoted::try_from("plain").unwrap());

        let (_, got) = quoted(br#""say \"hi\" \\ back" "#).unwrap();
        assert_eq!(got, Quoted::try_from(r#"say "hi" \ back"#).unwrap());

        // Only `\\` and `\"` are escapes.
        assert!(quoted(br#""bad \n escape" "#).is_err());

        // An unterminated quoted string may still grow.
        assert!(matches!(quoted(b"\"open"), Err(nom::Err::Incomplete(_))));
        assert!(matches!(quoted(b"\"end\\"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_parse_quoted_char_forms() {
        let (remainder, got) = quoted_char(b"/x").unwrap();
        assert_eq!(remainder, b"x");
        assert_eq!(got.inner(), '/');

        let (_, got) = quoted_char(b"\\\\x").unwrap();
        assert_eq!(got.inner(), '\\');

        let (_, got) = quoted_char(b"\\\"x").unwrap();
        assert_eq!(got.inner(), '"');
    }

    #[test]
    fn test_parse_literal_bodies() {
        let (remainder, got) = literal(b"{3}\r\nabcxyz").unwrap();
        assert_eq!(remainder, b"xyz");
        assert_eq!(got.data(), b"abc");
        assert_eq!(got.mode(), LiteralMode::Sync);

        let (_, got) = literal(b"{3+}\r\nabc ").unwrap();
        assert_eq!(got.mode(), LiteralMode::NonSync);

        // A zero-length body is fine, NUL inside a body is not.
        assert!(literal(b"{0}\r\nx").is_ok());
        assert!(matches!(
            literal(b"{3}\r\na\x00c "),
            Err(nom::Err::Failure(_))
        ));

        // An announcement at the end of the input raises the literal
        // signal rather than `Incomplete`.
        match literal(b"{3}\r\n") {
            Err(nom::Err::Failure(error)) => {
                assert!(matches!(
                    error.kind,
                    IMAPErrorKind::Literal {
                        length: 3,
                        mode: LiteralMode::Sync,
                        ..
                    }
                ));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // The binary form belongs to `literal8`.
        assert!(matches!(literal(b"~{3}\r\nabc "), Err(nom::Err::Error(_))));
    }

    #[test]
    fn test_parse_literal_header_forms() {
        let tests = [
            (b"{42}\r\n".as_ref(), (42, LiteralMode::Sync, false)),
            (b"{42+}\r\n", (42, LiteralMode::NonSync, false)),
            (b"~{42}\r\n", (42, LiteralMode::Sync, true)),
            (b"~{42+}\r\n", (42, LiteralMode::NonSync, true)),
        ];

        for (input, expected) in tests {
            let (remainder, got) = literal_header(input).unwrap();
            assert_eq!(remainder, b"");
            assert_eq!(got, expected);
        }

        assert!(matches!(
            literal_header(b"{42"),
            Err(nom::Err::Incomplete(_))
        ));
        assert!(literal_header(b"{}\r\n").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(number(b"0 ").unwrap().1, 0);
        assert_eq!(number(b"4294967295 ").unwrap().1, u32::MAX);
        // Out of the 32-bit domain.
        assert!(number(b"4294967296 ").is_err());

        assert_eq!(number64(b"4294967296 ").unwrap().1, 4_294_967_296);

        assert_eq!(nz_number(b"17 ").unwrap().1.get(), 17);
        assert!(nz_number(b"0 ").is_err());
        assert!(nz_number(b"x").is_err());
    }

    #[test]
    fn test_parse_nil_and_nstring() {
        assert!(nil(b"NIL ").is_ok());
        assert!(nil(b"nIl ").is_ok());
        assert!(nil(b" NIL").is_err());

        let (_, got) = nstring(b"NIL ").unwrap();
        assert_eq!(got, NString(None));

        let (_, got) = nstring(b"\"x\" ").unwrap();
        assert!(got.0.is_some());
    }

    #[test]
    fn test_parse_tag_length_bound() {
        let long = vec![b'a'; Tag::MAX_LENGTH];
        let mut input = long.clone();
        input.push(b' ');

        let (_, got) = tag_imap(&input).unwrap();
        assert_eq!(got.inner().len(), Tag::MAX_LENGTH);

        // One byte more and the grammar around the tag rejects the line;
        // the tag parser itself simply stops.
        let mut input = vec![b'a'; Tag::MAX_LENGTH + 1];
        input.push(b' ');
        let (remainder, _) = tag_imap(&input).unwrap();
        assert_eq!(remainder, b"a ");
    }

    #[test]
    fn test_parse_base64_line() {
        let (remainder, got) = base64(b"VGVzdA==\r\n").unwrap();
        assert_eq!(remainder, b"\r\n");
        assert_eq!(got, b"Test");

        // Stray padding does not decode.
        assert!(base64(b"VGVzdA=\r\n").is_err());
    }

    #[test]
    fn test_encode_charset() {
        let tests = [
            (Charset::try_from("UTF-8").unwrap(), b"UTF-8".as_ref()),
            (Charset::try_from("x y").unwrap(), b"\"x y\""),
            (Charset::try_from("").unwrap(), b"\"\""),
            (Charset::try_from("a\"b").unwrap(), b"\"a\\\"b\""),
        ];

        for (charset, expected) in tests {
            let mut ctx = EncodeContext::new();
            charset.encode_ctx(&mut ctx).unwrap();
            assert_eq!(ctx.dump(), expected);
        }

        assert!(Charset::try_from("line\r\nbreak").is_err());
    }
}
