//! Utilities shared between the data model and the codec.

use std::borrow::Cow;

/// Predicates mirroring the character classes of IMAP's formal syntax.
pub mod indicators {
    /// `list-wildcards = "%" / "*"`
    pub fn is_list_wildcards(i: u8) -> bool {
        i == b'%' || i == b'*'
    }

    /// `quoted-specials = DQUOTE / "\"`
    pub fn is_quoted_specials(i: u8) -> bool {
        i == b'"' || i == b'\\'
    }

    /// `resp-specials = "]"`
    pub fn is_resp_specials(i: u8) -> bool {
        i == b']'
    }

    /// `CHAR = %x01-7F`
    pub fn is_char(i: u8) -> bool {
        matches!(i, 0x01..=0x7f)
    }

    /// `CTL = %x00-1F / %x7F`
    pub fn is_ctl(i: u8) -> bool {
        matches!(i, 0x00..=0x1f | 0x7f)
    }

    /// `ATOM-CHAR = <any CHAR except atom-specials>`
    ///
    /// `atom-specials = "(" / ")" / "{" / SP / CTL / list-wildcards / quoted-specials / resp-specials`
    pub fn is_atom_char(b: u8) -> bool {
        match b {
            b'(' | b')' | b'{' | b' ' => false,
            c if is_ctl(c) => false,
            c if is_list_wildcards(c) => false,
            c if is_quoted_specials(c) => false,
            c if is_resp_specials(c) => false,
            c => is_char(c),
        }
    }

    /// `ASTRING-CHAR = ATOM-CHAR / resp-specials`
    pub fn is_astring_char(i: u8) -> bool {
        is_atom_char(i) || is_resp_specials(i)
    }

    /// `CHAR8 = %x01-ff`
    ///
    /// Any octet except NUL.
    pub fn is_char8(i: u8) -> bool {
        i != 0
    }

    /// `TEXT-CHAR = <any CHAR except CR and LF>`
    pub fn is_text_char(c: u8) -> bool {
        is_char(c) && c != b'\r' && c != b'\n'
    }

    /// `QUOTED-CHAR` without the escaped alternative.
    pub fn is_any_text_char_except_quoted_specials(byte: u8) -> bool {
        is_text_char(byte) && !is_quoted_specials(byte)
    }

    /// `tag = 1*<any ASTRING-CHAR except "+">`
    pub fn is_tag_char(b: u8) -> bool {
        is_astring_char(b) && b != b'+'
    }

    /// `list-char = ATOM-CHAR / list-wildcards / resp-specials`
    pub fn is_list_char(i: u8) -> bool {
        is_atom_char(i) || is_list_wildcards(i) || is_resp_specials(i)
    }
}

/// Replace `\` with `\\` and `"` with `\"`.
///
/// Only allocates when an escape is required.
pub fn escape_quoted(unescaped: &str) -> Cow<str> {
    let mut escaped = Cow::Borrowed(unescaped);

    if escaped.contains('\\') {
        escaped = Cow::Owned(escaped.replace('\\', "\\\\"));
    }

    if escaped.contains('"') {
        escaped = Cow::Owned(escaped.replace('"', "\\\""));
    }

    escaped
}

/// Undo [`escape_quoted`].
pub fn unescape_quoted(escaped: &str) -> Cow<str> {
    let mut unescaped = Cow::Borrowed(escaped);

    if unescaped.contains("\\\\") {
        unescaped = Cow::Owned(unescaped.replace("\\\\", "\\"));
    }

    if unescaped.contains("\\\"") {
        unescaped = Cow::Owned(unescaped.replace("\\\"", "\""));
    }

    unescaped
}

/// Escape a byte sequence for display in tests and diagnostics.
///
/// All bytes outside the printable ASCII range are rendered as `\x??`.
pub fn escape_byte_string<B: AsRef<[u8]>>(bytes: B) -> String {
    bytes
        .as_ref()
        .iter()
        .map(|byte| match byte {
            0x20..=0x21 | 0x23..=0x5b | 0x5d..=0x7e => format!("{}", *byte as char),
            0x22 => String::from("\\\""),
            0x5c => String::from("\\\\"),
            _ => format!("\\x{:02x}", byte),
        })
        .collect::<Vec<String>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted("alice"), "alice");
        assert_eq!(escape_quoted("\\alice\\"), "\\\\alice\\\\");
        assert_eq!(escape_quoted("alice\""), "alice\\\"");
        assert_eq!(escape_quoted(r#"\alice\ ""#), r#"\\alice\\ \""#);
    }

    #[test]
    fn test_unescape_quoted() {
        assert_eq!(unescape_quoted("alice"), "alice");
        assert_eq!(unescape_quoted("\\\\alice\\\\"), "\\alice\\");
        assert_eq!(unescape_quoted("alice\\\""), "alice\"");
        assert_eq!(unescape_quoted(r#"\\alice\\ \""#), r#"\alice\ ""#);
    }

    #[test]
    fn test_that_unescape_is_inverse_of_escape() {
        let input = "\\\"";

        assert_eq!(input, unescape_quoted(escape_quoted(input).as_ref()));
    }

    #[test]
    fn test_escape_byte_string() {
        assert_eq!(escape_byte_string(b"a \\\x00\xff"), "a \\\\\\x00\\xff");
    }
}
