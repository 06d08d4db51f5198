//! The IMAP IDLE extension (RFC 2177).

#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use imap_stream_types::{command::CommandBody, extensions::idle::IdleDone};
use nom::{bytes::streaming::tag_no_case, combinator::value, sequence::terminated};

use crate::decode::IMAPResult;

/// `idle = "IDLE" CRLF "DONE"` (edited)
///
/// ```text
/// idle = "IDLE" CRLF "DONE"
///        ^^^^^^
///        |
///        This is parsed here.
///        CRLF is parsed by the upper command parser.
/// ```
///
/// The `DONE` line is a separate message, decoded by [`idle_done`] once the
/// server has sent its continuation request.
pub(crate) fn idle(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    value(CommandBody::Idle, tag_no_case(b"IDLE"))(input)
}

/// `idle = "IDLE" CRLF "DONE"` (edited)
///
/// ```text
/// idle = "IDLE" CRLF "DONE" CRLF
///                    ^^^^^^^^^^^
///                    |
///                    This is parsed here.
/// ```
pub(crate) fn idle_done(input: &[u8]) -> IMAPResult<&[u8], IdleDone> {
    value(IdleDone, terminated(tag_no_case(b"DONE"), crlf))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_idle_done() {
        let (rem, val) = idle_done(b"DONE\r\n?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(val, IdleDone);

        assert!(matches!(idle_done(b"DONE"), Err(nom::Err::Incomplete(_))));
        assert!(idle_done(b"DONEX\r\n").is_err());
    }
}
