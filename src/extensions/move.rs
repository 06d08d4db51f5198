//! The IMAP MOVE extension (RFC 6851).

use abnf_core::streaming::sp;
use imap_stream_types::command::CommandBody;
use nom::{bytes::streaming::tag_no_case, sequence::tuple};

use crate::{decode::IMAPResult, mailbox::mailbox, sequence::sequence_set};

/// ```abnf
/// move = "MOVE" SP sequence-set SP mailbox
/// ```
pub(crate) fn r#move(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"MOVE"), sp, sequence_set, sp, mailbox));

    let (remaining, (_, _, sequence_set, _, mailbox)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Move {
            sequence_set,
            mailbox,
            uid: false,
        },
    ))
}

#[cfg(test)]
mod tests {
    use imap_stream_types::{mailbox::Mailbox, sequence::SequenceSet};

    use super::*;

    #[test]
    fn test_parse_move() {
        let (rem, val) = r#move(b"MOVE 1:7 Archive\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(
            val,
            CommandBody::Move {
                sequence_set: SequenceSet::try_from("1:7").unwrap(),
                mailbox: Mailbox::try_from("Archive").unwrap(),
                uid: false,
            }
        );
    }
}
