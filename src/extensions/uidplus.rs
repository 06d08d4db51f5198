//! The IMAP UIDPLUS extension (RFC 4315).

use abnf_core::streaming::sp;
use imap_stream_types::{command::CommandBody, response::Code};
use nom::{
    bytes::streaming::tag_no_case,
    combinator::map,
    sequence::{preceded, tuple},
};

use crate::{core::nz_number, decode::IMAPResult, sequence::sequence_set};

/// ```abnf
/// uid-expunge = "UID" SP "EXPUNGE" SP sequence-set
/// ```
///
/// Note: The `UID ` prefix is consumed by the upper `uid` parser.
pub(crate) fn uid_expunge(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    map(
        preceded(tag_no_case(b"EXPUNGE "), sequence_set),
        |sequence_set| CommandBody::ExpungeUid { sequence_set },
    )(input)
}

/// ```abnf
/// resp-code-apnd = "APPENDUID" SP nz-number SP append-uid
/// append-uid     = uniqueid / uid-set
/// ```
pub(crate) fn resp_code_apnd(input: &[u8]) -> IMAPResult<&[u8], Code> {
    let mut parser = tuple((
        tag_no_case(b"APPENDUID "),
        nz_number,
        sp,
        sequence_set,
    ));

    let (remaining, (_, uid_validity, _, uid)) = parser(input)?;

    Ok((remaining, Code::AppendUid { uid_validity, uid }))
}

/// ```abnf
/// resp-code-copy = "COPYUID" SP nz-number SP uid-set SP uid-set
/// ```
pub(crate) fn resp_code_copy(input: &[u8]) -> IMAPResult<&[u8], Code> {
    let mut parser = tuple((
        tag_no_case(b"COPYUID "),
        nz_number,
        sp,
        sequence_set,
        sp,
        sequence_set,
    ));

    let (remaining, (_, uid_validity, _, source, _, destination)) = parser(input)?;

    Ok((
        remaining,
        Code::CopyUid {
            uid_validity,
            source,
            destination,
        },
    ))
}
