//! The IMAP METADATA extension (RFC 5464).

use abnf_core::streaming::sp;
use imap_stream_types::{
    command::CommandBody,
    core::Vec1,
    extensions::{
        binary::NString8,
        metadata::{
            Entry, EntryValue, GetMetadataOption, MetadataCode, MetadataDepth, MetadataResponse,
        },
    },
    response::Data,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{astring, nstring, number},
    decode::IMAPResult,
    extensions::binary::literal8,
    mailbox::mailbox,
};

/// ```abnf
/// entry = astring
///         ; slash-separated path to entry
/// ```
pub(crate) fn entry(input: &[u8]) -> IMAPResult<&[u8], Entry> {
    map(astring, Entry)(input)
}

/// ```abnf
/// entry-values = "(" entry-value *(SP entry-value) ")"
/// entry-value  = entry SP value
/// value        = nstring / literal8
/// ```
fn entry_values(input: &[u8]) -> IMAPResult<&[u8], Vec1<EntryValue>> {
    map(
        delimited(tag(b"("), separated_list1(sp, entry_value), tag(b")")),
        Vec1::unvalidated,
    )(input)
}

fn entry_value(input: &[u8]) -> IMAPResult<&[u8], EntryValue> {
    let mut parser = tuple((
        entry,
        sp,
        alt((
            map(nstring, NString8::NString),
            map(literal8, NString8::Literal8),
        )),
    ));

    let (remaining, (entry, _, value)) = parser(input)?;

    Ok((remaining, EntryValue { entry, value }))
}

/// ```abnf
/// entry-list = entry *(SP entry)
/// ```
fn entry_list(input: &[u8]) -> IMAPResult<&[u8], Vec1<Entry>> {
    map(separated_list1(sp, entry), Vec1::unvalidated)(input)
}

/// ```abnf
/// setmetadata = "SETMETADATA" SP mailbox SP entry-values
/// ```
pub(crate) fn setmetadata(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"SETMETADATA "), mailbox, sp, entry_values));

    let (remaining, (_, mailbox, _, entries)) = parser(input)?;

    Ok((remaining, CommandBody::SetMetadata { mailbox, entries }))
}

/// ```abnf
/// getmetadata = "GETMETADATA" [SP getmetadata-options] SP mailbox SP entries
/// entries     = entry / "(" entry-list ")"
/// ```
pub(crate) fn getmetadata(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"GETMETADATA"),
        opt(preceded(sp, getmetadata_options)),
        sp,
        mailbox,
        sp,
        alt((
            delimited(tag(b"("), entry_list, tag(b")")),
            map(entry, Vec1::from),
        )),
    ));

    let (remaining, (_, options, _, mailbox, _, entries)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::GetMetadata {
            options: options.unwrap_or_default(),
            mailbox,
            entries,
        },
    ))
}

/// ```abnf
/// getmetadata-options = "(" getmetadata-option *(SP getmetadata-option) ")"
/// getmetadata-option  = "MAXSIZE" SP number / "DEPTH" SP ("0" / "1" / "infinity")
/// ```
fn getmetadata_options(input: &[u8]) -> IMAPResult<&[u8], Vec<GetMetadataOption>> {
    delimited(
        tag(b"("),
        separated_list1(sp, getmetadata_option),
        tag(b")"),
    )(input)
}

fn getmetadata_option(input: &[u8]) -> IMAPResult<&[u8], GetMetadataOption> {
    alt((
        map(
            preceded(tag_no_case(b"MAXSIZE "), number),
            GetMetadataOption::MaxSize,
        ),
        map(
            preceded(tag_no_case(b"DEPTH "), metadata_depth),
            GetMetadataOption::Depth,
        ),
    ))(input)
}

fn metadata_depth(input: &[u8]) -> IMAPResult<&[u8], MetadataDepth> {
    alt((
        value(MetadataDepth::Null, tag(b"0")),
        value(MetadataDepth::One, tag(b"1")),
        value(MetadataDepth::Infinity, tag_no_case(b"infinity")),
    ))(input)
}

/// ```abnf
/// metadata-resp = "METADATA" SP mailbox SP (entry-values / entry-list)
/// ```
///
/// Note: The entry-list form (without values) is the unsolicited variant.
pub(crate) fn metadata_resp(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((
        tag_no_case(b"METADATA "),
        mailbox,
        sp,
        alt((
            map(entry_values, MetadataResponse::WithValues),
            map(entry_list, MetadataResponse::WithoutValues),
        )),
    ));

    let (remaining, (_, mailbox, _, items)) = parser(input)?;

    Ok((remaining, Data::Metadata { mailbox, items }))
}

/// The argument of a `METADATA` response code.
///
/// ```abnf
/// resp-text-code =/ "METADATA" SP ("LONGENTRIES" SP number /
///                                  "MAXSIZE" SP number /
///                                  "TOOMANY" / "NOPRIVATE")
/// ```
pub(crate) fn metadata_code(input: &[u8]) -> IMAPResult<&[u8], MetadataCode> {
    alt((
        map(
            preceded(tag_no_case(b"LONGENTRIES "), number),
            MetadataCode::LongEntries,
        ),
        map(
            preceded(tag_no_case(b"MAXSIZE "), number),
            MetadataCode::MaxSize,
        ),
        value(MetadataCode::TooMany, tag_no_case(b"TOOMANY")),
        value(MetadataCode::NoPrivate, tag_no_case(b"NOPRIVATE")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setmetadata() {
        let (rem, val) =
            setmetadata(b"SETMETADATA INBOX (/shared/comment \"My comment\")\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert!(matches!(val, CommandBody::SetMetadata { .. }));
    }

    #[test]
    fn test_parse_getmetadata() {
        let (_, val) = getmetadata(b"GETMETADATA INBOX /shared/comment\r\n").unwrap();
        assert!(matches!(
            val,
            CommandBody::GetMetadata { ref options, .. } if options.is_empty()
        ));

        let (_, val) = getmetadata(
            b"GETMETADATA (MAXSIZE 1024 DEPTH infinity) INBOX (/shared/comment /private/comment)\r\n",
        )
        .unwrap();
        match val {
            CommandBody::GetMetadata {
                options, entries, ..
            } => {
                assert_eq!(options.len(), 2);
                assert_eq!(entries.len(), 2);
            }
            _ => panic!("expected GETMETADATA"),
        }
    }

    #[test]
    fn test_parse_metadata_resp() {
        let (_, val) =
            metadata_resp(b"METADATA INBOX (/shared/comment \"Shared comment\")\r\n").unwrap();
        assert!(matches!(
            val,
            Data::Metadata {
                items: MetadataResponse::WithValues(_),
                ..
            }
        ));

        let (_, val) = metadata_resp(b"METADATA INBOX /shared/comment /private/comment\r\n")
            .unwrap();
        assert!(matches!(
            val,
            Data::Metadata {
                items: MetadataResponse::WithoutValues(_),
                ..
            }
        ));
    }
}
