//! The IMAP CONDSTORE and QRESYNC extensions (RFC 7162).

use abnf_core::streaming::sp;
use imap_stream_types::{
    command::{FetchModifier, SelectParameter, StoreModifier},
    extensions::condstore_qresync::{AttributeFlag, EntryTypeReq, ModSeq, QresyncParameter},
    response::Data,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    character::streaming::char,
    combinator::{map, opt, value},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{atom, number64, nz_number},
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    sequence::sequence_set,
};

/// ```abnf
/// mod-sequence-valzer = "0" / mod-sequence-value
/// ```
///
/// The 63-bit domain is checked here; `2^63` and above is a hard error.
pub(crate) fn mod_sequence_valzer(input: &[u8]) -> IMAPResult<&[u8], ModSeq> {
    let (remaining, value) = number64(input)?;

    match ModSeq::try_from(value) {
        Ok(mod_seq) => Ok((remaining, mod_seq)),
        Err(_) => Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadNumber,
        })),
    }
}

/// Positive mod-sequence (1 <= n < 2^63).
///
/// ```abnf
/// mod-sequence-value = 1*DIGIT
/// ```
pub(crate) fn mod_sequence_value(input: &[u8]) -> IMAPResult<&[u8], ModSeq> {
    let (remaining, mod_seq) = mod_sequence_valzer(input)?;

    if mod_seq == ModSeq::ZERO {
        return Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadNumber,
        }));
    }

    Ok((remaining, mod_seq))
}

/// ```abnf
/// search-modsequence = "MODSEQ" [search-modseq-ext] SP mod-sequence-valzer
/// ```
#[allow(clippy::type_complexity)]
pub(crate) fn search_modsequence(
    input: &[u8],
) -> IMAPResult<&[u8], (Option<(AttributeFlag, EntryTypeReq)>, ModSeq)> {
    preceded(
        tag_no_case(b"MODSEQ"),
        tuple((opt(search_modseq_ext), preceded(sp, mod_sequence_valzer))),
    )(input)
}

/// ```abnf
/// search-modseq-ext = SP entry-name SP entry-type-req
/// ```
pub(crate) fn search_modseq_ext(
    input: &[u8],
) -> IMAPResult<&[u8], (AttributeFlag, EntryTypeReq)> {
    tuple((preceded(sp, entry_flag_name), preceded(sp, entry_type_req)))(input)
}

/// Each system or user-defined flag \<flag\> is mapped to "/flags/\<flag\>".
///
/// \<entry-flag-name\> follows the escape rules of a "quoted" string; e.g.,
/// for the flag `\Seen`, the corresponding entry name is `"/flags/\\seen"`,
/// and for the flag `$MDNSent`, it is `"/flags/$mdnsent"`.
///
/// ```abnf
/// entry-flag-name = DQUOTE "/flags/" attr-flag DQUOTE
/// ```
pub(crate) fn entry_flag_name(input: &[u8]) -> IMAPResult<&[u8], AttributeFlag> {
    delimited(tag_no_case(b"\"/flags/"), attr_flag, char('"'))(input)
}

/// ```abnf
/// attr-flag = "\\Answered" / "\\Flagged" / "\\Deleted" / "\\Seen" / "\\Draft" /
///             attr-flag-keyword / attr-flag-extension
///             ;; Does not include "\\Recent".
/// ```
pub(crate) fn attr_flag(input: &[u8]) -> IMAPResult<&[u8], AttributeFlag> {
    alt((
        map(preceded(tag(b"\\\\"), atom), AttributeFlag::system),
        map(atom, AttributeFlag::Keyword),
    ))(input)
}

/// ```abnf
/// entry-type-req = entry-type-resp / "all"
/// entry-type-resp = "priv" / "shared"
/// ```
pub(crate) fn entry_type_req(input: &[u8]) -> IMAPResult<&[u8], EntryTypeReq> {
    alt((
        value(EntryTypeReq::Private, tag_no_case(b"priv")),
        value(EntryTypeReq::Shared, tag_no_case(b"shared")),
        value(EntryTypeReq::All, tag_no_case(b"all")),
    ))(input)
}

/// A `(CONDSTORE)` or `(QRESYNC (...))` select parameter list.
///
/// ```abnf
/// select-param = "CONDSTORE" /
///                "QRESYNC" SP "(" uidvalidity SP mod-sequence-value
///                [SP known-uids] [SP seq-match-data] ")"
/// ```
pub(crate) fn select_params(input: &[u8]) -> IMAPResult<&[u8], Vec<SelectParameter>> {
    delimited(
        tag(b" ("),
        nom::multi::separated_list1(sp, select_param),
        tag(b")"),
    )(input)
}

fn select_param(input: &[u8]) -> IMAPResult<&[u8], SelectParameter> {
    alt((
        value(SelectParameter::CondStore, tag_no_case(b"CONDSTORE")),
        map(
            tuple((
                tag_no_case(b"QRESYNC ("),
                nz_number,
                sp,
                mod_sequence_value,
                opt(preceded(sp, sequence_set)),
                opt(preceded(
                    sp,
                    delimited(
                        tag(b"("),
                        tuple((sequence_set, preceded(sp, sequence_set))),
                        tag(b")"),
                    ),
                )),
                tag(b")"),
            )),
            |(_, uid_validity, _, mod_seq, known_uids, seq_match_data, _)| {
                SelectParameter::Qresync(QresyncParameter {
                    uid_validity,
                    mod_seq,
                    known_uids,
                    seq_match_data,
                })
            },
        ),
    ))(input)
}

/// `fetch-modifiers = SP "(" fetch-modifier *(SP fetch-modifier) ")"` (RFC 4466 shape)
///
/// ```abnf
/// fetch-modifier = "CHANGEDSINCE" SP mod-sequence-value /
///                  "VANISHED"
/// ```
pub(crate) fn fetch_modifiers(input: &[u8]) -> IMAPResult<&[u8], Vec<FetchModifier>> {
    delimited(
        tag(b" ("),
        nom::multi::separated_list1(sp, fetch_modifier),
        tag(b")"),
    )(input)
}

fn fetch_modifier(input: &[u8]) -> IMAPResult<&[u8], FetchModifier> {
    alt((
        map(
            preceded(tag_no_case(b"CHANGEDSINCE "), mod_sequence_value),
            FetchModifier::ChangedSince,
        ),
        value(FetchModifier::Vanished, tag_no_case(b"VANISHED")),
    ))(input)
}

/// ```abnf
/// store-modifier = "UNCHANGEDSINCE" SP mod-sequence-value
/// ```
pub(crate) fn store_modifiers(input: &[u8]) -> IMAPResult<&[u8], Vec<StoreModifier>> {
    delimited(
        tag(b" ("),
        nom::multi::separated_list1(sp, store_modifier),
        tag(b")"),
    )(input)
}

fn store_modifier(input: &[u8]) -> IMAPResult<&[u8], StoreModifier> {
    map(
        preceded(tag_no_case(b"UNCHANGEDSINCE "), mod_sequence_value),
        StoreModifier::UnchangedSince,
    )(input)
}

/// ```abnf
/// expunged-resp = "VANISHED" [SP "(EARLIER)"] SP known-uids
/// ```
pub(crate) fn vanished_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((
        tag_no_case(b"VANISHED"),
        map(opt(tag_no_case(b" (EARLIER)")), |e| e.is_some()),
        sp,
        sequence_set,
    ));

    let (remaining, (_, earlier, _, uids)) = parser(input)?;

    Ok((remaining, Data::Vanished { earlier, uids }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::resp_text;

    #[test]
    fn test_parse_mod_sequence() {
        assert!(mod_sequence_valzer(b"0 ").is_ok());
        assert!(mod_sequence_value(b"0 ").is_err());
        assert!(mod_sequence_value(b"1 ").is_ok());

        // 2^63 - 1 is the largest valid mod-sequence ...
        assert!(mod_sequence_value(b"9223372036854775807 ").is_ok());

        // ... and 2^63 is a hard error.
        assert!(matches!(
            mod_sequence_valzer(b"9223372036854775808 "),
            Err(nom::Err::Failure(_))
        ));
    }

    #[test]
    fn test_parse_vanished() {
        let (rem, val) = vanished_data(b"VANISHED (EARLIER) 41,43:116\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert!(matches!(val, Data::Vanished { earlier: true, .. }));

        let (_, val) = vanished_data(b"VANISHED 41\r\n").unwrap();
        assert!(matches!(val, Data::Vanished { earlier: false, .. }));
    }

    #[test]
    fn test_condstore_qresync_codes() {
        assert!(resp_text(b"[MODIFIED 7,9] Conditional STORE failed\r\n").is_ok());
        assert!(resp_text(
            b"[NOMODSEQ] Sorry, this mailbox format doesn't support modsequences\r\n"
        )
        .is_ok());
        assert!(resp_text(b"[HIGHESTMODSEQ 715194045007] Highest\r\n").is_ok());
    }

    #[test]
    fn test_parse_select_params() {
        let (rem, val) = select_params(b" (CONDSTORE)\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(val, vec![SelectParameter::CondStore]);

        let (_, val) =
            select_params(b" (QRESYNC (67890007 20050715194045000 41,43:211,214:541))\r\n")
                .unwrap();
        assert!(matches!(val[0], SelectParameter::Qresync(_)));
    }
}
