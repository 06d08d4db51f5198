//! The extended SEARCH command and ESEARCH response
//! (RFC 4731, RFC 5182, RFC 7377).

use abnf_core::streaming::sp;
use imap_stream_types::{
    command::CommandBody,
    core::{Charset, Vec1},
    extensions::esearch::{ESearchResponse, SearchReturnData, SearchReturnOption, SearchSource},
    mailbox::Mailbox,
    search::SearchKey,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{charset, number, nz_number, tag_imap},
    decode::IMAPResult,
    extensions::condstore_qresync::mod_sequence_value,
    mailbox::mailbox,
    search::search_key,
    sequence::sequence_set,
};

/// The extended SEARCH command (RFC 7377 shape, covering RFC 4731).
///
/// ```abnf
/// esearch = "ESEARCH" [SP esearch-source-opts] [SP search-return-opts]
///           SP search-program
/// ```
pub(crate) fn esearch(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"ESEARCH"),
        opt(preceded(sp, esearch_source_opts)),
        opt(preceded(sp, search_return_opts)),
        sp,
        search_program,
    ));

    let (remaining, (_, source_options, return_options, _, (charset, criteria))) = parser(input)?;

    Ok((
        remaining,
        CommandBody::ExtendedSearch {
            source_options,
            return_options: return_options.unwrap_or_default(),
            charset,
            criteria,
            uid: false,
        },
    ))
}

/// ```abnf
/// esearch-source-opts = "IN" SP "(" source-mbox ")"
/// source-mbox         = filter-mailboxes *(SP filter-mailboxes)
/// ```
pub(crate) fn esearch_source_opts(
    input: &[u8],
) -> IMAPResult<&[u8], Vec1<SearchSource>> {
    map(
        preceded(
            tag_no_case(b"IN "),
            delimited(tag(b"("), separated_list1(sp, filter_mailboxes), tag(b")")),
        ),
        Vec1::unvalidated,
    )(input)
}

/// ```abnf
/// filter-mailboxes = "selected" / "selected-delayed" / "inboxes" /
///                    "personal" / "subscribed" /
///                    ("subtree" SP one-or-more-mailbox) /
///                    ("mailboxes" SP one-or-more-mailbox)
/// ```
fn filter_mailboxes(input: &[u8]) -> IMAPResult<&[u8], SearchSource> {
    alt((
        value(
            SearchSource::SelectedDelayed,
            tag_no_case(b"selected-delayed"),
        ),
        value(SearchSource::Selected, tag_no_case(b"selected")),
        value(SearchSource::Inboxes, tag_no_case(b"inboxes")),
        value(SearchSource::Personal, tag_no_case(b"personal")),
        value(SearchSource::Subscribed, tag_no_case(b"subscribed")),
        map(
            preceded(tag_no_case(b"subtree "), one_or_more_mailbox),
            SearchSource::Subtree,
        ),
        map(
            preceded(tag_no_case(b"mailboxes "), one_or_more_mailbox),
            SearchSource::Mailboxes,
        ),
    ))(input)
}

/// ```abnf
/// one-or-more-mailbox = mailbox / ("(" mailbox *(SP mailbox) ")")
/// ```
fn one_or_more_mailbox(input: &[u8]) -> IMAPResult<&[u8], Vec1<Mailbox>> {
    alt((
        map(
            delimited(tag(b"("), separated_list1(sp, mailbox), tag(b")")),
            Vec1::unvalidated,
        ),
        map(mailbox, Vec1::from),
    ))(input)
}

/// ```abnf
/// search-return-opts = "RETURN" SP "(" [search-return-opt *(SP search-return-opt)] ")"
/// ```
pub(crate) fn search_return_opts(input: &[u8]) -> IMAPResult<&[u8], Vec<SearchReturnOption>> {
    preceded(
        tag_no_case(b"RETURN "),
        delimited(
            tag(b"("),
            nom::multi::separated_list0(sp, search_return_opt),
            tag(b")"),
        ),
    )(input)
}

/// ```abnf
/// search-return-opt = "MIN" / "MAX" / "ALL" / "COUNT" / "SAVE"
/// ```
fn search_return_opt(input: &[u8]) -> IMAPResult<&[u8], SearchReturnOption> {
    alt((
        value(SearchReturnOption::Min, tag_no_case(b"MIN")),
        value(SearchReturnOption::Max, tag_no_case(b"MAX")),
        value(SearchReturnOption::All, tag_no_case(b"ALL")),
        value(SearchReturnOption::Count, tag_no_case(b"COUNT")),
        value(SearchReturnOption::Save, tag_no_case(b"SAVE")),
    ))(input)
}

/// ```abnf
/// search-program = ["CHARSET" SP charset SP] search-key *(SP search-key)
/// ```
fn search_program(
    input: &[u8],
) -> IMAPResult<&[u8], (Option<Charset>, Vec1<SearchKey>)> {
    let mut parser = tuple((
        opt(map(
            tuple((tag_no_case(b"CHARSET"), sp, charset, sp)),
            |(_, _, charset, _)| charset,
        )),
        map(separated_list1(sp, search_key(9)), Vec1::unvalidated),
    ));

    let (remaining, (charset, criteria)) = parser(input)?;

    Ok((remaining, (charset, criteria)))
}

/// ```abnf
/// esearch-response  = "ESEARCH" [search-correlator] [SP "UID"]
///                     *(SP search-return-data)
/// search-correlator = SP "(" "TAG" SP tag-string ")"
/// ```
pub(crate) fn esearch_response(input: &[u8]) -> IMAPResult<&[u8], ESearchResponse> {
    let mut parser = tuple((
        tag_no_case(b"ESEARCH"),
        opt(delimited(
            tag_no_case(b" (TAG \""),
            tag_imap,
            tag(b"\")"),
        )),
        map(opt(tag_no_case(b" UID")), |uid| uid.is_some()),
        nom::multi::many0(preceded(sp, search_return_data)),
    ));

    let (remaining, (_, correlator, uid, data)) = parser(input)?;

    Ok((
        remaining,
        ESearchResponse {
            correlator,
            uid,
            data,
        },
    ))
}

/// ```abnf
/// search-return-data = "MIN" SP nz-number /
///                      "MAX" SP nz-number /
///                      "ALL" SP sequence-set /
///                      "COUNT" SP number /
///                      "MODSEQ" SP mod-sequence-value ; RFC 7162
/// ```
fn search_return_data(input: &[u8]) -> IMAPResult<&[u8], SearchReturnData> {
    alt((
        map(
            preceded(tag_no_case(b"MIN "), nz_number),
            SearchReturnData::Min,
        ),
        map(
            preceded(tag_no_case(b"MAX "), nz_number),
            SearchReturnData::Max,
        ),
        map(
            preceded(tag_no_case(b"ALL "), sequence_set),
            SearchReturnData::All,
        ),
        map(
            preceded(tag_no_case(b"COUNT "), number),
            SearchReturnData::Count,
        ),
        map(
            preceded(tag_no_case(b"MODSEQ "), mod_sequence_value),
            SearchReturnData::ModSeq,
        ),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_esearch_command() {
        let (rem, val) =
            esearch(b"ESEARCH IN (inboxes) RETURN (MIN MAX COUNT) CHARSET UTF-8 FROM \"alice\"\r\n")
                .unwrap();
        assert_eq!(rem, b"\r\n");

        match val {
            CommandBody::ExtendedSearch {
                source_options,
                return_options,
                charset,
                criteria,
                uid,
            } => {
                assert_eq!(
                    source_options.unwrap().as_ref(),
                    &[SearchSource::Inboxes]
                );
                assert_eq!(
                    return_options,
                    vec![
                        SearchReturnOption::Min,
                        SearchReturnOption::Max,
                        SearchReturnOption::Count
                    ]
                );
                assert!(charset.is_some());
                assert_eq!(criteria.len(), 1);
                assert!(!uid);
            }
            _ => panic!("expected ESEARCH"),
        }
    }

    #[test]
    fn test_parse_esearch_response() {
        let (rem, val) = esearch_response(b"ESEARCH (TAG \"A282\") MIN 2 COUNT 3\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(
            val,
            ESearchResponse {
                correlator: Some("A282".try_into().unwrap()),
                uid: false,
                data: vec![SearchReturnData::Min(2.try_into().unwrap()), SearchReturnData::Count(3)],
            }
        );

        let (_, val) = esearch_response(b"ESEARCH (TAG \"A283\") UID ALL 2,10:11\r\n").unwrap();
        assert!(val.uid);
    }
}
