//! The IMAP QUOTA extension (RFC 2087, updated by RFC 9208).

use abnf_core::streaming::sp;
use imap_stream_types::{
    command::CommandBody,
    core::{AString, Vec1},
    extensions::quota::{QuotaGet, QuotaSet, Resource},
    response::Data,
};
use nom::{
    bytes::streaming::{tag, tag_no_case},
    combinator::map,
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{astring, atom, number64},
    decode::IMAPResult,
    mailbox::mailbox,
};

/// ```abnf
/// quota-root-name = astring
/// ```
fn quota_root_name(input: &[u8]) -> IMAPResult<&[u8], AString> {
    astring(input)
}

/// ```abnf
/// getquota = "GETQUOTA" SP quota-root-name
/// ```
pub(crate) fn getquota(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let (remaining, root) = preceded(tag_no_case(b"GETQUOTA "), quota_root_name)(input)?;

    Ok((remaining, CommandBody::GetQuota { root }))
}

/// ```abnf
/// getquotaroot = "GETQUOTAROOT" SP mailbox
/// ```
pub(crate) fn getquotaroot(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let (remaining, mailbox) = preceded(tag_no_case(b"GETQUOTAROOT "), mailbox)(input)?;

    Ok((remaining, CommandBody::GetQuotaRoot { mailbox }))
}

/// ```abnf
/// setquota      = "SETQUOTA" SP quota-root-name SP setquota-list
/// setquota-list = "(" [setquota-resource *(SP setquota-resource)] ")"
/// ```
pub(crate) fn setquota(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"SETQUOTA "),
        quota_root_name,
        sp,
        delimited(
            tag(b"("),
            separated_list0(sp, setquota_resource),
            tag(b")"),
        ),
    ));

    let (remaining, (_, root, _, quotas)) = parser(input)?;

    Ok((remaining, CommandBody::SetQuota { root, quotas }))
}

/// ```abnf
/// setquota-resource = resource-name SP resource-limit
/// ```
fn setquota_resource(input: &[u8]) -> IMAPResult<&[u8], QuotaSet> {
    let mut parser = tuple((map(atom, Resource::from), sp, number64));

    let (remaining, (resource, _, limit)) = parser(input)?;

    Ok((remaining, QuotaSet { resource, limit }))
}

/// ```abnf
/// quota-response = "QUOTA" SP quota-root-name SP quota-list
/// quota-list     = "(" quota-resource *(SP quota-resource) ")"
/// ```
pub(crate) fn quota_response(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((
        tag_no_case(b"QUOTA "),
        quota_root_name,
        sp,
        delimited(
            tag(b"("),
            separated_list1(sp, quota_resource),
            tag(b")"),
        ),
    ));

    let (remaining, (_, root, _, quotas)) = parser(input)?;

    Ok((
        remaining,
        Data::Quota {
            root,
            quotas: Vec1::unvalidated(quotas),
        },
    ))
}

/// ```abnf
/// quota-resource = resource-name SP resource-usage SP resource-limit
/// ```
fn quota_resource(input: &[u8]) -> IMAPResult<&[u8], QuotaGet> {
    let mut parser = tuple((map(atom, Resource::from), sp, number64, sp, number64));

    let (remaining, (resource, _, usage, _, limit)) = parser(input)?;

    Ok((
        remaining,
        QuotaGet {
            resource,
            usage,
            limit,
        },
    ))
}

/// ```abnf
/// quotaroot-response = "QUOTAROOT" SP mailbox *(SP quota-root-name)
/// ```
pub(crate) fn quotaroot_response(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((
        tag_no_case(b"QUOTAROOT "),
        mailbox,
        nom::multi::many0(preceded(sp, quota_root_name)),
    ));

    let (remaining, (_, mailbox, roots)) = parser(input)?;

    Ok((remaining, Data::QuotaRoot { mailbox, roots }))
}
