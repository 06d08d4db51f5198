//! The IMAP ACL extension (RFC 4314).

use abnf_core::streaming::sp;
use imap_stream_types::{
    command::CommandBody,
    extensions::acl::{AclEntry, ModRights, ModRightsMode, Rights},
    response::Data,
};
use nom::{
    branch::alt,
    bytes::streaming::tag_no_case,
    character::streaming::char,
    combinator::{map, opt},
    multi::many0,
    sequence::{preceded, tuple},
};

use crate::{core::astring, decode::IMAPResult, mailbox::mailbox};

/// ```abnf
/// rights = astring
///          ; only lowercase ASCII letters and digits are allowed
/// ```
fn rights(input: &[u8]) -> IMAPResult<&[u8], Rights> {
    map(astring, Rights)(input)
}

/// ```abnf
/// mod-rights = astring
///              ; +rights to add, -rights to remove, rights to replace
/// ```
fn mod_rights(input: &[u8]) -> IMAPResult<&[u8], ModRights> {
    let mut parser = tuple((
        opt(alt((char('+'), char('-')))),
        rights,
    ));

    let (remaining, (sign, rights)) = parser(input)?;

    let mode = match sign {
        Some('+') => ModRightsMode::Add,
        Some('-') => ModRightsMode::Remove,
        _ => ModRightsMode::Replace,
    };

    Ok((remaining, ModRights { mode, rights }))
}

/// ```abnf
/// setacl = "SETACL" SP mailbox SP identifier SP mod-rights
/// ```
pub(crate) fn setacl(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"SETACL "),
        mailbox,
        sp,
        astring,
        sp,
        mod_rights,
    ));

    let (remaining, (_, mailbox, _, identifier, _, rights)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::SetAcl {
            mailbox,
            identifier,
            rights,
        },
    ))
}

/// ```abnf
/// deleteacl = "DELETEACL" SP mailbox SP identifier
/// ```
pub(crate) fn deleteacl(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"DELETEACL "), mailbox, sp, astring));

    let (remaining, (_, mailbox, _, identifier)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::DeleteAcl {
            mailbox,
            identifier,
        },
    ))
}

/// ```abnf
/// getacl = "GETACL" SP mailbox
/// ```
pub(crate) fn getacl(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let (remaining, mailbox) = preceded(tag_no_case(b"GETACL "), mailbox)(input)?;

    Ok((remaining, CommandBody::GetAcl { mailbox }))
}

/// ```abnf
/// listrights = "LISTRIGHTS" SP mailbox SP identifier
/// ```
pub(crate) fn listrights(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((tag_no_case(b"LISTRIGHTS "), mailbox, sp, astring));

    let (remaining, (_, mailbox, _, identifier)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::ListRights {
            mailbox,
            identifier,
        },
    ))
}

/// ```abnf
/// myrights = "MYRIGHTS" SP mailbox
/// ```
pub(crate) fn myrights(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let (remaining, mailbox) = preceded(tag_no_case(b"MYRIGHTS "), mailbox)(input)?;

    Ok((remaining, CommandBody::MyRights { mailbox }))
}

/// ```abnf
/// acl-data = "ACL" SP mailbox *(SP identifier SP rights)
/// ```
pub(crate) fn acl_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((
        tag_no_case(b"ACL "),
        mailbox,
        many0(map(
            tuple((sp, astring, sp, rights)),
            |(_, identifier, _, rights)| AclEntry { identifier, rights },
        )),
    ));

    let (remaining, (_, mailbox, entries)) = parser(input)?;

    Ok((remaining, Data::Acl { mailbox, entries }))
}

/// ```abnf
/// listrights-data = "LISTRIGHTS" SP mailbox SP identifier SP rights *(SP rights)
/// ```
pub(crate) fn listrights_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((
        tag_no_case(b"LISTRIGHTS "),
        mailbox,
        sp,
        astring,
        sp,
        rights,
        many0(preceded(sp, rights)),
    ));

    let (remaining, (_, mailbox, _, identifier, _, required, optional)) = parser(input)?;

    Ok((
        remaining,
        Data::ListRights {
            mailbox,
            identifier,
            required,
            optional,
        },
    ))
}

/// ```abnf
/// myrights-data = "MYRIGHTS" SP mailbox SP rights
/// ```
pub(crate) fn myrights_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let mut parser = tuple((tag_no_case(b"MYRIGHTS "), mailbox, sp, rights));

    let (remaining, (_, mailbox, _, rights)) = parser(input)?;

    Ok((remaining, Data::MyRights { mailbox, rights }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setacl() {
        let (_, val) = setacl(b"SETACL INBOX alice +lrswi\r\n").unwrap();
        match val {
            CommandBody::SetAcl { rights, .. } => {
                assert_eq!(rights.mode, ModRightsMode::Add);
            }
            _ => panic!("expected SETACL"),
        }

        let (_, val) = setacl(b"SETACL INBOX alice lrswi\r\n").unwrap();
        match val {
            CommandBody::SetAcl { rights, .. } => {
                assert_eq!(rights.mode, ModRightsMode::Replace);
            }
            _ => panic!("expected SETACL"),
        }
    }

    #[test]
    fn test_parse_acl_data() {
        let (_, val) = acl_data(b"ACL INBOX alice lrswi bob lrs\r\n").unwrap();
        match val {
            Data::Acl { entries, .. } => assert_eq!(entries.len(), 2),
            _ => panic!("expected ACL"),
        }

        // No entries is fine.
        let (_, val) = acl_data(b"ACL INBOX\r\n").unwrap();
        assert!(matches!(val, Data::Acl { ref entries, .. } if entries.is_empty()));
    }

    #[test]
    fn test_parse_listrights_data() {
        let (_, val) =
            listrights_data(b"LISTRIGHTS INBOX alice l r s w\r\n").unwrap();
        match val {
            Data::ListRights { optional, .. } => assert_eq!(optional.len(), 3),
            _ => panic!("expected LISTRIGHTS"),
        }
    }
}
