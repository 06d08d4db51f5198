//! The IMAP URLAUTH extension (RFC 4467).

use abnf_core::streaming::sp;
use imap_stream_types::{
    command::CommandBody,
    core::Vec1,
    extensions::urlauth::{UrlAuthItem, UrlMechanism},
    response::Data,
};
use nom::{
    bytes::streaming::tag_no_case,
    combinator::{map, opt},
    multi::{many0, separated_list1},
    sequence::{preceded, tuple},
};

use crate::{
    core::{astring, atom, nstring},
    decode::IMAPResult,
    mailbox::mailbox,
};

/// ```abnf
/// mechanism = "INTERNAL" / atom
/// ```
fn mechanism(input: &[u8]) -> IMAPResult<&[u8], UrlMechanism> {
    map(atom, UrlMechanism::from)(input)
}

/// ```abnf
/// genurlauth = "GENURLAUTH" 1*(SP url-rump SP mechanism)
/// ```
pub(crate) fn genurlauth(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let (remaining, items) = preceded(
        tag_no_case(b"GENURLAUTH "),
        separated_list1(
            sp,
            map(tuple((astring, sp, mechanism)), |(url, _, mechanism)| {
                UrlAuthItem { url, mechanism }
            }),
        ),
    )(input)?;

    Ok((
        remaining,
        CommandBody::GenUrlAuth {
            items: Vec1::unvalidated(items),
        },
    ))
}

/// ```abnf
/// resetkey = "RESETKEY" [SP mailbox *(SP mechanism)]
/// ```
pub(crate) fn resetkey(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let mut parser = tuple((
        tag_no_case(b"RESETKEY"),
        opt(tuple((
            preceded(sp, mailbox),
            many0(preceded(sp, mechanism)),
        ))),
    ));

    let (remaining, (_, tail)) = parser(input)?;

    let (mailbox, mechanisms) = match tail {
        Some((mailbox, mechanisms)) => (Some(mailbox), mechanisms),
        None => (None, vec![]),
    };

    Ok((
        remaining,
        CommandBody::ResetKey {
            mailbox,
            mechanisms,
        },
    ))
}

/// ```abnf
/// urlfetch = "URLFETCH" 1*(SP url)
/// ```
pub(crate) fn urlfetch(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let (remaining, urls) = preceded(
        tag_no_case(b"URLFETCH "),
        separated_list1(sp, astring),
    )(input)?;

    Ok((
        remaining,
        CommandBody::UrlFetch {
            urls: Vec1::unvalidated(urls),
        },
    ))
}

/// ```abnf
/// genurlauth-data = "GENURLAUTH" 1*(SP url-full)
/// ```
pub(crate) fn genurlauth_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let (remaining, urls) = preceded(
        tag_no_case(b"GENURLAUTH "),
        separated_list1(sp, astring),
    )(input)?;

    Ok((remaining, Data::GenUrlAuth(Vec1::unvalidated(urls))))
}

/// ```abnf
/// urlfetch-data = "URLFETCH" 1*(SP url SP nstring)
/// ```
pub(crate) fn urlfetch_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let (remaining, items) = preceded(
        tag_no_case(b"URLFETCH "),
        separated_list1(
            sp,
            map(tuple((astring, sp, nstring)), |(url, _, data)| (url, data)),
        ),
    )(input)?;

    Ok((remaining, Data::UrlFetch(items)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genurlauth() {
        let (_, val) = genurlauth(
            b"GENURLAUTH \"imap://joe@example.com/INBOX/;uid=20;urlauth=anonymous\" INTERNAL\r\n",
        )
        .unwrap();
        match val {
            CommandBody::GenUrlAuth { items } => {
                assert_eq!(items.as_ref()[0].mechanism, UrlMechanism::Internal);
            }
            _ => panic!("expected GENURLAUTH"),
        }
    }

    #[test]
    fn test_parse_resetkey() {
        let (_, val) = resetkey(b"RESETKEY\r\n").unwrap();
        assert!(matches!(val, CommandBody::ResetKey { mailbox: None, .. }));

        let (_, val) = resetkey(b"RESETKEY INBOX INTERNAL\r\n").unwrap();
        match val {
            CommandBody::ResetKey {
                mailbox, mechanisms, ..
            } => {
                assert!(mailbox.is_some());
                assert_eq!(mechanisms, vec![UrlMechanism::Internal]);
            }
            _ => panic!("expected RESETKEY"),
        }
    }
}
