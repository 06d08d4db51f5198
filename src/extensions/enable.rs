//! The IMAP ENABLE extension (RFC 5161).

use abnf_core::streaming::sp;
use imap_stream_types::{
    command::CommandBody,
    core::Vec1,
    extensions::enable::CapabilityEnable,
    response::Data,
};
use nom::{
    bytes::streaming::tag_no_case,
    combinator::map,
    multi::{many0, separated_list1},
    sequence::preceded,
};

use crate::{core::atom, decode::IMAPResult};

/// `capability = ("AUTH=" auth-type) / atom`
pub(crate) fn capability_enable(input: &[u8]) -> IMAPResult<&[u8], CapabilityEnable> {
    map(atom, CapabilityEnable::from)(input)
}

/// `command-any =/ "ENABLE" 1*(SP capability)`
pub(crate) fn enable(input: &[u8]) -> IMAPResult<&[u8], CommandBody> {
    let (remaining, capabilities) = preceded(
        tag_no_case(b"ENABLE "),
        separated_list1(sp, capability_enable),
    )(input)?;

    Ok((
        remaining,
        CommandBody::Enable {
            capabilities: Vec1::unvalidated(capabilities),
        },
    ))
}

/// `enable-data = "ENABLED" *(SP capability)`
pub(crate) fn enable_data(input: &[u8]) -> IMAPResult<&[u8], Data> {
    let (remaining, capabilities) = preceded(
        tag_no_case(b"ENABLED"),
        many0(preceded(sp, capability_enable)),
    )(input)?;

    Ok((remaining, Data::Enabled { capabilities }))
}

#[cfg(test)]
mod tests {
    use imap_stream_types::extensions::enable::Utf8Kind;

    use super::*;

    #[test]
    fn test_parse_enable() {
        let (rem, val) = enable(b"ENABLE UTF8=ACCEPT QRESYNC\r\n").unwrap();
        assert_eq!(rem, b"\r\n");

        match val {
            CommandBody::Enable { capabilities } => {
                assert_eq!(
                    capabilities.as_ref(),
                    &[
                        CapabilityEnable::Utf8(Utf8Kind::Accept),
                        CapabilityEnable::QResync,
                    ]
                );
            }
            _ => panic!("expected ENABLE"),
        }
    }

    #[test]
    fn test_parse_enable_data() {
        let (rem, val) = enable_data(b"ENABLED CONDSTORE\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(
            val,
            Data::Enabled {
                capabilities: vec![CapabilityEnable::CondStore]
            }
        );

        // A bare `ENABLED` is valid.
        let (_, val) = enable_data(b"ENABLED\r\n").unwrap();
        assert_eq!(
            val,
            Data::Enabled {
                capabilities: vec![]
            }
        );
    }
}
