use std::borrow::Cow;

#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use imap_stream_types::{
    auth::{AuthMechanism, AuthenticateData},
    secret::Secret,
};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::map,
    sequence::terminated,
};

use crate::{
    core::{atom, base64},
    decode::IMAPResult,
};

/// `auth-type = atom`
///
/// Note: Defined by [SASL]
pub(crate) fn auth_type(input: &[u8]) -> IMAPResult<&[u8], AuthMechanism> {
    map(atom, AuthMechanism::from)(input)
}

/// `authenticate-data = base64 CRLF / "*" CRLF` (edited)
///
/// The client response to a server challenge during AUTHENTICATE: a base64
/// line, or `*` to cancel the exchange.
pub(crate) fn authenticate_data(input: &[u8]) -> IMAPResult<&[u8], AuthenticateData> {
    // Note: `base64` also matches the empty string, so the `*` alternative
    // must come first and carry its own line ending.
    alt((
        map(terminated(tag(b"*"), crlf), |_| AuthenticateData::Cancel),
        map(terminated(base64, crlf), |data| {
            AuthenticateData::Continue(Secret::new(Cow::Owned(data)))
        }),
    ))(input)
}
