//! Authentication-related types.

use std::{borrow::Cow, fmt::{Display, Formatter}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{core::Atom, error::ValidationError, secret::Secret};

/// An authentication mechanism, e.g., `PLAIN`.
///
/// Mechanism names are matched case-insensitively; unknown mechanisms keep
/// their wire bytes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AuthMechanism<'a> {
    /// The PLAIN SASL mechanism.
    ///
    /// ```imap
    /// AUTH=PLAIN
    /// ```
    Plain,

    /// The (non-standardized) LOGIN SASL mechanism.
    ///
    /// ```imap
    /// AUTH=LOGIN
    /// ```
    Login,

    /// The OAUTHBEARER SASL mechanism (RFC 7628).
    ///
    /// ```imap
    /// AUTH=OAUTHBEARER
    /// ```
    OAuthBearer,

    /// The (non-standardized) XOAUTH2 mechanism.
    ///
    /// ```imap
    /// AUTH=XOAUTH2
    /// ```
    XOAuth2,

    /// Some other mechanism.
    Other(AuthMechanismOther<'a>),
}

impl<'a> AuthMechanism<'a> {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain => "PLAIN",
            Self::Login => "LOGIN",
            Self::OAuthBearer => "OAUTHBEARER",
            Self::XOAuth2 => "XOAUTH2",
            Self::Other(other) => other.0.inner(),
        }
    }
}

impl<'a> From<Atom<'a>> for AuthMechanism<'a> {
    fn from(atom: Atom<'a>) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_ref() {
            "PLAIN" => Self::Plain,
            "LOGIN" => Self::Login,
            "OAUTHBEARER" => Self::OAuthBearer,
            "XOAUTH2" => Self::XOAuth2,
            _ => Self::Other(AuthMechanismOther(atom)),
        }
    }
}

impl<'a> TryFrom<&'a str> for AuthMechanism<'a> {
    type Error = ValidationError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(Self::from(Atom::try_from(value)?))
    }
}

impl Display for AuthMechanism<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authentication mechanism not covered by [`AuthMechanism`]'s variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AuthMechanismOther<'a>(pub(crate) Atom<'a>);

impl<'a> AuthMechanismOther<'a> {
    pub fn inner(&self) -> &Atom<'a> {
        &self.0
    }
}

/// A line of authentication data, i.e., a base64-encoded client response or
/// the cancellation token `*`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AuthenticateData<'a> {
    /// The decoded bytes of a base64 response line.
    Continue(Secret<Cow<'a, [u8]>>),
    /// The client canceled the exchange (`*`).
    Cancel,
}

impl<'a> AuthenticateData<'a> {
    pub fn r#continue(data: Vec<u8>) -> Self {
        Self::Continue(Secret::new(Cow::Owned(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanism_folding() {
        assert_eq!(
            AuthMechanism::try_from("plain").unwrap(),
            AuthMechanism::Plain
        );
        assert_eq!(AuthMechanism::Plain.as_str(), "PLAIN");

        let other = AuthMechanism::try_from("SCRAM-SHA-1").unwrap();
        assert_eq!(other.as_str(), "SCRAM-SHA-1");
    }
}
