//! # (De)serialization of messages.
//!
//! All codecs implement [`Decoder`](decode::Decoder) and
//! [`Encoder`](encode::Encoder). Decoding takes a byte slice holding one
//! complete message; encoding yields [`Fragment`](encode::Fragment)s so a
//! client can await continuation requests between synchronizing literals.

pub mod decode;
pub mod encode;

/// Codec for greetings.
///
/// # Example
///
/// ```rust
/// use imap_stream::{
///     decode::Decoder,
///     types::{
///         core::Text,
///         response::{Code, Greeting, GreetingKind},
///     },
///     GreetingCodec,
/// };
///
/// let (remaining, greeting) = GreetingCodec::default()
///     .decode(b"* OK [ALERT] Hello, World!\r\n<remaining>")
///     .unwrap();
///
/// assert_eq!(
///     greeting,
///     Greeting {
///         kind: GreetingKind::Ok,
///         code: Some(Code::Alert),
///         text: Text::try_from("Hello, World!").unwrap(),
///     }
/// );
/// assert_eq!(remaining, &b"<remaining>"[..]);
/// ```
#[derive(Debug, Default)]
pub struct GreetingCodec;

/// Codec for commands.
#[derive(Debug, Default)]
pub struct CommandCodec;

/// Codec for authenticate data lines.
#[derive(Debug, Default)]
pub struct AuthenticateDataCodec;

/// Codec for responses.
#[derive(Debug, Default)]
pub struct ResponseCodec;

/// Codec for the `DONE` line of IDLE.
#[derive(Debug, Default)]
pub struct IdleDoneCodec;

#[cfg(test)]
mod tests {
    use imap_stream_types::{
        auth::AuthenticateData,
        command::{Command, CommandBody},
        extensions::idle::IdleDone,
        mailbox::Mailbox,
        response::{Greeting, GreetingKind},
    };

    use crate::testing::{
        kat_inverse_authenticate_data, kat_inverse_command, kat_inverse_done, kat_inverse_greeting,
    };

    #[test]
    fn test_kat_inverse_greeting() {
        kat_inverse_greeting(&[
            (
                b"* OK ...\r\n".as_ref(),
                b"".as_ref(),
                Greeting::new(GreetingKind::Ok, None, "...").unwrap(),
            ),
            (
                b"* ByE .\r\n???",
                b"???",
                Greeting::new(GreetingKind::Bye, None, ".").unwrap(),
            ),
            (
                b"* preaUth x\r\n?",
                b"?",
                Greeting::new(GreetingKind::PreAuth, None, "x").unwrap(),
            ),
        ]);
    }

    #[test]
    fn test_kat_inverse_command() {
        kat_inverse_command(&[
            (
                b"a nOOP\r\n".as_ref(),
                b"".as_ref(),
                Command::new("a", CommandBody::Noop).unwrap(),
            ),
            (
                b"a SeLECT {5}\r\ninbox\r\n",
                b"",
                Command::new(
                    "a",
                    CommandBody::Select {
                        mailbox: Mailbox::Inbox,
                        parameters: vec![],
                    },
                )
                .unwrap(),
            ),
        ]);
    }

    #[test]
    fn test_kat_inverse_authenticate_data() {
        kat_inverse_authenticate_data(&[(
            b"VGVzdA==\r\n".as_ref(),
            b"".as_ref(),
            AuthenticateData::r#continue(b"Test".to_vec()),
        )]);
    }

    #[test]
    fn test_kat_inverse_idle_done() {
        kat_inverse_done(&[(b"done\r\n".as_ref(), b"".as_ref(), IdleDone)]);
    }
}
