//! # Incremental decoding of live connections.
//!
//! The whole-message [`Decoder`](crate::decode::Decoder)s require one
//! complete message in memory. On a live connection that is not how bytes
//! arrive: literals interrupt the line framing, FETCH responses carry
//! attribute bodies of arbitrary size, and APPEND uploads whole messages.
//! The types in this module wrap the grammar parsers with the state needed
//! to decode such a connection incrementally:
//!
//! * [`ResponseStream`](response::ResponseStream) decodes the server side
//!   of a connection into a stream of
//!   [`ResponseEvent`](response::ResponseEvent)s. FETCH attribute bodies
//!   are forwarded chunk by chunk instead of being buffered.
//! * [`CommandStream`](command::CommandStream) decodes the client side. It
//!   tracks the synchronizing literals the peer is waiting on (via
//!   [`LiteralScanner`](crate::scanner::LiteralScanner)) and emits one
//!   continuation-request event per outstanding literal. APPEND message
//!   bodies are forwarded chunk by chunk.
//!
//! Both types are synchronous and perform no I/O; "more bytes needed" is
//! externalized as an `Ok(None)` return. A stream instance belongs to one
//! connection and must not be shared between connections.

pub mod command;
pub mod response;

use imap_stream_types::utils::escape_byte_string;
use thiserror::Error;

/// The default bound for unparsed non-literal lookahead, in bytes.
///
/// Literal bodies are exempt; they are streamed and never accumulate.
pub const DEFAULT_BUFFER_LIMIT: usize = 1000;

/// How much of the offending input is kept for diagnostics.
const ERROR_CONTEXT_LIMIT: usize = 64;

/// A fatal decoding error.
///
/// Any of these poisons the connection: the server side should answer with
/// `* BYE` and tear the connection down, the client side should surface the
/// error to the application.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum StreamError {
    /// The peer sent more than the configured lookahead limit without
    /// completing a parseable unit.
    #[error("lookahead exceeds the limit of {limit} bytes")]
    ExcessiveLookahead { limit: usize },

    /// The bytes do not form a valid message.
    #[error("protocol violation near `{}`", escape_byte_string(near))]
    ProtocolViolation {
        /// The offending input, bounded to a reasonable size.
        near: Vec<u8>,
    },
}

impl StreamError {
    pub(crate) fn violation(input: &[u8]) -> Self {
        Self::ProtocolViolation {
            near: input[..input.len().min(ERROR_CONTEXT_LIMIT)].to_vec(),
        }
    }
}
