//! # Streaming codec for IMAP4rev1
//!
//! This crate provides parsing and serialization for IMAP4rev1 (RFC 3501)
//! and its principal extensions.
//!
//! There are two layers:
//!
//! * The whole-message codecs ([`GreetingCodec`], [`CommandCodec`],
//!   [`ResponseCodec`], ...) decode one complete message from a byte slice
//!   (see [`decode`]) and encode a typed message into
//!   [`Fragment`](encode::Fragment)s (see [`encode`]).
//! * The streaming layer (see [`stream`]) wraps the codecs with the state
//!   needed to decode a live connection incrementally: continuation
//!   request accounting for synchronizing literals (see [`scanner`]),
//!   streamed FETCH attribute bodies, and streamed APPEND messages.
//!
//! IMAP traces are not guaranteed to be UTF-8; be careful with things like
//! `std::str::from_utf8(...).unwrap()`. This is also why `Display` is not
//! implemented on message types. All types implement `Debug`, though.

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod auth;
mod body;
mod codec;
mod command;
mod core;
mod datetime;
mod envelope;
mod extensions;
mod fetch;
mod flag;
mod mailbox;
mod response;
pub mod scanner;
mod search;
mod sequence;
mod status;
pub mod stream;
#[cfg(test)]
mod testing;

pub use codec::*;
/// Re-export of the data model.
pub use imap_stream_types as types;
