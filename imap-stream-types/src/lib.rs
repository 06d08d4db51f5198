//! # Misuse-resistant data structures for IMAP
//!
//! The most prominent types are [`Command`](command::Command) for the client
//! side and [`Greeting`](response::Greeting), [`Data`](response::Data), and
//! [`Status`](response::Status) for the server side. Every type validates
//! its invariant on construction, so a constructed value always has a valid
//! wire representation.
//!
//! This crate contains no parsing or serialization logic; that lives in the
//! `imap-stream` codec crate.

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auth;
pub mod body;
pub mod command;
pub mod core;
pub mod datetime;
pub mod envelope;
pub mod error;
pub mod extensions;
pub mod fetch;
pub mod flag;
pub mod mailbox;
pub mod response;
pub mod search;
pub mod secret;
pub mod sequence;
pub mod status;
pub mod utils;
