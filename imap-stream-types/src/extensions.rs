//! IMAP extensions.

pub mod acl;
pub mod binary;
pub mod condstore_qresync;
pub mod enable;
pub mod esearch;
pub mod idle;
pub mod metadata;
pub mod namespace;
pub mod quota;
pub mod urlauth;
