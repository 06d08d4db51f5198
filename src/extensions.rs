//! IMAP extensions.

pub(crate) mod acl;
pub(crate) mod binary;
pub(crate) mod condstore_qresync;
pub(crate) mod enable;
pub(crate) mod esearch;
pub(crate) mod id;
pub(crate) mod idle;
pub(crate) mod metadata;
pub(crate) mod r#move;
pub(crate) mod namespace;
pub(crate) mod quota;
pub(crate) mod uidplus;
pub(crate) mod urlauth;
