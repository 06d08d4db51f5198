//! The IMAP IDLE extension (RFC 2177).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The `DONE` line ending an IDLE.
///
/// This is not a command; it has no tag and is only valid while an IDLE is
/// in progress.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct IdleDone;
