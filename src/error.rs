//! # Errors
//!
//! Failures split into two kinds: [`CoupError`] is the recoverable half — a
//! malformed or disallowed action string, surfaced to the caller so they can
//! retry. The other half, invariant violations (dealer underflow, advancing
//! to a dead player, playing past game over), are programming faults: they
//! go through [`fault`], which logs and then panics rather than returning a
//! value a caller could plausibly recover from.

use thiserror::Error;

/// A malformed or disallowed player-supplied action. State is left
/// unchanged; callers may retry with a different action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal action: {reason}")]
pub struct IllegalAction {
    pub reason: String,
}

impl IllegalAction {
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("illegal action rejected: {reason}");
        IllegalAction { reason }
    }
}

/// The crate's only error type. Currently a single variant, kept as an enum
/// (rather than returning `IllegalAction` bare) so a future recoverable
/// failure mode doesn't require changing every call site's `Result` type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoupError {
    #[error(transparent)]
    IllegalAction(#[from] IllegalAction),
}

pub type Result<T> = std::result::Result<T, CoupError>;

/// Raise an invariant violation: log it, then abort the process via panic.
/// Never returns. Used exclusively for states that legal play can never
/// reach — a bug turned up one of these, not a player.
#[track_caller]
pub fn fault(msg: impl std::fmt::Display) -> ! {
    log::error!("invariant violation: {msg}");
    panic!("invariant violation: {msg}");
}
