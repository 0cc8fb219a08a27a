//! Action modules: load/save/delete orchestration per entity kind.
//!
//! Actions are the only fallible layer. Each one guards on the owning
//! store's per-scope loading flag (an overlapping call for the same key
//! is a silent no-op, not a queued retry), runs the document-store
//! call, and publishes the outcome as a domain event for the store to
//! apply. Failures never escape: they are captured into the error
//! message store under the channel key of the surface that initiated
//! the call, and the entity's pending edits stay untouched.

pub mod bug_bash;
pub mod comment;
pub mod item;
pub mod long_text;
pub mod settings;

use crate::error::BugBashError;
use crate::session::Session;
use crate::store::ErrorKey;

/// Record a failed action on its error channel.
pub(crate) fn capture(session: &mut Session, key: ErrorKey, error: &BugBashError) {
    tracing::warn!(%error, ?key, "action failed");
    session.errors.set(key, error.to_string());
}
