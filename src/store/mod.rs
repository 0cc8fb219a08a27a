//! In-memory per-entity-kind caches.
//!
//! Stores are passive: all fallible work happens in actions, and a
//! store only ever mutates its cache inside `apply`, emitting exactly
//! one changed notification per applied event. Views subscribe to the
//! changed channel and re-derive anything filtered or partitioned from
//! the raw cache on every read.

pub mod bug_bash;
pub mod comment;
pub mod error_message;
pub mod item;
pub mod long_text;
pub mod refdata;
pub mod settings;

pub use bug_bash::BugBashStore;
pub use comment::CommentStore;
pub use error_message::{ErrorKey, ErrorMessageStore};
pub use item::BugBashItemStore;
pub use long_text::LongTextStore;
pub use refdata::RefDataStore;
pub use settings::SettingsStore;
