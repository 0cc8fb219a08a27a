//! Domain events published by actions and applied by stores.
//!
//! Events are facts: each one carries the server-confirmed outcome of a
//! completed client call. Stores consume them by wholesale cache
//! replacement. `Unchanged` is the already-loaded case: nothing to
//! apply, but subscribers are still notified so views re-read.

use crate::model::records::{
    BugBashItemRecord, BugBashRecord, CommentRecord, LongTextRecord, ProjectSettings, UserSettings,
};

#[derive(Debug, Clone)]
pub enum BugBashEvent {
    /// Full project list loaded or reloaded.
    Loaded(Vec<BugBashRecord>),
    /// A single bug bash loaded or reloaded.
    Fetched(BugBashRecord),
    Created(BugBashRecord),
    Updated(BugBashRecord),
    Deleted(String),
    Unchanged,
}

#[derive(Debug, Clone)]
pub enum BugBashItemEvent {
    /// The full item list of one bug bash loaded or reloaded.
    Loaded {
        bug_bash_id: String,
        items: Vec<BugBashItemRecord>,
    },
    Created(BugBashItemRecord),
    Updated(BugBashItemRecord),
    /// The item now carries a linked work item.
    Accepted(BugBashItemRecord),
    Deleted {
        bug_bash_id: String,
        item_id: String,
    },
    Unchanged,
}

#[derive(Debug, Clone)]
pub enum CommentEvent {
    /// The comment list of one item loaded or reloaded.
    Loaded {
        item_id: String,
        comments: Vec<CommentRecord>,
    },
    /// Append-only: comments are never updated or removed.
    Created {
        item_id: String,
        comment: CommentRecord,
    },
    Unchanged,
}

#[derive(Debug, Clone)]
pub enum LongTextEvent {
    Fetched(LongTextRecord),
    Saved(LongTextRecord),
    Unchanged,
}

#[derive(Debug, Clone)]
pub enum SettingsEvent {
    ProjectLoaded(ProjectSettings),
    ProjectSaved(ProjectSettings),
    UserLoaded(UserSettings),
    UserSaved(UserSettings),
    Unchanged,
}
