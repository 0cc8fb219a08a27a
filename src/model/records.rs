//! Persisted document shapes.
//!
//! Documents travel as camelCase JSON with a required `id` and `__etag`
//! (optimistic-concurrency version, 0 for a fresh document, incremented
//! by the store on each successful write). Date fields are ISO-8601
//! strings with `""` meaning unset; see [`crate::util::time::iso_opt`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::time::iso_opt;

/// Maximum length for bug bash and item titles.
pub const MAX_TITLE_LEN: usize = 256;

/// Maximum length for an item's rejection reason.
pub const MAX_REJECT_REASON_LEN: usize = 128;

/// One bug bash event: the top-level organizing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BugBashRecord {
    /// Empty string = unsaved; the store assigns an id on create.
    pub id: String,

    /// Optimistic-concurrency version token.
    #[serde(rename = "__etag")]
    pub etag: i64,

    pub title: String,

    /// Work item type items get promoted into; must name a type known
    /// to the host.
    pub work_item_type: String,

    /// Scope filter: reads and writes outside the active project are
    /// treated as not-found.
    pub project_id: String,

    /// Field that receives the item description on promotion; must be
    /// rich-text capable.
    pub item_description_field: String,

    pub auto_accept: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(with = "iso_opt")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(with = "iso_opt")]
    pub end_time: Option<DateTime<Utc>>,

    /// Team whose template is applied when auto-creating work items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_template_team: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_template_id: Option<String>,
}

impl BugBashRecord {
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.trim().is_empty()
    }
}

/// One candidate item submitted during a bug bash.
///
/// The parent reference is by id, not ownership: the item's lifetime is
/// independent once created, but queries are always parent-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BugBashItemRecord {
    pub id: String,

    #[serde(rename = "__etag")]
    pub etag: i64,

    pub bug_bash_id: String,

    pub title: String,

    /// Must resolve to a known team.
    pub team_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 0 = not yet promoted; > 0 = accepted into this work item.
    pub work_item_id: u32,

    #[serde(with = "iso_opt")]
    pub created_date: Option<DateTime<Utc>>,

    /// `"Display Name <unique.name>"`, immutable once set.
    pub created_by: String,

    pub rejected: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
}

impl BugBashItemRecord {
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.trim().is_empty()
    }
}

/// A comment attached to one item. Append-only: no update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentRecord {
    pub id: String,

    #[serde(rename = "__etag")]
    pub etag: i64,

    pub created_by: String,

    #[serde(with = "iso_opt")]
    pub created_date: Option<DateTime<Utc>>,

    /// Rich text.
    pub content: String,
}

/// A single long rich-text blob, versioned independently of the bug
/// bash it documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LongTextRecord {
    pub id: String,

    #[serde(rename = "__etag")]
    pub etag: i64,

    pub text: String,
}

/// Per-project configuration, single instance per project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub id: String,

    #[serde(rename = "__etag")]
    pub etag: i64,

    /// Git repository receiving pasted-image uploads.
    pub git_media_repo: String,
}

/// Per-user configuration, single instance per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub id: String,

    #[serde(rename = "__etag")]
    pub etag: i64,

    /// Team preselected for this user's new items.
    pub associated_team: String,
}
