//! Host-supplied reference data.
//!
//! Teams, work item types, and field definitions come from the host
//! platform at session start. Validity checks on editable models
//! resolve references against whatever has been loaded; a reference to
//! an entity that is absent (or not yet loaded) never validates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemTypeDef {
    pub name: String,
}

/// Field value kind, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Html,
    PlainText,
    Integer,
    Boolean,
    DateTime,
}

impl FieldKind {
    /// Only rich-text fields can hold an item description.
    #[must_use]
    pub const fn is_rich_text(self) -> bool {
        matches!(self, Self::Html)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Stable reference name, e.g. `System.Description`. Matched
    /// case-insensitively.
    pub reference_name: String,
    pub name: String,
    pub kind: FieldKind,
}

/// Reference resolution used by model validity checks.
pub trait ReferenceLookup {
    fn team_exists(&self, team_id: &str) -> bool;
    fn work_item_type_exists(&self, name: &str) -> bool;
    fn field(&self, reference_name: &str) -> Option<&FieldDef>;
}
