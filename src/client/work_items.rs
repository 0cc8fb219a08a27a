//! Remote work-item service contract.
//!
//! The accept flow persists a `work_item_id` that the caller has
//! already created through this collaborator; the core never drives
//! work-item creation itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// One remote work item, fields keyed by reference name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u32,
    pub fields: serde_json::Map<String, Value>,
}

/// A single JSON-patch-style operation against a work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOp {
    /// `add`, `replace`, or `remove`.
    pub op: String,
    /// Field path, e.g. `/fields/System.Title`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOp {
    /// `add` op targeting a field by reference name.
    #[must_use]
    pub fn add_field(reference_name: &str, value: impl Into<Value>) -> Self {
        Self {
            op: "add".to_string(),
            path: format!("/fields/{reference_name}"),
            value: Some(value.into()),
        }
    }
}

/// Remote work-item REST surface.
pub trait WorkItemClient {
    /// Fetch work items by id, restricted to the named fields.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or unknown ids.
    fn get_work_items(&self, ids: &[u32], fields: &[String]) -> Result<Vec<WorkItem>>;

    /// Create a work item of `work_item_type` in `project_id`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a rejected patch.
    fn create_work_item(
        &mut self,
        patch: &[PatchOp],
        project_id: &str,
        work_item_type: &str,
    ) -> Result<WorkItem>;

    /// Apply a patch to an existing work item.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a rejected patch.
    fn update_work_item(&mut self, patch: &[PatchOp], id: u32) -> Result<WorkItem>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_field_builds_a_fields_path() {
        let op = PatchOp::add_field("System.Title", "Broken layout");
        assert_eq!(op.op, "add");
        assert_eq!(op.path, "/fields/System.Title");
        assert_eq!(op.value, Some(Value::String("Broken layout".to_string())));
    }
}
