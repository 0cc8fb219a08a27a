//! Document store and work-item service collaborator contracts.
//!
//! The host platform provides versioned-document storage: JSON
//! documents with a required `id` and `__etag`, grouped into named
//! collections, with optimistic concurrency on writes. The core only
//! depends on the trait here; [`memory`] and [`file`] supply concrete
//! backends with the same semantics.

pub mod file;
pub mod memory;
pub mod work_items;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BugBashError, Result};

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use work_items::{PatchOp, WorkItem, WorkItemClient};

/// Flat collection holding all bug bash records.
pub const BUG_BASHES_COLLECTION: &str = "bugbashes";

/// Flat collection holding all long-text records.
pub const LONG_TEXTS_COLLECTION: &str = "longtexts";

/// Flat collection holding per-project settings documents.
pub const SETTINGS_COLLECTION: &str = "settings";

/// Per-bug-bash item collection name.
#[must_use]
pub fn items_collection(bug_bash_id: &str) -> String {
    format!("BugBashCollection_{bug_bash_id}")
}

/// Per-item comment collection name.
#[must_use]
pub fn comments_collection(item_id: &str) -> String {
    format!("BugBashItemCollection_{item_id}")
}

/// Visibility scope of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Shared across the project.
    Shared,
    /// Private to the current user.
    User,
}

/// Versioned-document storage, as exposed by the host platform.
///
/// All writes enforce optimistic concurrency: `create_document` fails
/// when the id already exists (and assigns an id when the document's is
/// blank), `update_document` fails with a conflict when the presented
/// `__etag` is stale and increments it on success, `delete_document`
/// fails when the document is already gone.
pub trait DocumentStore {
    /// Read one document, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or storage failure.
    fn read_document(&self, collection: &str, id: &str, scope: Scope) -> Result<Option<Value>>;

    /// Read every document in a collection (empty when the collection
    /// does not exist).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or storage failure.
    fn read_documents(&self, collection: &str, scope: Scope) -> Result<Vec<Value>>;

    /// Create a document; fails on id collision. Returns the stored
    /// document (id assigned, `__etag` = 0).
    ///
    /// # Errors
    ///
    /// Returns `IdCollision` when the id already exists.
    fn create_document(&mut self, collection: &str, document: Value, scope: Scope)
    -> Result<Value>;

    /// Update a document; fails when absent or when the presented
    /// `__etag` is stale. Returns the stored document with the
    /// incremented `__etag`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when absent, `Conflict` on a stale version.
    fn update_document(&mut self, collection: &str, document: Value, scope: Scope)
    -> Result<Value>;

    /// Create-or-replace without a version check; the stored `__etag`
    /// still advances on replacement.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or storage failure.
    fn upsert_document(&mut self, collection: &str, document: Value, scope: Scope)
    -> Result<Value>;

    /// Delete a document; fails when already deleted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the document is absent.
    fn delete_document(&mut self, collection: &str, id: &str, scope: Scope) -> Result<()>;

    /// Read a per-user key/value setting, `None` when never written.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or storage failure.
    fn read_user_setting(&self, key: &str) -> Result<Option<Value>>;

    /// Write a per-user key/value setting (no version check).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or storage failure.
    fn write_user_setting(&mut self, key: &str, value: Value) -> Result<Value>;
}

// === Raw document helpers, shared by backends and actions ===

/// Extract a document's id.
#[must_use]
pub fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

/// Extract a document's version token (0 when missing).
#[must_use]
pub fn document_etag(document: &Value) -> i64 {
    document.get("__etag").and_then(Value::as_i64).unwrap_or(0)
}

/// Stamp id and version onto a raw document.
pub fn stamp(document: &mut Value, id: &str, etag: i64) {
    if let Value::Object(map) = document {
        map.insert("id".to_string(), Value::String(id.to_string()));
        map.insert("__etag".to_string(), Value::from(etag));
    }
}

/// Decode a raw document into a typed record.
///
/// # Errors
///
/// Returns `MalformedDocument` naming the collection when the payload
/// does not match the record shape.
pub fn decode<T: DeserializeOwned>(collection: &str, document: Value) -> Result<T> {
    serde_json::from_value(document).map_err(|e| BugBashError::MalformedDocument {
        collection: collection.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a batch of raw documents.
///
/// # Errors
///
/// Fails on the first malformed document.
pub fn decode_all<T: DeserializeOwned>(collection: &str, documents: Vec<Value>) -> Result<Vec<T>> {
    documents
        .into_iter()
        .map(|doc| decode(collection, doc))
        .collect()
}

/// Encode a typed record into a raw document.
///
/// # Errors
///
/// Returns `Json` when the record cannot be serialized.
pub fn encode<T: Serialize>(record: &T) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_follow_the_convention() {
        assert_eq!(items_collection("bash1"), "BugBashCollection_bash1");
        assert_eq!(
            comments_collection("bash1_1700"),
            "BugBashItemCollection_bash1_1700"
        );
    }

    #[test]
    fn raw_helpers_read_and_stamp() {
        let mut doc = serde_json::json!({"title": "x"});
        assert_eq!(document_id(&doc), None);
        assert_eq!(document_etag(&doc), 0);

        stamp(&mut doc, "abc", 3);
        assert_eq!(document_id(&doc), Some("abc"));
        assert_eq!(document_etag(&doc), 3);
    }
}
