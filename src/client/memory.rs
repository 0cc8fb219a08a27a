//! In-memory document store.
//!
//! The reference backend: all collections live in nested maps, with the
//! same etag discipline a remote store enforces. Doubles as the test
//! harness for everything above the client boundary.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;

use crate::client::{DocumentStore, Scope, document_etag, document_id, stamp};
use crate::error::{BugBashError, Result};
use crate::util::id::generate_document_id;

type Collections = HashMap<String, HashMap<String, Value>>;

/// In-memory versioned-document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    shared: Collections,
    user: Collections,
    user_settings: HashMap<String, Value>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collections(&self, scope: Scope) -> &Collections {
        match scope {
            Scope::Shared => &self.shared,
            Scope::User => &self.user,
        }
    }

    fn collections_mut(&mut self, scope: Scope) -> &mut Collections {
        match scope {
            Scope::Shared => &mut self.shared,
            Scope::User => &mut self.user,
        }
    }

    /// Insert a document as-is, preserving its stored id and etag.
    /// Used by persistent backends when rehydrating from disk.
    pub(crate) fn seed_document(&mut self, collection: &str, scope: Scope, document: Value) {
        if let Some(id) = document_id(&document).map(str::to_string) {
            self.collections_mut(scope)
                .entry(collection.to_string())
                .or_default()
                .insert(id, document);
        }
    }

    /// Resolve the stored id: keep a non-blank one, assign otherwise.
    fn resolve_id(collection: &str, docs: &HashMap<String, Value>, document: &Value) -> String {
        match document_id(document) {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => generate_document_id(
                collection,
                &document.to_string(),
                Utc::now(),
                docs.len(),
                |candidate| docs.contains_key(candidate),
            ),
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read_document(&self, collection: &str, id: &str, scope: Scope) -> Result<Option<Value>> {
        Ok(self
            .collections(scope)
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn read_documents(&self, collection: &str, scope: Scope) -> Result<Vec<Value>> {
        Ok(self
            .collections(scope)
            .get(collection)
            .map(|docs| {
                let mut all: Vec<Value> = docs.values().cloned().collect();
                // Deterministic order for callers and tests.
                all.sort_by(|a, b| document_id(a).cmp(&document_id(b)));
                all
            })
            .unwrap_or_default())
    }

    fn create_document(
        &mut self,
        collection: &str,
        mut document: Value,
        scope: Scope,
    ) -> Result<Value> {
        let docs = self
            .collections_mut(scope)
            .entry(collection.to_string())
            .or_default();

        let id = Self::resolve_id(collection, docs, &document);
        if docs.contains_key(&id) {
            return Err(BugBashError::IdCollision {
                collection: collection.to_string(),
                id,
            });
        }

        stamp(&mut document, &id, 0);
        docs.insert(id, document.clone());
        Ok(document)
    }

    fn update_document(
        &mut self,
        collection: &str,
        mut document: Value,
        scope: Scope,
    ) -> Result<Value> {
        let id = document_id(&document)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| BugBashError::not_found("document", ""))?
            .to_string();

        let docs = self
            .collections_mut(scope)
            .entry(collection.to_string())
            .or_default();

        let Some(current) = docs.get(&id) else {
            return Err(BugBashError::not_found("document", id));
        };

        let current_etag = document_etag(current);
        if document_etag(&document) != current_etag {
            return Err(BugBashError::Conflict { id });
        }

        stamp(&mut document, &id, current_etag + 1);
        docs.insert(id, document.clone());
        Ok(document)
    }

    fn upsert_document(
        &mut self,
        collection: &str,
        mut document: Value,
        scope: Scope,
    ) -> Result<Value> {
        let docs = self
            .collections_mut(scope)
            .entry(collection.to_string())
            .or_default();

        let id = Self::resolve_id(collection, docs, &document);
        let next_etag = docs.get(&id).map_or(0, |current| document_etag(current) + 1);

        stamp(&mut document, &id, next_etag);
        docs.insert(id, document.clone());
        Ok(document)
    }

    fn delete_document(&mut self, collection: &str, id: &str, scope: Scope) -> Result<()> {
        let removed = self
            .collections_mut(scope)
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));

        if removed.is_none() {
            return Err(BugBashError::not_found("document", id));
        }
        Ok(())
    }

    fn read_user_setting(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.user_settings.get(key).cloned())
    }

    fn write_user_setting(&mut self, key: &str, value: Value) -> Result<Value> {
        self.user_settings.insert(key.to_string(), value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryDocumentStore {
        MemoryDocumentStore::new()
    }

    #[test]
    fn create_assigns_id_and_zero_etag_for_blank_id() {
        let mut s = store();
        let created = s
            .create_document("bugbashes", json!({"id": "", "title": "Bash"}), Scope::Shared)
            .unwrap();

        let id = document_id(&created).unwrap().to_string();
        assert!(!id.is_empty());
        assert_eq!(document_etag(&created), 0);

        let read = s.read_document("bugbashes", &id, Scope::Shared).unwrap();
        assert_eq!(read, Some(created));
    }

    #[test]
    fn create_fails_on_existing_id() {
        let mut s = store();
        s.create_document("bugbashes", json!({"id": "b1"}), Scope::Shared)
            .unwrap();
        let err = s
            .create_document("bugbashes", json!({"id": "b1"}), Scope::Shared)
            .unwrap_err();
        assert!(matches!(err, BugBashError::IdCollision { .. }));
    }

    #[test]
    fn update_increments_etag_and_rejects_stale_writers() {
        let mut s = store();
        let created = s
            .create_document("bugbashes", json!({"id": "b1", "title": "v0"}), Scope::Shared)
            .unwrap();

        let mut fresh = created.clone();
        fresh["title"] = json!("v1");
        let updated = s.update_document("bugbashes", fresh, Scope::Shared).unwrap();
        assert_eq!(document_etag(&updated), 1);

        // A second writer still holding etag 0 loses.
        let mut stale = created;
        stale["title"] = json!("competing");
        let err = s.update_document("bugbashes", stale, Scope::Shared).unwrap_err();
        assert!(err.is_conflict());

        // The stored document is untouched by the failed write.
        let read = s.read_document("bugbashes", "b1", Scope::Shared).unwrap().unwrap();
        assert_eq!(read["title"], "v1");
    }

    #[test]
    fn update_absent_document_is_not_found() {
        let mut s = store();
        let err = s
            .update_document("bugbashes", json!({"id": "ghost", "__etag": 0}), Scope::Shared)
            .unwrap_err();
        assert!(matches!(err, BugBashError::NotFound { .. }));
    }

    #[test]
    fn upsert_creates_then_replaces_with_advancing_etag() {
        let mut s = store();
        let first = s
            .upsert_document("settings", json!({"id": "proj", "gitMediaRepo": "a"}), Scope::Shared)
            .unwrap();
        assert_eq!(document_etag(&first), 0);

        let second = s
            .upsert_document("settings", json!({"id": "proj", "gitMediaRepo": "b"}), Scope::Shared)
            .unwrap();
        assert_eq!(document_etag(&second), 1);
    }

    #[test]
    fn delete_absent_document_fails() {
        let mut s = store();
        s.create_document("bugbashes", json!({"id": "b1"}), Scope::Shared)
            .unwrap();
        s.delete_document("bugbashes", "b1", Scope::Shared).unwrap();

        let err = s.delete_document("bugbashes", "b1", Scope::Shared).unwrap_err();
        assert!(matches!(err, BugBashError::NotFound { .. }));
    }

    #[test]
    fn scopes_are_disjoint() {
        let mut s = store();
        s.create_document("c", json!({"id": "x"}), Scope::Shared).unwrap();
        assert!(s.read_document("c", "x", Scope::User).unwrap().is_none());
    }

    #[test]
    fn user_settings_round_trip() {
        let mut s = store();
        assert!(s.read_user_setting("team").unwrap().is_none());
        s.write_user_setting("team", json!({"associatedTeam": "t1"}))
            .unwrap();
        let read = s.read_user_setting("team").unwrap().unwrap();
        assert_eq!(read["associatedTeam"], "t1");
    }

    #[test]
    fn read_documents_is_sorted_by_id() {
        let mut s = store();
        s.create_document("c", json!({"id": "b"}), Scope::Shared).unwrap();
        s.create_document("c", json!({"id": "a"}), Scope::Shared).unwrap();

        let all = s.read_documents("c", Scope::Shared).unwrap();
        let ids: Vec<&str> = all.iter().filter_map(document_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
