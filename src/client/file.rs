//! File-backed document store.
//!
//! One JSONL file per collection under `<root>/shared/` and
//! `<root>/user/`, plus a single `user_settings.json` map. Documents
//! are rehydrated wholesale at open time; every write persists the
//! touched collection with a temp-file + rename so a crash mid-write
//! never leaves a half-written file behind.
//!
//! Collection names used by this crate are filesystem-safe by
//! construction (alphanumerics and underscores), so they map directly
//! to file stems.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::client::memory::MemoryDocumentStore;
use crate::client::{DocumentStore, Scope};
use crate::error::{BugBashError, Result};

const SHARED_DIR: &str = "shared";
const USER_DIR: &str = "user";
const USER_SETTINGS_FILE: &str = "user_settings.json";

/// JSONL-file-per-collection document store.
#[derive(Debug)]
pub struct FileDocumentStore {
    root: PathBuf,
    cache: MemoryDocumentStore,
    user_settings: HashMap<String, Value>,
}

impl FileDocumentStore {
    /// Open a store rooted at `root`, creating the directory layout if
    /// needed and loading any existing collections.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the layout cannot be created or read, or a parse
    /// error if an existing file is corrupt.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(SHARED_DIR))?;
        fs::create_dir_all(root.join(USER_DIR))?;

        let mut store = Self {
            root,
            cache: MemoryDocumentStore::new(),
            user_settings: HashMap::new(),
        };
        store.load_scope(Scope::Shared)?;
        store.load_scope(Scope::User)?;
        store.load_user_settings()?;
        Ok(store)
    }

    fn scope_dir(&self, scope: Scope) -> PathBuf {
        match scope {
            Scope::Shared => self.root.join(SHARED_DIR),
            Scope::User => self.root.join(USER_DIR),
        }
    }

    fn collection_path(&self, collection: &str, scope: Scope) -> PathBuf {
        self.scope_dir(scope).join(format!("{collection}.jsonl"))
    }

    fn load_scope(&mut self, scope: Scope) -> Result<()> {
        for entry in fs::read_dir(self.scope_dir(scope))? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "jsonl") {
                continue;
            }
            let Some(collection) = path.file_stem().and_then(|s| s.to_str()).map(String::from)
            else {
                continue;
            };
            for document in read_jsonl(&path)? {
                self.cache.seed_document(&collection, scope, document);
            }
        }
        Ok(())
    }

    fn load_user_settings(&mut self) -> Result<()> {
        let path = self.root.join(USER_SETTINGS_FILE);
        if !path.exists() {
            return Ok(());
        }
        let raw = fs::read_to_string(&path)?;
        self.user_settings = serde_json::from_str(&raw)?;
        Ok(())
    }

    /// Persist one collection: write-to-temp, then atomic rename.
    fn persist_collection(&self, collection: &str, scope: Scope) -> Result<()> {
        let documents = self.cache.read_documents(collection, scope)?;
        let path = self.collection_path(collection, scope);
        let tmp_path = path.with_extension("jsonl.tmp");

        let mut file = fs::File::create(&tmp_path)?;
        for document in &documents {
            let line = serde_json::to_string(document)?;
            writeln!(file, "{line}")?;
        }
        file.flush()?;
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn persist_user_settings(&self) -> Result<()> {
        let path = self.root.join(USER_SETTINGS_FILE);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&self.user_settings)?)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

fn read_jsonl(path: &Path) -> Result<Vec<Value>> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut documents = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let document: Value =
            serde_json::from_str(trimmed).map_err(|e| BugBashError::Storage(format!(
                "{}:{}: {e}",
                path.display(),
                line_num + 1
            )))?;
        documents.push(document);
    }
    Ok(documents)
}

impl DocumentStore for FileDocumentStore {
    fn read_document(&self, collection: &str, id: &str, scope: Scope) -> Result<Option<Value>> {
        self.cache.read_document(collection, id, scope)
    }

    fn read_documents(&self, collection: &str, scope: Scope) -> Result<Vec<Value>> {
        self.cache.read_documents(collection, scope)
    }

    fn create_document(
        &mut self,
        collection: &str,
        document: Value,
        scope: Scope,
    ) -> Result<Value> {
        let created = self.cache.create_document(collection, document, scope)?;
        self.persist_collection(collection, scope)?;
        Ok(created)
    }

    fn update_document(
        &mut self,
        collection: &str,
        document: Value,
        scope: Scope,
    ) -> Result<Value> {
        let updated = self.cache.update_document(collection, document, scope)?;
        self.persist_collection(collection, scope)?;
        Ok(updated)
    }

    fn upsert_document(
        &mut self,
        collection: &str,
        document: Value,
        scope: Scope,
    ) -> Result<Value> {
        let stored = self.cache.upsert_document(collection, document, scope)?;
        self.persist_collection(collection, scope)?;
        Ok(stored)
    }

    fn delete_document(&mut self, collection: &str, id: &str, scope: Scope) -> Result<()> {
        self.cache.delete_document(collection, id, scope)?;
        self.persist_collection(collection, scope)
    }

    fn read_user_setting(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.user_settings.get(key).cloned())
    }

    fn write_user_setting(&mut self, key: &str, value: Value) -> Result<Value> {
        self.user_settings.insert(key.to_string(), value.clone());
        self.persist_user_settings()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{document_etag, document_id};
    use serde_json::json;

    #[test]
    fn documents_survive_reopen_with_etags_intact() {
        let dir = tempfile::tempdir().unwrap();

        let id = {
            let mut store = FileDocumentStore::open(dir.path()).unwrap();
            let created = store
                .create_document("bugbashes", json!({"id": "", "title": "Bash"}), Scope::Shared)
                .unwrap();
            let id = document_id(&created).unwrap().to_string();

            let mut edit = created;
            edit["title"] = json!("Renamed");
            store.update_document("bugbashes", edit, Scope::Shared).unwrap();
            id
        };

        let reopened = FileDocumentStore::open(dir.path()).unwrap();
        let read = reopened
            .read_document("bugbashes", &id, Scope::Shared)
            .unwrap()
            .unwrap();
        assert_eq!(read["title"], "Renamed");
        assert_eq!(document_etag(&read), 1);
    }

    #[test]
    fn stale_update_fails_after_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut store = FileDocumentStore::open(dir.path()).unwrap();
            let created = store
                .create_document("bugbashes", json!({"id": "b1"}), Scope::Shared)
                .unwrap();
            let mut edit = created;
            edit["title"] = json!("v1");
            store.update_document("bugbashes", edit, Scope::Shared).unwrap();
        }

        let mut reopened = FileDocumentStore::open(dir.path()).unwrap();
        let err = reopened
            .update_document("bugbashes", json!({"id": "b1", "__etag": 0}), Scope::Shared)
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn user_settings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut store = FileDocumentStore::open(dir.path()).unwrap();
            store
                .write_user_setting("team", json!({"associatedTeam": "t1"}))
                .unwrap();
        }

        let reopened = FileDocumentStore::open(dir.path()).unwrap();
        let read = reopened.read_user_setting("team").unwrap().unwrap();
        assert_eq!(read["associatedTeam"], "t1");
    }

    #[test]
    fn blank_lines_in_collection_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(SHARED_DIR)).unwrap();
        fs::write(
            dir.path().join(SHARED_DIR).join("bugbashes.jsonl"),
            "\n{\"id\":\"b1\",\"__etag\":2}\n\n",
        )
        .unwrap();

        let store = FileDocumentStore::open(dir.path()).unwrap();
        let read = store
            .read_document("bugbashes", "b1", Scope::Shared)
            .unwrap()
            .unwrap();
        assert_eq!(document_etag(&read), 2);
    }

    #[test]
    fn corrupt_collection_file_is_reported_with_position() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(SHARED_DIR)).unwrap();
        fs::write(dir.path().join(SHARED_DIR).join("bad.jsonl"), "{not json}\n").unwrap();

        let err = FileDocumentStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, BugBashError::Storage(_)));
        assert!(err.to_string().contains(":1:"));
    }
}
