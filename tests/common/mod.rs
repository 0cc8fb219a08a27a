//! Shared helpers for integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use bugbash::client::{DocumentStore, MemoryDocumentStore, PatchOp, WorkItem, WorkItemClient};
use bugbash::config::{Identity, SessionConfig};
use bugbash::model::refdata::{FieldDef, FieldKind, Team, WorkItemTypeDef};
use bugbash::{Result, Session};

pub fn config() -> SessionConfig {
    SessionConfig::new(
        "proj",
        Identity {
            display_name: "Ada Lovelace".to_string(),
            unique_name: "ada@example.com".to_string(),
        },
    )
}

pub fn reference_data() -> (Vec<Team>, Vec<WorkItemTypeDef>, Vec<FieldDef>) {
    (
        vec![
            Team {
                id: "team1".to_string(),
                name: "Core".to_string(),
            },
            Team {
                id: "team2".to_string(),
                name: "Web".to_string(),
            },
        ],
        vec![WorkItemTypeDef {
            name: "Bug".to_string(),
        }],
        vec![FieldDef {
            reference_name: "System.Description".to_string(),
            name: "Description".to_string(),
            kind: FieldKind::Html,
        }],
    )
}

/// A session over the given client, with reference data loaded.
pub fn session_with(client: Box<dyn DocumentStore>) -> Session {
    let mut session = Session::new(config(), client);
    let (teams, types, fields) = reference_data();
    session.load_reference_data(teams, types, fields);
    session
}

/// A session over a fresh in-memory document store.
pub fn session() -> Session {
    session_with(Box::new(MemoryDocumentStore::new()))
}

/// Compose and save a valid bug bash; returns its assigned id.
pub fn create_bug_bash(session: &mut Session, title: &str) -> String {
    session.bug_bashes.with_draft_mut(|d| {
        d.set_title(title);
        d.set_work_item_type("bug");
        d.set_item_description_field("system.description");
    });
    bugbash::actions::bug_bash::save(session, "");
    session
        .bug_bashes
        .all()
        .iter()
        .find(|m| m.title() == title)
        .map(|m| m.id().to_string())
        .expect("bug bash should have been created")
}

/// Compose and save a valid item; returns its assigned id.
pub fn create_item(session: &mut Session, bug_bash_id: &str, title: &str) -> String {
    session.items.with_draft_mut(bug_bash_id, |d| {
        d.set_title(title);
        d.set_team_id("team1");
    });
    bugbash::actions::item::save_item(session, bug_bash_id, "");
    session
        .items
        .items_for(bug_bash_id)
        .iter()
        .find(|m| m.title() == title)
        .map(|m| m.id().to_string())
        .expect("item should have been created")
}

/// In-memory stand-in for the remote work-item service.
pub struct FakeWorkItemClient {
    items: Vec<WorkItem>,
    next_id: u32,
}

impl FakeWorkItemClient {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 500,
        }
    }
}

impl WorkItemClient for FakeWorkItemClient {
    fn get_work_items(&self, ids: &[u32], _fields: &[String]) -> Result<Vec<WorkItem>> {
        Ok(self
            .items
            .iter()
            .filter(|w| ids.contains(&w.id))
            .cloned()
            .collect())
    }

    fn create_work_item(
        &mut self,
        patch: &[PatchOp],
        _project_id: &str,
        _work_item_type: &str,
    ) -> Result<WorkItem> {
        self.next_id += 1;
        let mut fields = serde_json::Map::new();
        for op in patch {
            if let (Some(name), Some(value)) = (op.path.strip_prefix("/fields/"), &op.value) {
                fields.insert(name.to_string(), value.clone());
            }
        }
        let item = WorkItem {
            id: self.next_id,
            fields,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    fn update_work_item(&mut self, patch: &[PatchOp], id: u32) -> Result<WorkItem> {
        let item = self
            .items
            .iter_mut()
            .find(|w| w.id == id)
            .expect("work item should exist");
        for op in patch {
            if let (Some(name), Some(value)) = (op.path.strip_prefix("/fields/"), &op.value) {
                item.fields.insert(name.to_string(), value.clone());
            }
        }
        Ok(item.clone())
    }
}
