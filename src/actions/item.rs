//! Bug bash item load/save/triage orchestration.

use chrono::{Duration, Utc};
use tracing::debug;

use crate::actions::capture;
use crate::client::{self, Scope, items_collection};
use crate::error::{BugBashError, Result};
use crate::events::BugBashItemEvent;
use crate::model::records::BugBashItemRecord;
use crate::session::Session;
use crate::store::ErrorKey;
use crate::util::id::child_id;

/// Load a bug bash's items unless already cached or in flight.
pub fn initialize_items(session: &mut Session, bug_bash_id: &str) {
    if bug_bash_id.trim().is_empty() || session.items.is_loading(bug_bash_id) {
        return;
    }
    if session.items.is_loaded(bug_bash_id) {
        session.items.apply(&BugBashItemEvent::Unchanged);
        return;
    }
    refresh_items(session, bug_bash_id);
}

/// Force-reload a bug bash's items.
pub fn refresh_items(session: &mut Session, bug_bash_id: &str) {
    if bug_bash_id.trim().is_empty() || session.items.is_loading(bug_bash_id) {
        return;
    }
    session.items.set_loading(bug_bash_id, true);
    match load_items(session, bug_bash_id) {
        Ok(items) => {
            debug!(bug_bash_id, count = items.len(), "loaded items");
            session.items.apply(&BugBashItemEvent::Loaded {
                bug_bash_id: bug_bash_id.to_string(),
                items,
            });
        }
        Err(e) => {
            session.items.set_loading(bug_bash_id, false);
            capture(session, ErrorKey::BugBashItem, &e);
        }
    }
}

/// Persist pending edits: create for the parent's draft (empty item
/// id), update for a cached item. A clean or invalid model saves
/// nothing.
pub fn save_item(session: &mut Session, bug_bash_id: &str, item_id: &str) {
    if item_id.trim().is_empty() {
        create_item(session, bug_bash_id);
    } else {
        update_item(session, bug_bash_id, item_id);
    }
}

/// Delete an item. A no-op for unsaved ids.
pub fn delete_item(session: &mut Session, bug_bash_id: &str, item_id: &str) {
    if item_id.trim().is_empty() {
        return;
    }
    match session
        .client
        .delete_document(&items_collection(bug_bash_id), item_id, Scope::Shared)
    {
        Ok(()) => {
            debug!(bug_bash_id, item_id, "deleted item");
            session.items.apply(&BugBashItemEvent::Deleted {
                bug_bash_id: bug_bash_id.to_string(),
                item_id: item_id.to_string(),
            });
        }
        Err(e) => capture(session, ErrorKey::BugBashItem, &e),
    }
}

/// Persist acceptance of an item into an already-created work item.
///
/// The work item itself is created by the caller through the work-item
/// collaborator before this call; here the link is recorded and any
/// rejection state cleared.
pub fn accept_item(session: &mut Session, bug_bash_id: &str, item_id: &str, work_item_id: u32) {
    if work_item_id == 0 {
        capture(
            session,
            ErrorKey::BugBashItem,
            &BugBashError::validation("workItemId", "acceptance requires a linked work item"),
        );
        return;
    }
    let Some(model) = session.items.get(bug_bash_id, item_id) else {
        capture(
            session,
            ErrorKey::BugBashItem,
            &BugBashError::not_found("item", item_id),
        );
        return;
    };

    let mut record = model.effective();
    record.work_item_id = work_item_id;
    record.rejected = false;
    record.reject_reason = None;
    record.rejected_by = None;

    match persist_update(session, bug_bash_id, &record) {
        Ok(saved) => {
            debug!(item_id, work_item_id, "accepted item");
            session.items.apply(&BugBashItemEvent::Accepted(saved));
        }
        Err(e) => capture(session, ErrorKey::BugBashItem, &e),
    }
}

fn create_item(session: &mut Session, bug_bash_id: &str) {
    let draft = session.items.draft(bug_bash_id);
    if !draft.is_dirty() || !draft.is_valid(&session.reference) {
        return;
    }
    let mut record = draft.effective();

    let identity = session.config.identity.as_identity_string();
    let now = Utc::now();
    record.created_date = Some(now);
    record.created_by = identity.clone();
    record.id = free_child_id(session, bug_bash_id, now);
    normalize_rejection(&mut record, &identity);

    match persist_create(session, bug_bash_id, &record) {
        Ok(saved) => {
            debug!(bug_bash_id, id = %saved.id, "created item");
            session.items.apply(&BugBashItemEvent::Created(saved));
        }
        // Surfaced on the item channel like every other failure.
        Err(e) => capture(session, ErrorKey::BugBashItem, &e),
    }
}

fn update_item(session: &mut Session, bug_bash_id: &str, item_id: &str) {
    let Some(model) = session.items.get(bug_bash_id, item_id) else {
        capture(
            session,
            ErrorKey::BugBashItem,
            &BugBashError::not_found("item", item_id),
        );
        return;
    };
    if !model.is_dirty() || !model.is_valid(&session.reference) {
        return;
    }
    let mut record = model.effective();
    normalize_rejection(&mut record, &session.config.identity.as_identity_string());

    match persist_update(session, bug_bash_id, &record) {
        Ok(saved) => {
            debug!(item_id, etag = saved.etag, "updated item");
            session.items.apply(&BugBashItemEvent::Updated(saved));
        }
        // On failure (conflict included) the model's pending edits stay
        // as they were; the store is not touched.
        Err(e) => capture(session, ErrorKey::BugBashItem, &e),
    }
}

/// Stamp who rejected, or clear rejection leftovers when unrejected.
fn normalize_rejection(record: &mut BugBashItemRecord, identity: &str) {
    if record.rejected {
        if record.rejected_by.as_deref().unwrap_or("").is_empty() {
            record.rejected_by = Some(identity.to_string());
        }
    } else {
        record.reject_reason = None;
        record.rejected_by = None;
    }
}

/// `{parent}_{millis}`, bumped past any id already cached under the
/// parent so rapid creates in one session cannot collide.
fn free_child_id(session: &Session, bug_bash_id: &str, now: chrono::DateTime<Utc>) -> String {
    let mut at = now;
    loop {
        let id = child_id(bug_bash_id, at);
        if session.items.get(bug_bash_id, &id).is_none() {
            return id;
        }
        at += Duration::milliseconds(1);
    }
}

fn load_items(session: &Session, bug_bash_id: &str) -> Result<Vec<BugBashItemRecord>> {
    let collection = items_collection(bug_bash_id);
    let documents = session.client.read_documents(&collection, Scope::Shared)?;
    client::decode_all(&collection, documents)
}

fn persist_create(
    session: &mut Session,
    bug_bash_id: &str,
    record: &BugBashItemRecord,
) -> Result<BugBashItemRecord> {
    let collection = items_collection(bug_bash_id);
    let document = client::encode(record)?;
    let saved = session
        .client
        .create_document(&collection, document, Scope::Shared)?;
    client::decode(&collection, saved)
}

fn persist_update(
    session: &mut Session,
    bug_bash_id: &str,
    record: &BugBashItemRecord,
) -> Result<BugBashItemRecord> {
    let collection = items_collection(bug_bash_id);
    let document = client::encode(record)?;
    let saved = session
        .client
        .update_document(&collection, document, Scope::Shared)?;
    client::decode(&collection, saved)
}
