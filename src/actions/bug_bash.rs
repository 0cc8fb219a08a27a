//! Bug bash load/save/delete orchestration.

use tracing::debug;

use crate::actions::capture;
use crate::client::{self, BUG_BASHES_COLLECTION, Scope};
use crate::error::{BugBashError, Result};
use crate::events::BugBashEvent;
use crate::model::records::BugBashRecord;
use crate::session::Session;
use crate::store::ErrorKey;

/// Load the project's bug bashes unless already cached or in flight.
pub fn initialize(session: &mut Session) {
    if session.bug_bashes.is_loading_all() {
        return;
    }
    if session.bug_bashes.is_loaded_all() {
        session.bug_bashes.apply(&BugBashEvent::Unchanged);
        return;
    }
    refresh(session);
}

/// Force-reload the project's bug bashes.
pub fn refresh(session: &mut Session) {
    if session.bug_bashes.is_loading_all() {
        return;
    }
    session.bug_bashes.set_loading_all(true);
    match load_all(session) {
        Ok(records) => {
            debug!(count = records.len(), "loaded bug bashes");
            session.bug_bashes.apply(&BugBashEvent::Loaded(records));
        }
        Err(e) => {
            session.bug_bashes.set_loading_all(false);
            capture(session, ErrorKey::BugBash, &e);
        }
    }
}

/// Load one bug bash unless already cached or in flight.
pub fn initialize_one(session: &mut Session, id: &str) {
    if id.trim().is_empty() || session.bug_bashes.is_loading(id) {
        return;
    }
    if session.bug_bashes.get(id).is_some() {
        session.bug_bashes.apply(&BugBashEvent::Unchanged);
        return;
    }
    refresh_one(session, id);
}

/// Force-reload one bug bash.
pub fn refresh_one(session: &mut Session, id: &str) {
    if id.trim().is_empty() || session.bug_bashes.is_loading(id) {
        return;
    }
    session.bug_bashes.set_loading(id, true);
    match fetch_one(session, id) {
        Ok(record) => session.bug_bashes.apply(&BugBashEvent::Fetched(record)),
        Err(e) => {
            session.bug_bashes.set_loading(id, false);
            capture(session, ErrorKey::BugBash, &e);
        }
    }
}

/// Persist pending edits: create for the draft (empty id), update for a
/// cached bug bash. A clean or invalid model saves nothing.
pub fn save(session: &mut Session, id: &str) {
    if id.trim().is_empty() {
        create(session);
    } else {
        update(session, id);
    }
}

/// Delete a bug bash. A no-op for unsaved ids; the items it contained
/// keep their own lifetime.
pub fn delete(session: &mut Session, id: &str) {
    if id.trim().is_empty() {
        return;
    }
    match session
        .client
        .delete_document(BUG_BASHES_COLLECTION, id, Scope::Shared)
    {
        Ok(()) => {
            debug!(id, "deleted bug bash");
            session.bug_bashes.apply(&BugBashEvent::Deleted(id.to_string()));
        }
        Err(e) => capture(session, ErrorKey::BugBash, &e),
    }
}

fn create(session: &mut Session) {
    let draft = session.bug_bashes.draft();
    if !draft.is_dirty() || !draft.is_valid(&session.reference) {
        return;
    }
    let mut record = draft.effective();
    record.project_id = session.config.project_id.clone();

    match persist_create(session, &record) {
        Ok(saved) => {
            debug!(id = %saved.id, "created bug bash");
            session.bug_bashes.apply(&BugBashEvent::Created(saved));
        }
        Err(e) => capture(session, ErrorKey::BugBash, &e),
    }
}

fn update(session: &mut Session, id: &str) {
    let Some(model) = session.bug_bashes.get(id) else {
        capture(
            session,
            ErrorKey::BugBash,
            &BugBashError::not_found("bug bash", id),
        );
        return;
    };
    if !model.is_dirty() || !model.is_valid(&session.reference) {
        return;
    }
    let record = model.effective();
    if record.project_id != session.config.project_id {
        capture(
            session,
            ErrorKey::BugBash,
            &BugBashError::not_found("bug bash", id),
        );
        return;
    }

    match persist_update(session, &record) {
        Ok(saved) => {
            debug!(id = %saved.id, etag = saved.etag, "updated bug bash");
            session.bug_bashes.apply(&BugBashEvent::Updated(saved));
        }
        // On failure (conflict included) the model's pending edits stay
        // as they were; the store is not touched.
        Err(e) => capture(session, ErrorKey::BugBash, &e),
    }
}

fn load_all(session: &Session) -> Result<Vec<BugBashRecord>> {
    let documents = session
        .client
        .read_documents(BUG_BASHES_COLLECTION, Scope::Shared)?;
    let records: Vec<BugBashRecord> = client::decode_all(BUG_BASHES_COLLECTION, documents)?;
    // Cross-project records are invisible, not access-denied.
    Ok(records
        .into_iter()
        .filter(|r| r.project_id == session.config.project_id)
        .collect())
}

fn fetch_one(session: &Session, id: &str) -> Result<BugBashRecord> {
    let document = session
        .client
        .read_document(BUG_BASHES_COLLECTION, id, Scope::Shared)?
        .ok_or_else(|| BugBashError::not_found("bug bash", id))?;
    let record: BugBashRecord = client::decode(BUG_BASHES_COLLECTION, document)?;
    if record.project_id == session.config.project_id {
        Ok(record)
    } else {
        Err(BugBashError::not_found("bug bash", id))
    }
}

fn persist_create(session: &mut Session, record: &BugBashRecord) -> Result<BugBashRecord> {
    let document = client::encode(record)?;
    let saved = session
        .client
        .create_document(BUG_BASHES_COLLECTION, document, Scope::Shared)?;
    client::decode(BUG_BASHES_COLLECTION, saved)
}

fn persist_update(session: &mut Session, record: &BugBashRecord) -> Result<BugBashRecord> {
    let document = client::encode(record)?;
    let saved = session
        .client
        .update_document(BUG_BASHES_COLLECTION, document, Scope::Shared)?;
    client::decode(BUG_BASHES_COLLECTION, saved)
}
