//! Long-text ("details") load/save orchestration.
//!
//! The document id mirrors the owning bug bash id, but the blob is
//! versioned on its own. A missing document is not an error: the store
//! is seeded with a local draft that the first save creates remotely.

use tracing::debug;

use crate::actions::capture;
use crate::client::{self, LONG_TEXTS_COLLECTION, Scope};
use crate::error::Result;
use crate::events::LongTextEvent;
use crate::model::records::LongTextRecord;
use crate::session::Session;
use crate::store::ErrorKey;

/// Load a long text unless already cached or in flight.
pub fn initialize(session: &mut Session, id: &str) {
    if id.trim().is_empty() || session.long_texts.is_loading(id) {
        return;
    }
    if session.long_texts.is_loaded(id) {
        session.long_texts.apply(&LongTextEvent::Unchanged);
        return;
    }
    refresh(session, id);
}

/// Force-reload a long text.
pub fn refresh(session: &mut Session, id: &str) {
    if id.trim().is_empty() || session.long_texts.is_loading(id) {
        return;
    }
    session.long_texts.set_loading(id, true);
    match fetch(session, id) {
        Ok(Some(record)) => session.long_texts.apply(&LongTextEvent::Fetched(record)),
        Ok(None) => {
            debug!(id, "no long text yet, seeding draft");
            session.long_texts.seed_draft(id);
        }
        Err(e) => {
            session.long_texts.set_loading(id, false);
            capture(session, ErrorKey::BugBashDetails, &e);
        }
    }
}

/// Persist pending text. Creates on first save, updates afterwards; a
/// clean model saves nothing.
pub fn save(session: &mut Session, id: &str) {
    let Some(model) = session.long_texts.get(id) else {
        return;
    };
    if !model.is_dirty() {
        return;
    }
    let record = model.effective();
    let result = if model.is_new() {
        persist_create(session, &record)
    } else {
        persist_update(session, &record)
    };

    match result {
        Ok(saved) => {
            debug!(id, etag = saved.etag, "saved long text");
            session.long_texts.apply(&LongTextEvent::Saved(saved));
        }
        // On failure (conflict included) the pending text stays put.
        Err(e) => capture(session, ErrorKey::BugBashDetails, &e),
    }
}

fn fetch(session: &Session, id: &str) -> Result<Option<LongTextRecord>> {
    session
        .client
        .read_document(LONG_TEXTS_COLLECTION, id, Scope::Shared)?
        .map(|document| client::decode(LONG_TEXTS_COLLECTION, document))
        .transpose()
}

fn persist_create(session: &mut Session, record: &LongTextRecord) -> Result<LongTextRecord> {
    let document = client::encode(record)?;
    let saved = session
        .client
        .create_document(LONG_TEXTS_COLLECTION, document, Scope::Shared)?;
    client::decode(LONG_TEXTS_COLLECTION, saved)
}

fn persist_update(session: &mut Session, record: &LongTextRecord) -> Result<LongTextRecord> {
    let document = client::encode(record)?;
    let saved = session
        .client
        .update_document(LONG_TEXTS_COLLECTION, document, Scope::Shared)?;
    client::decode(LONG_TEXTS_COLLECTION, saved)
}
