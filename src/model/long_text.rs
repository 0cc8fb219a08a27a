//! Editable long-text view-model.
//!
//! Backs the free-form "details" page of a bug bash. The blob is stored
//! and versioned independently of the bug bash record it documents, so
//! the document id is the owning bug bash's id but the etag advances on
//! its own. Keystroke-level edits arrive through a debounced slot and
//! only land in the pending patch once the coalescing window elapses.

use std::time::{Duration, Instant};

use crate::model::records::LongTextRecord;
use crate::util::debounce::Delayed;

/// Coalescing window for queued text edits.
pub const EDIT_DEBOUNCE: Duration = Duration::from_millis(200);

/// One long-text blob with original state, pending edit, and a
/// debounced edit slot.
#[derive(Debug)]
pub struct LongTextModel {
    original: LongTextRecord,
    /// Committed pending edit; `None` = no edit.
    patch: Option<String>,
    /// Debounced edit not yet committed to the patch.
    queued: Delayed<String>,
    /// Whether `original` came from the server (vs. a local draft for a
    /// document that does not exist yet).
    persisted: bool,
}

impl LongTextModel {
    /// Wrap a server-confirmed record.
    #[must_use]
    pub fn from_record(record: LongTextRecord) -> Self {
        Self {
            original: record,
            patch: None,
            queued: Delayed::new(),
            persisted: true,
        }
    }

    /// A local draft for a document that has never been saved. The id
    /// is known up front (it mirrors the bug bash id).
    #[must_use]
    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            original: LongTextRecord {
                id: id.into(),
                ..Default::default()
            },
            patch: None,
            queued: Delayed::new(),
            persisted: false,
        }
    }

    #[must_use]
    pub fn original(&self) -> &LongTextRecord {
        &self.original
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.original.id
    }

    /// True until the first successful save.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        !self.persisted
    }

    /// Effective text: pending edit, else original.
    #[must_use]
    pub fn text(&self) -> &str {
        self.patch.as_deref().unwrap_or(&self.original.text)
    }

    /// Commit a text edit immediately.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.queued.cancel();
        self.patch = Some(text.into());
    }

    /// Queue a text edit behind the coalescing window. An earlier
    /// queued value is cancelled, not merged.
    pub fn queue_text(&mut self, text: impl Into<String>, now: Instant) {
        self.queued.schedule(text.into(), now, EDIT_DEBOUNCE);
    }

    /// Commit the queued edit if its window has elapsed. Returns true
    /// when an edit landed.
    pub fn flush_queued(&mut self, now: Instant) -> bool {
        if let Some(text) = self.queued.take_due(now) {
            self.patch = Some(text);
            true
        } else {
            false
        }
    }

    /// The record a save would persist.
    #[must_use]
    pub fn effective(&self) -> LongTextRecord {
        LongTextRecord {
            id: self.original.id.clone(),
            etag: self.original.etag,
            text: self.text().to_string(),
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.text() != self.original.text
    }

    /// Discard the pending edit and any queued one.
    pub fn reset(&mut self) {
        self.patch = None;
        self.queued.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_edit_is_dirty_and_revertible() {
        let mut model = LongTextModel::from_record(LongTextRecord {
            id: "bash1".to_string(),
            etag: 4,
            text: "original notes".to_string(),
        });
        assert!(!model.is_dirty());

        model.set_text("revised notes");
        assert!(model.is_dirty());
        assert_eq!(model.text(), "revised notes");
        assert_eq!(model.original().text, "original notes");

        model.reset();
        assert!(!model.is_dirty());
        assert_eq!(model.text(), "original notes");
    }

    #[test]
    fn queued_edit_lands_only_after_window() {
        let start = Instant::now();
        let mut model = LongTextModel::draft("bash1");

        model.queue_text("typing…", start);
        assert!(!model.flush_queued(start + Duration::from_millis(50)));
        assert!(!model.is_dirty());

        assert!(model.flush_queued(start + EDIT_DEBOUNCE));
        assert_eq!(model.text(), "typing…");
        assert!(model.is_dirty());
    }

    #[test]
    fn later_queued_edit_supersedes_earlier() {
        let start = Instant::now();
        let mut model = LongTextModel::draft("bash1");

        model.queue_text("first", start);
        model.queue_text("second", start + Duration::from_millis(100));

        // Past the first deadline, before the second: nothing lands.
        assert!(!model.flush_queued(start + Duration::from_millis(250)));
        assert!(model.flush_queued(start + Duration::from_millis(300)));
        assert_eq!(model.text(), "second");
    }

    #[test]
    fn direct_set_cancels_queued_edit() {
        let start = Instant::now();
        let mut model = LongTextModel::draft("bash1");

        model.queue_text("stale keystrokes", start);
        model.set_text("explicit");
        assert!(!model.flush_queued(start + EDIT_DEBOUNCE));
        assert_eq!(model.text(), "explicit");
    }

    #[test]
    fn draft_is_new_until_replaced_by_server_state() {
        let draft = LongTextModel::draft("bash1");
        assert!(draft.is_new());
        assert_eq!(draft.effective().etag, 0);

        let loaded = LongTextModel::from_record(LongTextRecord {
            id: "bash1".to_string(),
            etag: 0,
            text: String::new(),
        });
        assert!(!loaded.is_new());
    }
}
