//! Editable bug bash view-model.
//!
//! Wraps the last server-confirmed record together with a sparse patch
//! of pending edits. A field absent from the patch falls back to the
//! original on read, so "dirty" is a per-field comparison of effective
//! vs. original values rather than a deep diff of two full records —
//! and the id, version, and project scope are never patchable.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::model::records::{BugBashRecord, MAX_TITLE_LEN};
use crate::model::refdata::ReferenceLookup;
use crate::util::time::valid_window;

/// Pending edits for a [`BugBashRecord`]. Only changed fields are set;
/// clearable optionals use the two-level `Option<Option<_>>` shape.
#[derive(Debug, Clone, Default)]
struct BugBashPatch {
    title: Option<String>,
    work_item_type: Option<String>,
    item_description_field: Option<String>,
    auto_accept: Option<bool>,
    description: Option<Option<String>>,
    start_time: Option<Option<DateTime<Utc>>>,
    end_time: Option<Option<DateTime<Utc>>>,
    accept_template_team: Option<Option<String>>,
    accept_template_id: Option<Option<String>>,
}

/// One bug bash with its original state and pending edits.
#[derive(Debug, Clone)]
pub struct BugBashModel {
    original: BugBashRecord,
    patch: BugBashPatch,
}

impl BugBashModel {
    /// Wrap a server-confirmed record. Starts clean.
    #[must_use]
    pub fn from_record(record: BugBashRecord) -> Self {
        Self {
            original: record,
            patch: BugBashPatch::default(),
        }
    }

    /// A blank unsaved bug bash (empty id, version 0).
    #[must_use]
    pub fn blank() -> Self {
        Self::from_record(BugBashRecord::default())
    }

    /// Last server-confirmed state, ignoring pending edits.
    #[must_use]
    pub fn original(&self) -> &BugBashRecord {
        &self.original
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.original.id
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.original.is_new()
    }

    // === Effective (merged) reads ===

    #[must_use]
    pub fn title(&self) -> &str {
        self.patch.title.as_deref().unwrap_or(&self.original.title)
    }

    #[must_use]
    pub fn work_item_type(&self) -> &str {
        self.patch
            .work_item_type
            .as_deref()
            .unwrap_or(&self.original.work_item_type)
    }

    #[must_use]
    pub fn item_description_field(&self) -> &str {
        self.patch
            .item_description_field
            .as_deref()
            .unwrap_or(&self.original.item_description_field)
    }

    #[must_use]
    pub fn auto_accept(&self) -> bool {
        self.patch.auto_accept.unwrap_or(self.original.auto_accept)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match &self.patch.description {
            Some(edited) => edited.as_deref(),
            None => self.original.description.as_deref(),
        }
    }

    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.patch.start_time.unwrap_or(self.original.start_time)
    }

    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.patch.end_time.unwrap_or(self.original.end_time)
    }

    #[must_use]
    pub fn accept_template_team(&self) -> Option<&str> {
        match &self.patch.accept_template_team {
            Some(edited) => edited.as_deref(),
            None => self.original.accept_template_team.as_deref(),
        }
    }

    #[must_use]
    pub fn accept_template_id(&self) -> Option<&str> {
        match &self.patch.accept_template_id {
            Some(edited) => edited.as_deref(),
            None => self.original.accept_template_id.as_deref(),
        }
    }

    /// The record a save would persist: pending edits merged over the
    /// original, with id, version, and project scope always original.
    #[must_use]
    pub fn effective(&self) -> BugBashRecord {
        BugBashRecord {
            id: self.original.id.clone(),
            etag: self.original.etag,
            project_id: self.original.project_id.clone(),
            title: self.title().to_string(),
            work_item_type: self.work_item_type().to_string(),
            item_description_field: self.item_description_field().to_string(),
            auto_accept: self.auto_accept(),
            description: self.description().map(str::to_string),
            start_time: self.start_time(),
            end_time: self.end_time(),
            accept_template_team: self.accept_template_team().map(str::to_string),
            accept_template_id: self.accept_template_id().map(str::to_string),
        }
    }

    // === Edits ===

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.patch.title = Some(title.into());
    }

    pub fn set_work_item_type(&mut self, work_item_type: impl Into<String>) {
        self.patch.work_item_type = Some(work_item_type.into());
    }

    pub fn set_item_description_field(&mut self, field: impl Into<String>) {
        self.patch.item_description_field = Some(field.into());
    }

    pub fn set_auto_accept(&mut self, auto_accept: bool) {
        self.patch.auto_accept = Some(auto_accept);
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.patch.description = Some(description);
    }

    pub fn set_start_time(&mut self, start_time: Option<DateTime<Utc>>) {
        self.patch.start_time = Some(start_time);
    }

    pub fn set_end_time(&mut self, end_time: Option<DateTime<Utc>>) {
        self.patch.end_time = Some(end_time);
    }

    pub fn set_accept_template(&mut self, team: Option<String>, template_id: Option<String>) {
        self.patch.accept_template_team = Some(team);
        self.patch.accept_template_id = Some(template_id);
    }

    /// Discard all pending edits, reverting to the original.
    pub fn reset(&mut self) {
        self.patch = BugBashPatch::default();
    }

    // === Dirty / valid ===

    /// True iff any tracked field's effective value differs from the
    /// original.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.title() != self.original.title
            || self.work_item_type() != self.original.work_item_type
            || self.item_description_field() != self.original.item_description_field
            || self.auto_accept() != self.original.auto_accept
            || self.description() != self.original.description.as_deref()
            || self.start_time() != self.original.start_time
            || self.end_time() != self.original.end_time
            || self.accept_template_team() != self.original.accept_template_team.as_deref()
            || self.accept_template_id() != self.original.accept_template_id.as_deref()
    }

    /// Validate the effective state, resolving entity references
    /// against the loaded reference data.
    ///
    /// # Errors
    ///
    /// Returns every violated rule as a `ValidationError`.
    pub fn validate(&self, reference: &impl ReferenceLookup) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.title().trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if self.title().len() > MAX_TITLE_LEN {
            errors.push(ValidationError::new(
                "title",
                format!("exceeds {MAX_TITLE_LEN} characters"),
            ));
        }

        if self.work_item_type().trim().is_empty() {
            errors.push(ValidationError::new("workItemType", "cannot be empty"));
        } else if !reference.work_item_type_exists(self.work_item_type()) {
            errors.push(ValidationError::new("workItemType", "unknown work item type"));
        }

        let field_ref = self.item_description_field();
        if field_ref.trim().is_empty() {
            errors.push(ValidationError::new("itemDescriptionField", "cannot be empty"));
        } else {
            match reference.field(field_ref) {
                None => errors.push(ValidationError::new("itemDescriptionField", "unknown field")),
                Some(def) if !def.kind.is_rich_text() => errors.push(ValidationError::new(
                    "itemDescriptionField",
                    "field is not rich-text capable",
                )),
                Some(_) => {}
            }
        }

        if !valid_window(self.start_time(), self.end_time()) {
            errors.push(ValidationError::new(
                "endTime",
                "end time must be after start time",
            ));
        }

        if let Some(template_id) = self.accept_template_id() {
            if !template_id.trim().is_empty() {
                match self.accept_template_team() {
                    Some(team) if reference.team_exists(team) => {}
                    _ => errors.push(ValidationError::new(
                        "acceptTemplateTeam",
                        "template requires a known team",
                    )),
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    #[must_use]
    pub fn is_valid(&self, reference: &impl ReferenceLookup) -> bool {
        self.validate(reference).is_ok()
    }
}
