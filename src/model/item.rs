//! Editable bug bash item view-model and triage state derivation.

use crate::error::ValidationError;
use crate::model::records::{BugBashItemRecord, MAX_REJECT_REASON_LEN, MAX_TITLE_LEN};
use crate::model::refdata::ReferenceLookup;

/// Explicit triage state, derived from the stored flag combination.
///
/// The persisted format keeps `work_item_id` and the rejection flags as
/// independent fields for compatibility; this union is recomputed on
/// read and never stored. A linked work item wins over the rejected
/// flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageState {
    Pending,
    Rejected { reason: String, by: String },
    Accepted { work_item_id: u32 },
}

/// Discriminant-only triage state, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageKind {
    Pending,
    Rejected,
    Accepted,
}

impl TriageState {
    /// Derive the triage state from a record's flags.
    #[must_use]
    pub fn of(record: &BugBashItemRecord) -> Self {
        if record.work_item_id > 0 {
            Self::Accepted {
                work_item_id: record.work_item_id,
            }
        } else if record.rejected {
            Self::Rejected {
                reason: record.reject_reason.clone().unwrap_or_default(),
                by: record.rejected_by.clone().unwrap_or_default(),
            }
        } else {
            Self::Pending
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TriageKind {
        match self {
            Self::Pending => TriageKind::Pending,
            Self::Rejected { .. } => TriageKind::Rejected,
            Self::Accepted { .. } => TriageKind::Accepted,
        }
    }
}

/// Pending edits for an item. Acceptance (`work_item_id`) is not
/// editable here; it is persisted by the accept action.
#[derive(Debug, Clone, Default)]
struct ItemPatch {
    title: Option<String>,
    team_id: Option<String>,
    description: Option<Option<String>>,
    rejected: Option<bool>,
    reject_reason: Option<Option<String>>,
}

/// One bug bash item with its original state and pending edits.
#[derive(Debug, Clone)]
pub struct BugBashItemModel {
    original: BugBashItemRecord,
    patch: ItemPatch,
}

impl BugBashItemModel {
    #[must_use]
    pub fn from_record(record: BugBashItemRecord) -> Self {
        Self {
            original: record,
            patch: ItemPatch::default(),
        }
    }

    /// A blank unsaved item under the given bug bash.
    #[must_use]
    pub fn blank(bug_bash_id: impl Into<String>) -> Self {
        Self::from_record(BugBashItemRecord {
            bug_bash_id: bug_bash_id.into(),
            ..Default::default()
        })
    }

    #[must_use]
    pub fn original(&self) -> &BugBashItemRecord {
        &self.original
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.original.id
    }

    #[must_use]
    pub fn bug_bash_id(&self) -> &str {
        &self.original.bug_bash_id
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
    pub fn team_id(&self) -> &str {
        self.patch
            .team_id
            .as_deref()
            .unwrap_or(&self.original.team_id)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match &self.patch.description {
            Some(edited) => edited.as_deref(),
            None => self.original.description.as_deref(),
        }
    }

    #[must_use]
    pub fn rejected(&self) -> bool {
        self.patch.rejected.unwrap_or(self.original.rejected)
    }

    #[must_use]
    pub fn reject_reason(&self) -> Option<&str> {
        match &self.patch.reject_reason {
            Some(edited) => edited.as_deref(),
            None => self.original.reject_reason.as_deref(),
        }
    }

    /// Triage state of the effective record.
    #[must_use]
    pub fn triage_state(&self) -> TriageState {
        TriageState::of(&self.effective())
    }

    /// The record a save would persist. Identity, parentage, creation
    /// stamp, and acceptance state always come from the original.
    #[must_use]
    pub fn effective(&self) -> BugBashItemRecord {
        BugBashItemRecord {
            id: self.original.id.clone(),
            etag: self.original.etag,
            bug_bash_id: self.original.bug_bash_id.clone(),
            work_item_id: self.original.work_item_id,
            created_date: self.original.created_date,
            created_by: self.original.created_by.clone(),
            rejected_by: self.original.rejected_by.clone(),
            title: self.title().to_string(),
            team_id: self.team_id().to_string(),
            description: self.description().map(str::to_string),
            rejected: self.rejected(),
            reject_reason: self.reject_reason().map(str::to_string),
        }
    }

    // === Edits ===

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.patch.title = Some(title.into());
    }

    pub fn set_team_id(&mut self, team_id: impl Into<String>) {
        self.patch.team_id = Some(team_id.into());
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.patch.description = Some(description);
    }

    /// Mark or unmark rejection. Unmarking also drops any pending
    /// reason edit.
    pub fn set_rejected(&mut self, rejected: bool) {
        self.patch.rejected = Some(rejected);
        if !rejected {
            self.patch.reject_reason = Some(None);
        }
    }

    pub fn set_reject_reason(&mut self, reason: impl Into<String>) {
        self.patch.reject_reason = Some(Some(reason.into()));
    }

    pub fn reset(&mut self) {
        self.patch = ItemPatch::default();
    }

    // === Dirty / valid ===

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.title() != self.original.title
            || self.team_id() != self.original.team_id
            || self.description() != self.original.description.as_deref()
            || self.rejected() != self.original.rejected
            || self.reject_reason() != self.original.reject_reason.as_deref()
    }

    /// Validate the effective state.
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

        if self.team_id().trim().is_empty() {
            errors.push(ValidationError::new("teamId", "cannot be empty"));
        } else if !reference.team_exists(self.team_id()) {
            errors.push(ValidationError::new("teamId", "unknown team"));
        }

        if self.rejected() {
            match self.reject_reason() {
                None => errors.push(ValidationError::new("rejectReason", "cannot be empty")),
                Some(reason) if reason.trim().is_empty() => {
                    errors.push(ValidationError::new("rejectReason", "cannot be empty"));
                }
                Some(reason) if reason.len() > MAX_REJECT_REASON_LEN => {
                    errors.push(ValidationError::new(
                        "rejectReason",
                        format!("exceeds {MAX_REJECT_REASON_LEN} characters"),
                    ));
                }
                Some(_) => {}
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    #[must_use]
    pub fn is_valid(&self, reference: &impl ReferenceLookup) -> bool {
        self.validate(reference).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::refdata::FieldDef;

    struct KnownTeams(Vec<String>);

    impl ReferenceLookup for KnownTeams {
        fn team_exists(&self, team_id: &str) -> bool {
            self.0.iter().any(|t| t == team_id)
        }

        fn work_item_type_exists(&self, _name: &str) -> bool {
            true
        }

        fn field(&self, _reference_name: &str) -> Option<&FieldDef> {
            None
        }
    }

    fn reference() -> KnownTeams {
        KnownTeams(vec!["team1".to_string()])
    }

    fn saved_item() -> BugBashItemModel {
        BugBashItemModel::from_record(BugBashItemRecord {
            id: "bash1_1700000000000".to_string(),
            etag: 1,
            bug_bash_id: "bash1".to_string(),
            title: "Dropdown renders blank".to_string(),
            team_id: "team1".to_string(),
            created_by: "Ada Lovelace <ada@example.com>".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn rejection_requires_a_bounded_reason() {
        let mut item = saved_item();
        item.set_rejected(true);
        assert!(!item.is_valid(&reference()));

        item.set_reject_reason("duplicate of bash1_42");
        assert!(item.is_valid(&reference()));

        item.set_reject_reason("x".repeat(MAX_REJECT_REASON_LEN + 1));
        assert!(!item.is_valid(&reference()));
    }

    #[test]
    fn reason_is_irrelevant_when_not_rejected() {
        let mut item = saved_item();
        item.set_reject_reason("x".repeat(MAX_REJECT_REASON_LEN + 1));
        assert!(item.is_valid(&reference()));
    }

    #[test]
    fn unrejecting_clears_the_pending_reason() {
        let mut item = saved_item();
        item.set_rejected(true);
        item.set_reject_reason("not reproducible");
        item.set_rejected(false);

        assert_eq!(item.reject_reason(), None);
        assert!(item.is_valid(&reference()));
    }

    #[test]
    fn unknown_team_never_validates() {
        let mut item = saved_item();
        item.set_team_id("ghost-team");
        assert!(!item.is_valid(&reference()));
        assert!(!item.is_valid(&KnownTeams(Vec::new())));
    }

    #[test]
    fn triage_derivation_accepted_wins() {
        let mut record = BugBashItemRecord {
            work_item_id: 42,
            rejected: true,
            reject_reason: Some("stale".to_string()),
            ..Default::default()
        };
        assert_eq!(
            TriageState::of(&record),
            TriageState::Accepted { work_item_id: 42 }
        );

        record.work_item_id = 0;
        assert_eq!(
            TriageState::of(&record),
            TriageState::Rejected {
                reason: "stale".to_string(),
                by: String::new()
            }
        );

        record.rejected = false;
        assert_eq!(TriageState::of(&record), TriageState::Pending);
    }

    #[test]
    fn pending_rejection_changes_effective_triage() {
        let mut item = saved_item();
        assert_eq!(item.triage_state().kind(), TriageKind::Pending);

        item.set_rejected(true);
        item.set_reject_reason("works as designed");
        assert_eq!(item.triage_state().kind(), TriageKind::Rejected);
        assert!(!item.original().rejected);
    }

    #[test]
    fn conflict_keeps_local_edits() {
        // A failed save leaves the patch untouched; only a successful
        // save replaces the model wholesale.
        let mut item = saved_item();
        item.set_title("Edited locally");
        assert!(item.is_dirty());
        assert_eq!(item.original().title, "Dropdown renders blank");
        assert_eq!(item.title(), "Edited locally");
    }
}
