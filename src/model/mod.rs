//! Data types: persisted records, editable view-models, reference data.

pub mod bug_bash;
pub mod item;
pub mod long_text;
pub mod records;
pub mod refdata;

pub use bug_bash::BugBashModel;
pub use item::{BugBashItemModel, TriageKind, TriageState};
pub use long_text::LongTextModel;
pub use records::{
    BugBashItemRecord, BugBashRecord, CommentRecord, LongTextRecord, MAX_REJECT_REASON_LEN,
    MAX_TITLE_LEN, ProjectSettings, UserSettings,
};
pub use refdata::{FieldDef, FieldKind, ReferenceLookup, Team, WorkItemTypeDef};
