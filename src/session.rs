//! The per-session application context.
//!
//! One `Session` owns the document-store client and every store, and is
//! constructed once at startup — explicit single-instance-per-process
//! state passed by reference into action functions, instead of hidden
//! module-scoped singletons. Stores are mutated only through their
//! `apply` methods in response to action outcomes.

use crate::client::DocumentStore;
use crate::config::SessionConfig;
use crate::model::refdata::{FieldDef, Team, WorkItemTypeDef};
use crate::store::{
    BugBashItemStore, BugBashStore, CommentStore, ErrorMessageStore, LongTextStore, RefDataStore,
    SettingsStore,
};

pub struct Session {
    pub config: SessionConfig,
    pub client: Box<dyn DocumentStore>,
    pub bug_bashes: BugBashStore,
    pub items: BugBashItemStore,
    pub comments: CommentStore,
    pub long_texts: LongTextStore,
    pub settings: SettingsStore,
    pub errors: ErrorMessageStore,
    pub reference: RefDataStore,
}

impl Session {
    #[must_use]
    pub fn new(config: SessionConfig, client: Box<dyn DocumentStore>) -> Self {
        Self {
            config,
            client,
            bug_bashes: BugBashStore::new(),
            items: BugBashItemStore::new(),
            comments: CommentStore::new(),
            long_texts: LongTextStore::new(),
            settings: SettingsStore::new(),
            errors: ErrorMessageStore::new(),
            reference: RefDataStore::new(),
        }
    }

    /// Seed the host-provided reference data. Validity checks resolve
    /// against this; nothing validates until it has been loaded.
    pub fn load_reference_data(
        &mut self,
        teams: Vec<Team>,
        types: Vec<WorkItemTypeDef>,
        fields: Vec<FieldDef>,
    ) {
        self.reference.load(teams, types, fields);
    }
}
