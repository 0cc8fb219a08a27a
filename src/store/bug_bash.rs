//! Cache of bug bash models, keyed by id.

use std::collections::{HashMap, HashSet};

use crate::events::BugBashEvent;
use crate::hub::{Hub, Subscription};
use crate::model::BugBashModel;

/// Authoritative in-memory cache of bug bashes.
///
/// Also owns the distinguished "being composed" draft so the unsaved
/// bug bash flows through the same update machinery as persisted ones;
/// a successful create resets the draft and the cache gains the
/// server-returned model.
pub struct BugBashStore {
    bashes: HashMap<String, BugBashModel>,
    draft: BugBashModel,
    loading_all: bool,
    loaded_all: bool,
    loading_ids: HashSet<String>,
    changed: Hub<()>,
}

impl BugBashStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bashes: HashMap::new(),
            draft: BugBashModel::blank(),
            loading_all: false,
            loaded_all: false,
            loading_ids: HashSet::new(),
            changed: Hub::new(),
        }
    }

    // === Reads ===

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BugBashModel> {
        self.bashes.get(id)
    }

    /// All cached bug bashes, ordered by id for stable iteration.
    #[must_use]
    pub fn all(&self) -> Vec<&BugBashModel> {
        let mut all: Vec<&BugBashModel> = self.bashes.values().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    #[must_use]
    pub fn draft(&self) -> &BugBashModel {
        &self.draft
    }

    #[must_use]
    pub fn is_loading_all(&self) -> bool {
        self.loading_all
    }

    #[must_use]
    pub fn is_loaded_all(&self) -> bool {
        self.loaded_all
    }

    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        self.loading_ids.contains(id)
    }

    // === Edits ===

    /// Run batched edits against a cached model, then notify once.
    /// Returns false (without notifying) when the id is unknown.
    pub fn with_model_mut(&mut self, id: &str, edit: impl FnOnce(&mut BugBashModel)) -> bool {
        if let Some(model) = self.bashes.get_mut(id) {
            edit(model);
            self.changed.publish(&());
            true
        } else {
            false
        }
    }

    /// Run batched edits against the draft, then notify once.
    pub fn with_draft_mut(&mut self, edit: impl FnOnce(&mut BugBashModel)) {
        edit(&mut self.draft);
        self.changed.publish(&());
    }

    // === Loading flags (driven by actions) ===

    pub(crate) fn set_loading_all(&mut self, loading: bool) {
        self.loading_all = loading;
    }

    pub(crate) fn set_loading(&mut self, id: &str, loading: bool) {
        if loading {
            self.loading_ids.insert(id.to_string());
        } else {
            self.loading_ids.remove(id);
        }
    }

    // === Event application ===

    /// Mutate the cache for one event and emit a single changed
    /// notification. Never fails.
    pub fn apply(&mut self, event: &BugBashEvent) {
        match event {
            BugBashEvent::Loaded(records) => {
                self.bashes = records
                    .iter()
                    .map(|r| (r.id.clone(), BugBashModel::from_record(r.clone())))
                    .collect();
                self.loading_all = false;
                self.loaded_all = true;
            }
            BugBashEvent::Fetched(record) | BugBashEvent::Updated(record) => {
                self.loading_ids.remove(&record.id);
                self.bashes
                    .insert(record.id.clone(), BugBashModel::from_record(record.clone()));
            }
            BugBashEvent::Created(record) => {
                self.bashes
                    .insert(record.id.clone(), BugBashModel::from_record(record.clone()));
                self.draft = BugBashModel::blank();
            }
            BugBashEvent::Deleted(id) => {
                self.bashes.remove(id);
            }
            BugBashEvent::Unchanged => {}
        }
        self.changed.publish(&());
    }

    // === Change notification ===

    pub fn on_changed(&mut self, callback: impl FnMut(&()) + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.changed.unsubscribe(subscription);
    }
}

impl Default for BugBashStore {
    fn default() -> Self {
        Self::new()
    }
}
