//! Cache of long-text models, keyed by owning bug bash id.

use std::collections::{HashMap, HashSet};

use crate::events::LongTextEvent;
use crate::hub::{Hub, Subscription};
use crate::model::LongTextModel;

pub struct LongTextStore {
    texts: HashMap<String, LongTextModel>,
    loading: HashSet<String>,
    loaded: HashSet<String>,
    changed: Hub<()>,
}

impl LongTextStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            texts: HashMap::new(),
            loading: HashSet::new(),
            loaded: HashSet::new(),
            changed: Hub::new(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LongTextModel> {
        self.texts.get(id)
    }

    #[must_use]
    pub fn is_loading(&self, id: &str) -> bool {
        self.loading.contains(id)
    }

    #[must_use]
    pub fn is_loaded(&self, id: &str) -> bool {
        self.loaded.contains(id)
    }

    /// Run batched edits against a cached model, then notify once.
    /// Returns false (without notifying) when the id is unknown.
    pub fn with_model_mut(&mut self, id: &str, edit: impl FnOnce(&mut LongTextModel)) -> bool {
        if let Some(model) = self.texts.get_mut(id) {
            edit(model);
            self.changed.publish(&());
            true
        } else {
            false
        }
    }

    pub(crate) fn set_loading(&mut self, id: &str, loading: bool) {
        if loading {
            self.loading.insert(id.to_string());
        } else {
            self.loading.remove(id);
        }
    }

    /// Seed a local draft for a document that does not exist remotely.
    pub(crate) fn seed_draft(&mut self, id: &str) {
        self.texts
            .entry(id.to_string())
            .or_insert_with(|| LongTextModel::draft(id));
        self.loading.remove(id);
        self.loaded.insert(id.to_string());
        self.changed.publish(&());
    }

    /// Mutate the cache for one event and emit a single changed
    /// notification. Never fails.
    pub fn apply(&mut self, event: &LongTextEvent) {
        match event {
            LongTextEvent::Fetched(record) | LongTextEvent::Saved(record) => {
                self.loading.remove(&record.id);
                self.loaded.insert(record.id.clone());
                self.texts
                    .insert(record.id.clone(), LongTextModel::from_record(record.clone()));
            }
            LongTextEvent::Unchanged => {}
        }
        self.changed.publish(&());
    }

    pub fn on_changed(&mut self, callback: impl FnMut(&()) + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.changed.unsubscribe(subscription);
    }
}

impl Default for LongTextStore {
    fn default() -> Self {
        Self::new()
    }
}
