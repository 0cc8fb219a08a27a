//! Cache of bug bash items, scoped per parent bug bash.

use std::collections::{HashMap, HashSet};

use crate::events::BugBashItemEvent;
use crate::hub::{Hub, Subscription};
use crate::model::BugBashItemModel;

/// Authoritative in-memory cache of items.
///
/// The primary collection is a per-parent map of id → model, which is
/// also the O(1) point-lookup index. Loading flags are tracked per
/// parent bug bash so independent item lists can load simultaneously.
/// Triage partitions are not precomputed here; see [`crate::query`].
pub struct BugBashItemStore {
    items: HashMap<String, HashMap<String, BugBashItemModel>>,
    drafts: HashMap<String, BugBashItemModel>,
    loading: HashSet<String>,
    loaded: HashSet<String>,
    changed: Hub<()>,
}

impl BugBashItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            drafts: HashMap::new(),
            loading: HashSet::new(),
            loaded: HashSet::new(),
            changed: Hub::new(),
        }
    }

    // === Reads ===

    #[must_use]
    pub fn get(&self, bug_bash_id: &str, item_id: &str) -> Option<&BugBashItemModel> {
        self.items.get(bug_bash_id).and_then(|m| m.get(item_id))
    }

    /// All cached items of one bug bash, ordered by id.
    #[must_use]
    pub fn items_for(&self, bug_bash_id: &str) -> Vec<&BugBashItemModel> {
        let mut all: Vec<&BugBashItemModel> = self
            .items
            .get(bug_bash_id)
            .map(|m| m.values().collect())
            .unwrap_or_default();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// The per-parent "being composed" draft, created lazily.
    pub fn draft(&mut self, bug_bash_id: &str) -> &BugBashItemModel {
        self.drafts
            .entry(bug_bash_id.to_string())
            .or_insert_with(|| BugBashItemModel::blank(bug_bash_id))
    }

    #[must_use]
    pub fn is_loading(&self, bug_bash_id: &str) -> bool {
        self.loading.contains(bug_bash_id)
    }

    #[must_use]
    pub fn is_loaded(&self, bug_bash_id: &str) -> bool {
        self.loaded.contains(bug_bash_id)
    }

    // === Edits ===

    /// Run batched edits against a cached item, then notify once.
    /// Returns false (without notifying) when the item is unknown.
    pub fn with_item_mut(
        &mut self,
        bug_bash_id: &str,
        item_id: &str,
        edit: impl FnOnce(&mut BugBashItemModel),
    ) -> bool {
        if let Some(model) = self
            .items
            .get_mut(bug_bash_id)
            .and_then(|m| m.get_mut(item_id))
        {
            edit(model);
            self.changed.publish(&());
            true
        } else {
            false
        }
    }

    /// Run batched edits against a parent's draft, then notify once.
    pub fn with_draft_mut(&mut self, bug_bash_id: &str, edit: impl FnOnce(&mut BugBashItemModel)) {
        let draft = self
            .drafts
            .entry(bug_bash_id.to_string())
            .or_insert_with(|| BugBashItemModel::blank(bug_bash_id));
        edit(draft);
        self.changed.publish(&());
    }

    // === Loading flags (driven by actions) ===

    pub(crate) fn set_loading(&mut self, bug_bash_id: &str, loading: bool) {
        if loading {
            self.loading.insert(bug_bash_id.to_string());
        } else {
            self.loading.remove(bug_bash_id);
        }
    }

    // === Event application ===

    /// Mutate the cache for one event and emit a single changed
    /// notification. Never fails.
    pub fn apply(&mut self, event: &BugBashItemEvent) {
        match event {
            BugBashItemEvent::Loaded { bug_bash_id, items } => {
                self.items.insert(
                    bug_bash_id.clone(),
                    items
                        .iter()
                        .map(|r| (r.id.clone(), BugBashItemModel::from_record(r.clone())))
                        .collect(),
                );
                self.loading.remove(bug_bash_id);
                self.loaded.insert(bug_bash_id.clone());
            }
            BugBashItemEvent::Created(record) => {
                self.items
                    .entry(record.bug_bash_id.clone())
                    .or_default()
                    .insert(record.id.clone(), BugBashItemModel::from_record(record.clone()));
                self.drafts.insert(
                    record.bug_bash_id.clone(),
                    BugBashItemModel::blank(&record.bug_bash_id),
                );
            }
            BugBashItemEvent::Updated(record) | BugBashItemEvent::Accepted(record) => {
                self.items
                    .entry(record.bug_bash_id.clone())
                    .or_default()
                    .insert(record.id.clone(), BugBashItemModel::from_record(record.clone()));
            }
            BugBashItemEvent::Deleted {
                bug_bash_id,
                item_id,
            } => {
                if let Some(per_parent) = self.items.get_mut(bug_bash_id) {
                    per_parent.remove(item_id);
                }
            }
            BugBashItemEvent::Unchanged => {}
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

impl Default for BugBashItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::BugBashItemRecord;

    fn record(bash: &str, id: &str, title: &str) -> BugBashItemRecord {
        BugBashItemRecord {
            id: id.to_string(),
            bug_bash_id: bash.to_string(),
            title: title.to_string(),
            team_id: "team1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn parents_load_independently() {
        let mut store = BugBashItemStore::new();
        store.apply(&BugBashItemEvent::Loaded {
            bug_bash_id: "bashA".to_string(),
            items: vec![record("bashA", "bashA_1", "A item")],
        });

        assert!(store.is_loaded("bashA"));
        assert!(!store.is_loaded("bashB"));
        assert_eq!(store.items_for("bashA").len(), 1);
        assert!(store.items_for("bashB").is_empty());
    }

    #[test]
    fn point_lookup_is_parent_scoped() {
        let mut store = BugBashItemStore::new();
        store.apply(&BugBashItemEvent::Loaded {
            bug_bash_id: "bashA".to_string(),
            items: vec![record("bashA", "bashA_1", "A item")],
        });

        assert!(store.get("bashA", "bashA_1").is_some());
        assert!(store.get("bashB", "bashA_1").is_none());
    }

    #[test]
    fn created_resets_only_that_parents_draft() {
        let mut store = BugBashItemStore::new();
        store.with_draft_mut("bashA", |d| d.set_title("composing A"));
        store.with_draft_mut("bashB", |d| d.set_title("composing B"));

        store.apply(&BugBashItemEvent::Created(record("bashA", "bashA_1", "composing A")));

        assert!(!store.draft("bashA").is_dirty());
        assert!(store.draft("bashB").is_dirty());
        assert!(store.get("bashA", "bashA_1").is_some());
    }

    #[test]
    fn accepted_replaces_the_cached_model() {
        let mut store = BugBashItemStore::new();
        store.apply(&BugBashItemEvent::Loaded {
            bug_bash_id: "bashA".to_string(),
            items: vec![record("bashA", "bashA_1", "A item")],
        });

        let mut accepted = record("bashA", "bashA_1", "A item");
        accepted.work_item_id = 77;
        store.apply(&BugBashItemEvent::Accepted(accepted));

        let model = store.get("bashA", "bashA_1").unwrap();
        assert_eq!(model.original().work_item_id, 77);
    }

    #[test]
    fn deleted_removes_only_the_named_item() {
        let mut store = BugBashItemStore::new();
        store.apply(&BugBashItemEvent::Loaded {
            bug_bash_id: "bashA".to_string(),
            items: vec![
                record("bashA", "bashA_1", "one"),
                record("bashA", "bashA_2", "two"),
            ],
        });

        store.apply(&BugBashItemEvent::Deleted {
            bug_bash_id: "bashA".to_string(),
            item_id: "bashA_1".to_string(),
        });

        assert!(store.get("bashA", "bashA_1").is_none());
        assert!(store.get("bashA", "bashA_2").is_some());
    }
}
