//! Cache of item comments, scoped per item. Append-only.

use std::collections::{HashMap, HashSet};

use crate::events::CommentEvent;
use crate::hub::{Hub, Subscription};
use crate::model::records::CommentRecord;

/// Authoritative in-memory cache of comments.
///
/// Comments are immutable once created, so the cache holds plain
/// records rather than editable models.
pub struct CommentStore {
    comments: HashMap<String, Vec<CommentRecord>>,
    loading: HashSet<String>,
    loaded: HashSet<String>,
    changed: Hub<()>,
}

impl CommentStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            comments: HashMap::new(),
            loading: HashSet::new(),
            loaded: HashSet::new(),
            changed: Hub::new(),
        }
    }

    /// Comments of one item in creation order.
    #[must_use]
    pub fn comments_for(&self, item_id: &str) -> &[CommentRecord] {
        self.comments.get(item_id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_loading(&self, item_id: &str) -> bool {
        self.loading.contains(item_id)
    }

    #[must_use]
    pub fn is_loaded(&self, item_id: &str) -> bool {
        self.loaded.contains(item_id)
    }

    pub(crate) fn set_loading(&mut self, item_id: &str, loading: bool) {
        if loading {
            self.loading.insert(item_id.to_string());
        } else {
            self.loading.remove(item_id);
        }
    }

    /// Mutate the cache for one event and emit a single changed
    /// notification. Never fails.
    pub fn apply(&mut self, event: &CommentEvent) {
        match event {
            CommentEvent::Loaded { item_id, comments } => {
                let mut ordered = comments.clone();
                ordered.sort_by_key(|c| c.created_date);
                self.comments.insert(item_id.clone(), ordered);
                self.loading.remove(item_id);
                self.loaded.insert(item_id.clone());
            }
            CommentEvent::Created { item_id, comment } => {
                self.comments
                    .entry(item_id.clone())
                    .or_default()
                    .push(comment.clone());
            }
            CommentEvent::Unchanged => {}
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

impl Default for CommentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn comment(id: &str, minute: u32) -> CommentRecord {
        CommentRecord {
            id: id.to_string(),
            created_by: "Ada <ada@example.com>".to_string(),
            created_date: Some(Utc.with_ymd_and_hms(2026, 7, 1, 10, minute, 0).unwrap()),
            content: format!("comment {id}"),
            ..Default::default()
        }
    }

    #[test]
    fn loaded_comments_are_ordered_by_creation() {
        let mut store = CommentStore::new();
        store.apply(&CommentEvent::Loaded {
            item_id: "item1".to_string(),
            comments: vec![comment("c2", 30), comment("c1", 10)],
        });

        let ids: Vec<&str> = store
            .comments_for("item1")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn created_appends_and_never_replaces() {
        let mut store = CommentStore::new();
        store.apply(&CommentEvent::Loaded {
            item_id: "item1".to_string(),
            comments: vec![comment("c1", 10)],
        });
        store.apply(&CommentEvent::Created {
            item_id: "item1".to_string(),
            comment: comment("c2", 30),
        });

        assert_eq!(store.comments_for("item1").len(), 2);
        assert_eq!(store.comments_for("item1")[0].id, "c1");
    }

    #[test]
    fn load_state_is_per_item() {
        let mut store = CommentStore::new();
        store.apply(&CommentEvent::Loaded {
            item_id: "item1".to_string(),
            comments: Vec::new(),
        });

        assert!(store.is_loaded("item1"));
        assert!(!store.is_loaded("item2"));
    }
}
