//! Channel-keyed error message store.
//!
//! Each UI surface reads its own key, so the editor, details page,
//! settings panel, and item editor can all show an error at the same
//! time and dismiss independently.

use std::collections::HashMap;

use crate::hub::{Hub, Subscription};

/// Error channel identifiers, one per UI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    BugBash,
    BugBashItem,
    BugBashDetails,
    BugBashSettings,
    Comment,
}

pub struct ErrorMessageStore {
    messages: HashMap<ErrorKey, String>,
    changed: Hub<()>,
}

impl ErrorMessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
            changed: Hub::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.messages.get(&key).map(String::as_str)
    }

    #[must_use]
    pub fn has_any(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn set(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.messages.insert(key, message.into());
        self.changed.publish(&());
    }

    /// Clear one channel; other channels are untouched.
    pub fn dismiss(&mut self, key: ErrorKey) {
        if self.messages.remove(&key).is_some() {
            self.changed.publish(&());
        }
    }

    pub fn on_changed(&mut self, callback: impl FnMut(&()) + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.changed.unsubscribe(subscription);
    }
}

impl Default for ErrorMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_independent() {
        let mut store = ErrorMessageStore::new();
        store.set(ErrorKey::BugBash, "load failed");
        store.set(ErrorKey::BugBashItem, "save failed");

        store.dismiss(ErrorKey::BugBash);
        assert_eq!(store.get(ErrorKey::BugBash), None);
        assert_eq!(store.get(ErrorKey::BugBashItem), Some("save failed"));
    }

    #[test]
    fn dismissing_an_empty_channel_does_not_notify() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut store = ErrorMessageStore::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        store.on_changed(move |()| *c.borrow_mut() += 1);

        store.dismiss(ErrorKey::Comment);
        assert_eq!(*count.borrow(), 0);

        store.set(ErrorKey::Comment, "oops");
        store.dismiss(ErrorKey::Comment);
        assert_eq!(*count.borrow(), 2);
    }
}
