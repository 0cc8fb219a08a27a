//! Typed publish/subscribe channels.
//!
//! A `Hub` is a plain subscriber list with explicit handles; publishing
//! walks the list synchronously in registration order. Stores embed one
//! to emit their single "changed" notification per applied event.

/// Handle returned by [`Hub::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// A typed event channel.
pub struct Hub<E> {
    subscribers: Vec<(Subscription, Box<dyn FnMut(&E)>)>,
    next_id: u64,
}

impl<E> Hub<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback; it fires on every publish until
    /// unsubscribed.
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(id, _)| *id != subscription);
    }

    /// Deliver `event` to every subscriber, synchronously.
    pub fn publish(&mut self, event: &E) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E> Default for Hub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Hub<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn publish_reaches_all_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub: Hub<u32> = Hub::new();

        let a = Rc::clone(&seen);
        hub.subscribe(move |n| a.borrow_mut().push(("a", *n)));
        let b = Rc::clone(&seen);
        hub.subscribe(move |n| b.borrow_mut().push(("b", *n)));

        hub.publish(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut hub: Hub<()> = Hub::new();

        let c = Rc::clone(&count);
        let handle = hub.subscribe(move |()| *c.borrow_mut() += 1);

        hub.publish(&());
        hub.unsubscribe(handle);
        hub.publish(&());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribing_one_leaves_others() {
        let mut hub: Hub<()> = Hub::new();
        let first = hub.subscribe(|()| {});
        let _second = hub.subscribe(|()| {});

        hub.unsubscribe(first);
        assert_eq!(hub.subscriber_count(), 1);
    }
}
