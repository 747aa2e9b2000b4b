//! Explicit observer registration for change notification.
//!
//! Replaces a process-wide event bus: the owner of a [`Notifier`] hands out
//! [`Subscription`] tokens, and observers unregister with them on teardown.
//! Delivery is synchronous and in-process; order across observers is
//! unspecified.

use std::fmt;

type Callback<E> = Box<dyn FnMut(&E)>;

/// A token identifying one registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// A registry of observers for one event type.
pub struct Notifier<E> {
    next_token: u64,
    observers: Vec<(u64, Callback<E>)>,
}

impl<E> Notifier<E> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_token: 0,
            observers: Vec::new(),
        }
    }

    /// Registers an observer and returns its subscription token.
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&E) + 'static,
    {
        let token = self.next_token;
        self.next_token += 1;
        self.observers.push((token, Box::new(callback)));
        Subscription(token)
    }

    /// Removes an observer. Returns false when the token was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(token, _)| *token != subscription.0);
        self.observers.len() != before
    }

    /// Calls every observer with the event, synchronously.
    pub fn emit(&mut self, event: &E) {
        for (_, callback) in &mut self.observers {
            callback(event);
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn subscribers_all_receive_events() {
        let mut notifier: Notifier<u32> = Notifier::new();
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen_a);
        notifier.subscribe(move |event| a.borrow_mut().push(*event));
        let b = Rc::clone(&seen_b);
        notifier.subscribe(move |event| b.borrow_mut().push(*event));

        notifier.emit(&1);
        notifier.emit(&2);

        assert_eq!(*seen_a.borrow(), vec![1, 2]);
        assert_eq!(*seen_b.borrow(), vec![1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut notifier: Notifier<u32> = Notifier::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::clone(&seen);
        let subscription = notifier.subscribe(move |event| inner.borrow_mut().push(*event));

        notifier.emit(&1);
        assert!(notifier.unsubscribe(subscription));
        notifier.emit(&2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert!(notifier.is_empty());
    }

    #[test]
    fn unsubscribe_twice_reports_missing() {
        let mut notifier: Notifier<u32> = Notifier::new();
        let subscription = notifier.subscribe(|_| {});
        assert!(notifier.unsubscribe(subscription));
        assert!(!notifier.unsubscribe(subscription));
    }

    #[test]
    fn tokens_stay_unique_after_removal() {
        let mut notifier: Notifier<u32> = Notifier::new();
        let first = notifier.subscribe(|_| {});
        notifier.unsubscribe(first);
        let second = notifier.subscribe(|_| {});
        assert_ne!(first, second);
    }
}
