//! Synchronous change notification.
//!
//! [`Derived`] holds a value recomputed from form state (the password strength)
//! and lets async code watch it. [`Listeners`] fans [`FormEvent`]s out to plain
//! callbacks. Both are driven from inside the mutating call, never scheduled.

use parking_lot::RwLock;
use regform_domain::{Field, FieldSet, StrengthLevel};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Something observable happened to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    FieldChanged { field: Field },
    StrengthChanged { level: StrengthLevel },
    VisibilityChanged { visible: bool },
    SubmissionStarted,
    /// The submit lifecycle completed and the form was reset.
    SubmissionFinished { succeeded: bool },
    /// A submit was attempted while these fields were invalid.
    SubmissionRejected { invalid: FieldSet },
}

/// A derived value with change notification.
#[derive(Debug)]
pub struct Derived<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + PartialEq> Derived<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self { tx: watch::Sender::new(initial) }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Stores `value`; returns `true` and wakes watchers only if it differs.
    pub fn update(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    #[must_use]
    pub fn watch(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&FormEvent) + Send + Sync>;

/// Registered event callbacks, called in subscription order.
#[derive(Default)]
pub struct Listeners {
    next_id: AtomicU64,
    entries: RwLock<Vec<(SubscriptionId, Listener)>>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("count", &self.len()).finish_non_exhaustive()
    }
}

impl Listeners {
    pub fn subscribe(&self, listener: impl Fn(&FormEvent) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.write().push((id, Arc::new(listener)));
        id
    }

    /// Returns whether `id` was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Calls every listener with each event.
    ///
    /// Listeners are snapshotted first, so a callback may subscribe or unsubscribe
    /// without deadlocking; such changes apply from the next emit.
    pub fn emit(&self, events: &[FormEvent]) {
        if events.is_empty() {
            return;
        }
        let snapshot: Vec<Listener> =
            self.entries.read().iter().map(|(_, listener)| Arc::clone(listener)).collect();
        for event in events {
            for listener in &snapshot {
                listener(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_derived_only_notifies_on_change() {
        let derived = Derived::new(StrengthLevel::Weak);
        let rx = derived.watch();

        assert!(!derived.update(StrengthLevel::Weak));
        assert!(!rx.has_changed().unwrap());

        assert!(derived.update(StrengthLevel::Good));
        assert!(rx.has_changed().unwrap());
        assert_eq!(derived.get(), StrengthLevel::Good);
    }

    #[test]
    fn test_listeners_receive_events_until_unsubscribed() {
        let listeners = Listeners::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = listeners.subscribe(move |event| sink.lock().push(event.clone()));

        listeners.emit(&[FormEvent::SubmissionStarted]);
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&[FormEvent::VisibilityChanged { visible: true }]);

        assert_eq!(*seen.lock(), vec![FormEvent::SubmissionStarted]);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let listeners = Arc::new(Listeners::default());
        let calls = Arc::new(AtomicU64::new(0));
        let slot = Arc::new(Mutex::new(None));

        let (registry, counter, own_id) = (Arc::clone(&listeners), Arc::clone(&calls), Arc::clone(&slot));
        let id = listeners.subscribe(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
            if let Some(id) = own_id.lock().take() {
                registry.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);

        listeners.emit(&[FormEvent::SubmissionStarted]);
        listeners.emit(&[FormEvent::SubmissionStarted]);

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(listeners.len(), 0);
    }
}
