//! Observable shared state.
//!
//! A [`Store`] owns a value and a list of subscribers. Every `set` or
//! `update` notifies all subscribers synchronously, in no particular order,
//! after the value lock has been released.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<(u64, Subscriber<T>)>>,
    next_id: AtomicU64,
}

pub struct Store<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: Mutex::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared.value.lock().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.lock())
    }

    pub fn set(&self, value: T) {
        *self.shared.value.lock() = value;
        self.notify();
    }

    /// Runs `f` on the value in place, then notifies subscribers.
    ///
    /// The lock is held while `f` runs and is not reentrant: calling `get`,
    /// `with`, `set` or `update` on the same store from inside `f` deadlocks.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.shared.value.lock());
        self.notify();
        result
    }

    /// Registers `f` and calls it immediately with the current value.
    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let subscriber: Subscriber<T> = Arc::new(f);
        self.shared
            .subscribers
            .lock()
            .push((id, Arc::clone(&subscriber)));

        subscriber(&self.get());

        let shared = Arc::downgrade(&self.shared);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.subscribers.lock().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }

    fn notify(&self) {
        let snapshot = self.get();
        let subscribers: Vec<Subscriber<T>> = self
            .shared
            .subscribers
            .lock()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}

/// Handle returned by [`Store::subscribe`]. Dropping it keeps the
/// subscriber attached; call [`Subscription::unsubscribe`] to detach.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_sees_current_value() {
        let store = Store::new(3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |v| sink.lock().push(*v));
        assert_eq!(*seen.lock(), vec![3]);
    }

    #[test]
    fn test_set_and_update_notify() {
        let store = Store::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |v| sink.lock().push(*v));

        store.set(5);
        let doubled = store.update(|v| {
            *v *= 2;
            *v
        });

        assert_eq!(doubled, 10);
        assert_eq!(store.get(), 10);
        assert_eq!(*seen.lock(), vec![0, 5, 10]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = Store::new(String::from("a"));
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(store.subscriber_count(), 1);

        sub.unsubscribe();
        store.set(String::from("b"));

        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_subscriber_may_read_store() {
        let store = Store::new(1);
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |_| sink.lock().push(reader.get()));
        store.set(2);
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_update_releases_lock_before_notifying() {
        let store = Store::new(vec![1]);
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |_| sink.lock().push(reader.with(Vec::len)));

        let len = store.update(|v| {
            v.push(2);
            v.len()
        });

        assert_eq!(len, 2);
        assert_eq!(*seen.lock(), vec![1, 2]);
        assert_eq!(store.get(), vec![1, 2]);
    }
}
