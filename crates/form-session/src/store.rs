//! Reactive cells.
//!
//! A [`Store`] holds one value and notifies subscribers on every write.
//! It wraps a `tokio::sync::watch` sender, so readers never block writers
//! and a subscriber only ever sees the latest value.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Store").field(&*self.tx.borrow()).finish()
    }
}

impl<T: Clone> Store<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// A copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read the current value in place.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.tx.borrow())
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify the value in place and notify subscribers.
    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.tx.send_modify(modify);
    }

    /// Modify a copy of the value and publish it only if `modify` succeeds.
    /// On error the store is left untouched and nobody is notified.
    ///
    /// # Errors
    ///
    /// Returns whatever `modify` returns.
    pub fn try_update<E>(&self, modify: impl FnOnce(&mut T) -> Result<(), E>) -> Result<(), E> {
        let mut next = self.get();
        modify(&mut next)?;
        self.set(next);
        Ok(())
    }

    /// Subscribe to changes. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_update() {
        let store = Store::new(1);
        assert_eq!(store.get(), 1);
        store.set(2);
        store.update(|v| *v += 40);
        assert_eq!(store.get(), 42);
        assert_eq!(store.with(|v| v * 2), 84);
    }

    #[test]
    fn failed_try_update_leaves_value() {
        let store = Store::new(vec![1, 2]);
        let result: Result<(), &str> = store.try_update(|v| {
            v.push(3);
            Err("nope")
        });
        assert!(result.is_err());
        assert_eq!(store.get(), vec![1, 2]);
    }

    #[tokio::test]
    async fn subscribers_see_latest_value() {
        let store = Store::new(String::from("a"));
        let mut rx = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);

        store.set("b".into());
        store.set("c".into());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "c");

        drop(rx);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_the_cell() {
        let store = Store::new(0);
        let other = store.clone();
        other.set(7);
        assert_eq!(store.get(), 7);
    }
}
