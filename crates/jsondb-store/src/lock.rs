//! Per-collection write locks.
//!
//! [`LockRegistry`] hands out one `Arc<Mutex<()>>` per collection name. The
//! registry map is guarded by its own mutex, held only for the lookup/insert;
//! callers lock the returned collection mutex outside of it, so file I/O in
//! one collection never stalls registry access for another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Registry mapping collection names to their exclusive lock.
///
/// Entries are created on first use and never removed.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lock for `collection`, creating it on first use.
    ///
    /// Two callers asking for the same name always receive the same mutex.
    pub fn get_or_create(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(collection) {
            return Arc::clone(lock);
        }
        let lock = Arc::new(Mutex::new(()));
        locks.insert(collection.to_string(), Arc::clone(&lock));
        lock
    }

    /// Number of collections that have a registered lock.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no lock has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Acquire a collection mutex.
///
/// The mutex guards `()`, so a holder that panicked leaves no state behind
/// and poisoning is ignored.
pub(crate) fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn same_name_returns_same_lock() {
        let registry = LockRegistry::new();
        let a = registry.get_or_create("users");
        let b = registry.get_or_create("users");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_names_get_distinct_locks() {
        let registry = LockRegistry::new();
        assert!(registry.is_empty());
        let a = registry.get_or_create("users");
        let b = registry.get_or_create("orders");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn concurrent_creation_yields_single_lock() {
        let registry = Arc::new(LockRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_or_create("shared"))
            })
            .collect();

        let locks: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        for lock in &locks[1..] {
            assert!(Arc::ptr_eq(&locks[0], lock));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn held_lock_blocks_same_collection_only() {
        let registry = Arc::new(LockRegistry::new());
        let users = registry.get_or_create("users");
        let guard = acquire(&users);

        let (tx, rx) = mpsc::channel();
        for name in ["users", "orders"] {
            let registry = Arc::clone(&registry);
            let tx = tx.clone();
            thread::spawn(move || {
                let lock = registry.get_or_create(name);
                let _held = acquire(&lock);
                tx.send(name).unwrap();
            });
        }

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "orders");
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        drop(guard);
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "users");
    }

    #[test]
    fn poisoned_lock_is_still_usable() {
        let registry = Arc::new(LockRegistry::new());
        let lock = registry.get_or_create("users");
        let poisoner = Arc::clone(&lock);
        let _ = thread::spawn(move || {
            let _held = poisoner.lock().unwrap();
            panic!("writer crashed");
        })
        .join();

        assert!(lock.is_poisoned());
        let _held = acquire(&lock);
    }
}
