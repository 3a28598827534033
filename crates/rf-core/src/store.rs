//! Blacklist holder shared between the request path and the reloader
//!
//! Readers take a snapshot (`Arc<Blacklist>`) and match against it without
//! holding any lock. A reload builds a complete new blacklist and swaps the
//! pointer, so a snapshot is always entirely old or entirely new.

use std::sync::{Arc, PoisonError, RwLock};

use crate::blacklist::Blacklist;

/// Atomically swapped blacklist.
#[derive(Debug, Default)]
pub struct BlacklistStore {
    current: RwLock<Arc<Blacklist>>,
}

impl BlacklistStore {
    /// Create a store holding `initial`.
    pub fn new(initial: Blacklist) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Current blacklist snapshot.
    pub fn get(&self) -> Arc<Blacklist> {
        // The guarded value is a pointer swap, so a poisoned lock still holds a
        // complete blacklist.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the blacklist wholesale. Returns the previous one.
    pub fn replace(&self, blacklist: Blacklist) -> Arc<Blacklist> {
        let next = Arc::new(blacklist);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        log::debug!("Replacing blacklist: {} -> {} keys", guard.len(), next.len());
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    #[test]
    fn test_default_store_is_empty() {
        assert!(BlacklistStore::default().get().is_empty());
    }

    #[test]
    fn test_replace_is_visible_to_later_reads() {
        let store = BlacklistStore::new(Blacklist::from_domains(["old.com"]));
        let before = store.get();

        let previous = store.replace(Blacklist::from_domains(["new.com", ".new.net"]));
        assert!(previous.contains_key("old.com"));

        let after = store.get();
        assert!(after.contains_key("new.com"));
        assert!(!after.contains_key("old.com"));
        // Snapshots taken before the swap are unaffected.
        assert!(before.contains_key("old.com"));
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_concurrent_reads_never_see_mixed_sets() {
        let old: Vec<String> = (0..200).map(|i| format!("old{i}.example.com")).collect();
        let new: Vec<String> = (0..300).map(|i| format!("new{i}.example.net")).collect();

        let store = Arc::new(BlacklistStore::new(Blacklist::from_domains(old.clone())));
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let snapshot = store.get();
                        let old_keys = snapshot.keys().filter(|k| k.starts_with("old")).count();
                        let new_keys = snapshot.keys().filter(|k| k.starts_with("new")).count();
                        assert!(
                            (old_keys == 200 && new_keys == 0) || (old_keys == 0 && new_keys == 300),
                            "mixed snapshot: {old_keys} old, {new_keys} new"
                        );
                    }
                })
            })
            .collect();

        for round in 0..200 {
            let keys = if round % 2 == 0 { &new } else { &old };
            store.replace(Blacklist::from_domains(keys.iter().cloned()));
        }
        done.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
