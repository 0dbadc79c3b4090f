//! Persistence boundary.
//!
//! The engines never touch storage. A `MatchStore` loads and saves whole
//! snapshots keyed by match id and pushes every successful write to the
//! subscribers of that match. Writes are last-write-wins.

pub mod error;
pub mod file;
pub mod format;
pub mod memory;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::models::Match;

pub use error::StoreError;
pub use file::FileMatchStore;
pub use format::{MatchRecord, RECORD_VERSION};
pub use memory::InMemoryMatchStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Called with the stored snapshot after each successful write.
pub type MatchCallback = Arc<dyn Fn(&Match) + Send + Sync>;

pub trait MatchStore: Send + Sync {
    fn get_match(&self, id: &str) -> StoreResult<Option<Match>>;

    fn update_match(&self, state: &Match) -> StoreResult<()>;

    fn subscribe(&self, id: &str, callback: MatchCallback) -> Subscription;
}

#[derive(Default)]
struct Subscribers {
    next_token: u64,
    by_match: HashMap<String, Vec<(u64, MatchCallback)>>,
}

/// Per-match callback lists shared by the store implementations.
#[derive(Default)]
pub struct SubscriberRegistry {
    inner: Arc<Mutex<Subscribers>>,
}

fn lock(subscribers: &Mutex<Subscribers>) -> MutexGuard<'_, Subscribers> {
    // a panicking callback never runs under this lock, so the data stays consistent
    subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SubscriberRegistry {
    pub fn subscribe(&self, id: &str, callback: MatchCallback) -> Subscription {
        let mut subs = lock(&self.inner);
        subs.next_token += 1;
        let token = subs.next_token;
        subs.by_match.entry(id.to_string()).or_default().push((token, callback));

        Subscription {
            registry: Arc::downgrade(&self.inner),
            match_id: id.to_string(),
            token,
            active: true,
        }
    }

    /// Invoke every callback registered for `state.id`, outside the lock.
    pub fn notify(&self, state: &Match) {
        let callbacks: Vec<MatchCallback> = lock(&self.inner)
            .by_match
            .get(&state.id)
            .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default();

        for callback in callbacks {
            callback(state);
        }
    }

    pub fn subscriber_count(&self, id: &str) -> usize {
        lock(&self.inner).by_match.get(id).map_or(0, Vec::len)
    }
}

/// Handle returned by `MatchStore::subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Subscribers>>,
    match_id: String,
    token: u64,
    active: bool,
}

impl Subscription {
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut subs = lock(&inner);
        if let Some(list) = subs.by_match.get_mut(&self.match_id) {
            list.retain(|(token, _)| *token != self.token);
            if list.is_empty() {
                subs.by_match.remove(&self.match_id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("match_id", &self.match_id)
            .field("token", &self.token)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::singles;
    use crate::models::Settings;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, MatchCallback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        (hits, Arc::new(move |_: &Match| {
            seen.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn test_notify_reaches_only_matching_id() {
        let registry = SubscriberRegistry::default();
        let m = singles(Settings::default());
        let (hits, callback) = counter();
        let _sub = registry.subscribe(&m.id, callback);
        let (other_hits, other) = counter();
        let _other = registry.subscribe("someone-else", other);

        registry.notify(&m);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(other_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_and_drop_detach() {
        let registry = SubscriberRegistry::default();
        let m = singles(Settings::default());
        let (hits, callback) = counter();

        let first = registry.subscribe(&m.id, Arc::clone(&callback));
        let second = registry.subscribe(&m.id, callback);
        assert_eq!(registry.subscriber_count(&m.id), 2);

        first.unsubscribe();
        assert_eq!(registry.subscriber_count(&m.id), 1);
        drop(second);
        assert_eq!(registry.subscriber_count(&m.id), 0);

        registry.notify(&m);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let registry = SubscriberRegistry::default();
        let (_, callback) = counter();
        let sub = registry.subscribe("m1", callback);
        drop(registry);
        sub.unsubscribe();
    }
}
