use std::collections::HashMap;
use std::sync::RwLock;

use super::{MatchCallback, MatchStore, StoreError, StoreResult, SubscriberRegistry, Subscription};
use crate::models::Match;

/// Process-local store. An optional payload limit (bytes of JSON) models a
/// backend that rejects oversized documents.
#[derive(Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<String, Match>>,
    max_payload_bytes: RwLock<Option<usize>>,
    subscribers: SubscriberRegistry,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_payload(limit: usize) -> Self {
        Self { max_payload_bytes: RwLock::new(Some(limit)), ..Self::default() }
    }

    pub fn set_max_payload(&self, limit: Option<usize>) {
        if let Ok(mut current) = self.max_payload_bytes.write() {
            *current = limit;
        }
    }

    pub fn len(&self) -> usize {
        self.matches.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_payload(&self, state: &Match) -> StoreResult<()> {
        let limit = *self.max_payload_bytes.read().map_err(|_| StoreError::LockPoisoned)?;
        let Some(limit) = limit else {
            return Ok(());
        };
        let size = serde_json::to_vec(state)?.len();
        if size > limit {
            return Err(StoreError::PayloadTooLarge { size, limit });
        }
        Ok(())
    }
}

impl MatchStore for InMemoryMatchStore {
    fn get_match(&self, id: &str) -> StoreResult<Option<Match>> {
        let matches = self.matches.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(matches.get(id).cloned())
    }

    fn update_match(&self, state: &Match) -> StoreResult<()> {
        self.check_payload(state)?;
        {
            let mut matches = self.matches.write().map_err(|_| StoreError::LockPoisoned)?;
            matches.insert(state.id.clone(), state.clone());
        }
        log::debug!("match {} stored in memory", state.id);
        self.subscribers.notify(state);
        Ok(())
    }

    fn subscribe(&self, id: &str, callback: MatchCallback) -> Subscription {
        self.subscribers.subscribe(id, callback)
    }
}
