//! Scorekeeping session on top of a `MatchStore`.
//!
//! Each mutating call loads the stored snapshot, runs one engine operation and
//! writes the result back. A call on a match that is already being processed
//! fails with `Busy` instead of queueing. Undo restores whole snapshots.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::analysis::{get_important_point, ImportantPoint};
use crate::engine;
use crate::error::ScoreError;
use crate::models::{new_match, Match, MatchSetup, TeamId};
use crate::store::{MatchCallback, MatchStore, StoreError, Subscription};

pub const DEFAULT_UNDO_DEPTH: usize = 50;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Match {id} is already processing an update")]
    Busy { id: String },

    #[error("Point for match {id} ignored: arrived inside the debounce window")]
    Debounced { id: String },

    #[error("Match not found: {id}")]
    NotFound { id: String },

    #[error("Match {id} is completed")]
    MatchCompleted { id: String },

    #[error("Nothing to undo for match {id}")]
    NothingToUndo { id: String },

    #[error("Setup error: {0}")]
    Setup(#[from] ScoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Snapshots kept per match for undo.
    pub undo_depth: usize,

    /// Minimum gap between two scored points on the same match.
    pub debounce: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { undo_depth: DEFAULT_UNDO_DEPTH, debounce: None }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Marks a match as in flight until dropped.
struct ProcessingGuard<'a> {
    processing: &'a Mutex<HashSet<String>>,
    id: String,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        lock(self.processing).remove(&self.id);
    }
}

pub struct Scorekeeper<S: MatchStore> {
    store: S,
    config: SessionConfig,
    processing: Mutex<HashSet<String>>,
    last_point: Mutex<HashMap<String, Instant>>,
    history: Mutex<HashMap<String, VecDeque<Match>>>,
}

impl<S: MatchStore> Scorekeeper<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self {
            store,
            config,
            processing: Mutex::new(HashSet::new()),
            last_point: Mutex::new(HashMap::new()),
            history: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Build a match from `setup` and store it.
    pub fn start_match(&self, setup: MatchSetup) -> Result<Match, SessionError> {
        let state = new_match(setup)?;
        let stored = self.write(&state)?;
        log::info!("match {} started", stored.id);
        Ok(stored)
    }

    pub fn get_match(&self, id: &str) -> Result<Match, SessionError> {
        self.store.get_match(id)?.ok_or_else(|| SessionError::NotFound { id: id.to_string() })
    }

    pub fn subscribe(&self, id: &str, callback: MatchCallback) -> Subscription {
        self.store.subscribe(id, callback)
    }

    pub fn score_point(&self, id: &str, team: TeamId) -> Result<Match, SessionError> {
        let _guard = self.begin(id)?;

        if let Some(window) = self.config.debounce {
            let recent = lock(&self.last_point).get(id).is_some_and(|at| at.elapsed() < window);
            if recent {
                log::debug!("match {}: point for {} debounced", id, team);
                return Err(SessionError::Debounced { id: id.to_string() });
            }
        }

        let current = self.get_match(id)?;
        if current.is_completed {
            return Err(SessionError::MatchCompleted { id: id.to_string() });
        }

        let stored = self.commit(current, |m| engine::apply_point(m, team))?;
        if !stored.is_completed {
            lock(&self.last_point).insert(id.to_string(), Instant::now());
        }
        Ok(stored)
    }

    /// Restore the snapshot taken before the last change made through this session.
    pub fn undo(&self, id: &str) -> Result<Match, SessionError> {
        let _guard = self.begin(id)?;

        let previous = lock(&self.history)
            .get_mut(id)
            .and_then(VecDeque::pop_back)
            .ok_or_else(|| SessionError::NothingToUndo { id: id.to_string() })?;

        match self.write(&previous) {
            Ok(stored) => {
                log::debug!("match {}: undo to {}", id, stored.scoreline());
                Ok(stored)
            }
            Err(e) => {
                lock(&self.history).entry(id.to_string()).or_default().push_back(previous);
                Err(e)
            }
        }
    }

    /// Drop everything this session keeps for `id` (undo snapshots, debounce clock).
    pub fn release(&self, id: &str) {
        lock(&self.history).remove(id);
        lock(&self.last_point).remove(id);
    }

    pub fn tracked_matches(&self) -> usize {
        let mut ids: HashSet<String> = lock(&self.history).keys().cloned().collect();
        ids.extend(lock(&self.last_point).keys().cloned());
        ids.len()
    }

    pub fn undo_depth(&self, id: &str) -> usize {
        lock(&self.history).get(id).map_or(0, VecDeque::len)
    }

    pub fn toggle_sides(&self, id: &str) -> Result<Match, SessionError> {
        self.mutate(id, engine::toggle_sides)
    }

    pub fn apply_side_change(&self, id: &str) -> Result<Match, SessionError> {
        self.mutate(id, engine::apply_side_change)
    }

    pub fn switch_server(&self, id: &str) -> Result<Match, SessionError> {
        self.mutate(id, engine::switch_server)
    }

    pub fn remove_point(&self, id: &str, team: TeamId) -> Result<Match, SessionError> {
        self.mutate(id, |m| engine::remove_point(m, team))
    }

    pub fn important_point(&self, id: &str) -> Result<ImportantPoint, SessionError> {
        Ok(get_important_point(Some(&self.get_match(id)?)))
    }

    fn begin(&self, id: &str) -> Result<ProcessingGuard<'_>, SessionError> {
        if !lock(&self.processing).insert(id.to_string()) {
            return Err(SessionError::Busy { id: id.to_string() });
        }
        Ok(ProcessingGuard { processing: &self.processing, id: id.to_string() })
    }

    fn mutate(&self, id: &str, op: impl FnOnce(&Match) -> Match) -> Result<Match, SessionError> {
        let _guard = self.begin(id)?;
        let current = self.get_match(id)?;
        self.commit(current, op)
    }

    /// Apply `op`, write the result and remember `current` for undo.
    /// Operations that change nothing are not written.
    fn commit(
        &self,
        current: Match,
        op: impl FnOnce(&Match) -> Match,
    ) -> Result<Match, SessionError> {
        let next = op(&current);
        if next == current {
            return Ok(current);
        }

        let stored = self.write(&next)?;

        let id = current.id.clone();
        {
            let mut history = lock(&self.history);
            let stack = history.entry(id.clone()).or_default();
            stack.push_back(current);
            // a finished match keeps only the snapshot before its last change
            let depth = if stored.is_completed { 1 } else { self.config.undo_depth };
            while stack.len() > depth {
                stack.pop_front();
            }
        }
        if stored.is_completed {
            lock(&self.last_point).remove(&id);
            log::debug!("match {}: completed, session state trimmed", id);
        }
        Ok(stored)
    }

    /// Write `state`; a recoverable failure is retried once without the game log.
    fn write(&self, state: &Match) -> Result<Match, SessionError> {
        match self.store.update_match(state) {
            Ok(()) => Ok(state.clone()),
            Err(e) if e.is_recoverable() => {
                log::warn!("match {}: write failed ({}), retrying without game history", state.id, e);
                let slim = state.without_history();
                self.store.update_match(&slim)?;
                Ok(slim)
            }
            Err(e) => Err(e.into()),
        }
    }
}
