//! Per-entity state containers
//!
//! Each store owns an in-memory snapshot of one entity family, changes it only
//! through its own actions, and exposes read-only views of it.
//!
//! ## Action protocol
//!
//! Every action that talks to the backend runs through [`Shared::track`]:
//! 1. the action is registered as in flight and the error slot is cleared
//! 2. the backend is called
//! 3. on success the snapshot is updated and the payload returned
//! 4. on failure the normalized message is stored and the error returned;
//!    the snapshot is left as it was
//! 5. the action is unregistered, whatever the outcome
//!
//! State sits behind a mutex that is never held across an `.await`, so
//! actions take `&self` and independent actions can be in flight together.
//! A store reports loading while any of its actions is still registered.
//! Responses are applied in the order they arrive; a later request does not
//! cancel an earlier one.

mod agents;
mod business_rules;
mod change_impacts;
mod issues;
mod projects;
mod suggestions;

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;

pub use agents::{
    is_production_agent, sort_production_first, AgentLoadingKey, AgentStore, PRODUCTION_AGENTS,
};
pub use business_rules::BusinessRuleStore;
pub use change_impacts::ChangeImpactStore;
pub use issues::IssueStore;
pub use projects::ProjectStore;
pub use suggestions::SuggestionStore;

/// In-flight actions and last error of a store with a single loading indicator.
#[derive(Debug, Clone, Default)]
pub struct ActionStatus {
    in_flight: LoadingMap<&'static str>,
    pub error: Option<String>,
}

impl ActionStatus {
    pub fn is_loading(&self) -> bool {
        self.in_flight.any()
    }

    /// Names of the actions still outstanding
    pub fn active(&self) -> Vec<&'static str> {
        let mut names = self.in_flight.active();
        names.sort_unstable();
        names
    }
}

/// Explicit mapping from operation key to "in flight".
///
/// `begin` inserts the key (or bumps its count when the same key is already
/// running), `finish` decrements it and removes the key once nothing under it
/// is running. A key is loading exactly while it is present.
#[derive(Debug, Clone)]
pub struct LoadingMap<K> {
    in_flight: HashMap<K, usize>,
}

impl<K> Default for LoadingMap<K> {
    fn default() -> Self {
        Self {
            in_flight: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> LoadingMap<K> {
    pub fn begin(&mut self, key: K) {
        *self.in_flight.entry(key).or_insert(0) += 1;
    }

    pub fn finish(&mut self, key: &K) {
        if let Some(count) = self.in_flight.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(key);
            }
        }
    }

    pub fn is_loading(&self, key: &K) -> bool {
        self.in_flight.contains_key(key)
    }

    pub fn any(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Keys currently in flight
    pub fn active(&self) -> Vec<K> {
        self.in_flight.keys().cloned().collect()
    }
}

/// Store state that carries an [`ActionStatus`].
pub(crate) trait Tracked {
    fn status_mut(&mut self) -> &mut ActionStatus;
}

/// Mutex-guarded store state.
pub(crate) struct Shared<S> {
    inner: Mutex<S>,
}

impl<S: Default> Default for Shared<S> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(S::default()),
        }
    }
}

impl<S> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, S> {
        // Closures only assign whole fields; a poisoned snapshot is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock())
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<S: Tracked> Shared<S> {
    /// Run one action under the store's in-flight registry and error slot.
    pub(crate) async fn track<T, F>(&self, action: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.write(|s| {
            let status = s.status_mut();
            status.in_flight.begin(action);
            status.error = None;
        });

        let result = fut.await;

        self.write(|s| {
            let status = s.status_mut();
            status.in_flight.finish(&action);
            if let Err(err) = &result {
                let message = err.failure().message;
                tracing::debug!(
                    action,
                    error = %message,
                    still_running = ?status.active(),
                    "store action failed"
                );
                status.error = Some(message);
            }
        });

        result
    }
}

/// Replace the element whose key matches `item`'s; no-op when absent.
pub(crate) fn replace_by<T, K: PartialEq>(items: &mut [T], item: T, key: impl Fn(&T) -> K) {
    let wanted = key(&item);
    if let Some(index) = items.iter().position(|existing| key(existing) == wanted) {
        items[index] = item;
    }
}
