//! Credential pool for the generation backend
//!
//! Ordered API keys with failover state:
//! - a cursor to the key handed out last
//! - a failed set, cleared when the reset interval elapses
//! - forced retry-everything once every key has failed

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::models::ApiCredential;

/// Default interval after which failed keys are forgotten
pub const DEFAULT_RESET_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct PoolState {
    cursor: usize,
    failed: HashSet<ApiCredential>,
    last_reset: Instant,
}

/// Shared pool of interchangeable API keys
///
/// Every operation runs as one critical section over the cursor and failed
/// set, so concurrent requests never observe a half-applied reset.
#[derive(Debug)]
pub struct CredentialPool {
    credentials: Vec<ApiCredential>,
    reset_interval: Duration,
    state: Mutex<PoolState>,
}

impl CredentialPool {
    /// Create a pool; duplicate keys keep their first position
    pub fn new(credentials: Vec<ApiCredential>, reset_interval: Duration) -> Self {
        let mut seen = HashSet::new();
        let total = credentials.len();
        let credentials: Vec<ApiCredential> = credentials
            .into_iter()
            .filter(|c| !c.expose().trim().is_empty() && seen.insert(c.clone()))
            .collect();

        if credentials.len() != total {
            warn!(
                dropped = total - credentials.len(),
                "ignoring blank or duplicate API keys"
            );
        }

        info!(
            keys = credentials.len(),
            reset_interval_secs = reset_interval.as_secs(),
            "credential pool initialized"
        );

        Self {
            credentials,
            reset_interval,
            state: Mutex::new(PoolState {
                cursor: 0,
                failed: HashSet::new(),
                last_reset: Instant::now(),
            }),
        }
    }

    /// Create a pool from raw key strings with the default reset interval
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            keys.into_iter().map(ApiCredential::new).collect(),
            DEFAULT_RESET_INTERVAL,
        )
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of keys in the pool
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Returns true if no keys are configured
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Position of the key handed out last
    pub fn cursor(&self) -> usize {
        self.lock().cursor
    }

    /// Number of keys currently marked failed
    pub fn failed_count(&self) -> usize {
        self.lock().failed.len()
    }

    /// Returns true if `credential` is currently marked failed
    pub fn is_failed(&self, credential: &ApiCredential) -> bool {
        self.lock().failed.contains(credential)
    }

    /// Pick the first key, in configured order, that is not marked failed
    ///
    /// Failed marks expire once the reset interval has elapsed. When every
    /// key is marked failed the marks are cleared and the first key is
    /// returned. `None` only for an empty pool.
    pub fn get_working_credential(&self) -> Option<ApiCredential> {
        let mut state = self.lock();

        let now = Instant::now();
        if now.duration_since(state.last_reset) > self.reset_interval {
            if !state.failed.is_empty() {
                info!(
                    cleared = state.failed.len(),
                    "reset interval elapsed; failed API keys are selectable again"
                );
            }
            state.failed.clear();
            state.last_reset = now;
        }

        if let Some((position, credential)) = self
            .credentials
            .iter()
            .enumerate()
            .find(|(_, c)| !state.failed.contains(*c))
        {
            state.cursor = position;
            return Some(credential.clone());
        }

        // Every key failed: forget the failures and start over from the top
        if !state.failed.is_empty() {
            warn!("all API keys marked failed; retrying from the first key");
        }
        state.failed.clear();
        state.cursor = 0;
        let first = self.credentials.first().cloned();
        if first.is_none() {
            debug!("credential pool is empty");
        }
        first
    }

    /// Mark `credential` failed until the next reset
    pub fn mark_failed(&self, credential: &ApiCredential) {
        let mut state = self.lock();
        if state.failed.insert(credential.clone()) {
            warn!(key = %credential, "API key marked as failed");
        }
    }
}
