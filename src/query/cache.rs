//! Cache primitive for one logical query
//!
//! `CachedQuery` holds the last fetched value for one operation+parameters
//! pair and guarantees at most one in-flight request at a time: callers
//! arriving while a fetch is running wait for it and reuse its outcome,
//! success or failure, instead of firing a duplicate. Staleness decides
//! whether an access refetches; a failed fetch keeps the previous data so
//! screens can keep rendering it.

use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::api::ApiError;

/// Errors surfaced by cached reads.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The fetch this caller triggered failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A concurrent caller's fetch failed and this caller shared its
    /// outcome.
    #[error("{0}")]
    Shared(String),
}

impl QueryError {
    pub fn display_message(&self) -> String {
        match self {
            QueryError::Api(err) => err.display_message(),
            QueryError::Shared(msg) => msg.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::Api(err) if err.is_not_found())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, QueryError::Api(err) if err.is_unauthorized())
    }
}

/// Point-in-time view of a cache entry, for rendering.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub is_fetched: bool,
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            is_fetched: false,
        }
    }
}

#[derive(Debug)]
struct CacheEntry<T> {
    data: Option<T>,
    fetched_at: Option<Instant>,
    error: Option<String>,
    in_flight: bool,
    /// Bumped once per completed fetch, success or failure. Lets a waiter
    /// tell whether the flight it queued behind already finished.
    generation: u64,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            fetched_at: None,
            error: None,
            in_flight: false,
            generation: 0,
        }
    }
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, stale_after: Duration) -> bool {
        self.data.is_some()
            && self
                .fetched_at
                .is_some_and(|at| at.elapsed() < stale_after)
    }
}

/// One cached query with single-flight fetching.
#[derive(Debug)]
pub struct CachedQuery<T> {
    entry: RwLock<CacheEntry<T>>,
    fetch_lock: Mutex<()>,
    stale_after: Duration,
}

impl<T: Clone> CachedQuery<T> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entry: RwLock::new(CacheEntry::default()),
            fetch_lock: Mutex::new(()),
            stale_after,
        }
    }

    /// Return the cached value if fresh, otherwise fetch. Callers queued
    /// behind an in-flight fetch reuse its outcome.
    pub async fn get<F, Fut>(&self, fetch: F) -> Result<T, QueryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let observed = {
            let entry = self.entry.read().await;
            if entry.is_fresh(self.stale_after) {
                if let Some(data) = &entry.data {
                    return Ok(data.clone());
                }
            }
            entry.generation
        };

        let _guard = self.fetch_lock.lock().await;
        {
            let entry = self.entry.read().await;
            if entry.generation != observed {
                // The flight we queued behind completed; share its outcome.
                return match (&entry.data, &entry.error) {
                    (_, Some(msg)) => Err(QueryError::Shared(msg.clone())),
                    (Some(data), None) => Ok(data.clone()),
                    (None, None) => Err(QueryError::Shared("no data available".to_string())),
                };
            }
        }
        self.run_fetch(fetch).await.map_err(QueryError::Api)
    }

    /// Fetch unconditionally, ignoring freshness. Still serialized against
    /// other fetches for the same entry.
    pub async fn refetch<F, Fut>(&self, fetch: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let _guard = self.fetch_lock.lock().await;
        self.run_fetch(fetch).await
    }

    async fn run_fetch<F, Fut>(&self, fetch: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.entry.write().await.in_flight = true;
        let result = fetch().await;
        let mut entry = self.entry.write().await;
        entry.in_flight = false;
        entry.generation += 1;
        match result {
            Ok(value) => {
                entry.data = Some(value.clone());
                entry.fetched_at = Some(Instant::now());
                entry.error = None;
                Ok(value)
            }
            Err(err) => {
                // Keep any previous data; screens continue rendering it.
                entry.error = Some(err.display_message());
                Err(err)
            }
        }
    }

    /// Mark the entry stale so the next access refetches. Data is kept.
    pub async fn invalidate(&self) {
        self.entry.write().await.fetched_at = None;
    }

    /// Drop everything, including data.
    pub async fn clear(&self) {
        *self.entry.write().await = CacheEntry::default();
    }

    pub async fn peek(&self) -> Option<T> {
        self.entry.read().await.data.clone()
    }

    pub async fn snapshot(&self) -> QuerySnapshot<T> {
        let entry = self.entry.read().await;
        QuerySnapshot {
            data: entry.data.clone(),
            error: entry.error.clone(),
            is_loading: entry.in_flight,
            is_fetched: entry.fetched_at.is_some(),
        }
    }
}
