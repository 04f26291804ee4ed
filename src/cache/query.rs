//! In-memory query cache with in-flight request sharing
//!
//! Results are keyed by [`QueryKey`] and reused while younger than the
//! staleness window. Concurrent fetches for the same key share one request.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use crate::data::{FetchError, SortOrder};

/// How long a successful result is reused before a refetch is allowed
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(120);

/// Which remote resource a query reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Products,
    Categories,
}

/// Identifies one distinct query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: ResourceKind,
    /// Selected category, empty for all
    pub category: String,
    pub sort: SortOrder,
}

impl QueryKey {
    /// Key of a products query for the given filters
    pub fn products(category: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            kind: ResourceKind::Products,
            category: category.into(),
            sort,
        }
    }

    /// Key of the category list query
    pub fn categories() -> Self {
        Self {
            kind: ResourceKind::Categories,
            category: String::new(),
            sort: SortOrder::Unsorted,
        }
    }
}

/// Lifecycle of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    Success,
    Error,
}

/// Snapshot of a cached query
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub status: EntryStatus,
    /// Last successful data; kept while a refetch is pending or after it fails
    pub data: Option<Arc<T>>,
    /// Error of the last attempt, if it failed
    pub error: Option<FetchError>,
    /// When the status last changed
    pub updated_at: Instant,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            updated_at: self.updated_at,
        }
    }
}

impl<T> CacheEntry<T> {
    /// Whether this entry can be served without a refetch
    pub fn is_fresh(&self, stale_time: Duration) -> bool {
        self.status == EntryStatus::Success && self.updated_at.elapsed() < stale_time
    }
}

/// Observable status of a query as the UI sees it
#[derive(Debug)]
pub enum QueryState<T> {
    /// Not requested yet
    Idle,
    /// Requested, no data to show
    Loading,
    Success(Arc<T>),
    Error(FetchError),
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        match self {
            QueryState::Idle => QueryState::Idle,
            QueryState::Loading => QueryState::Loading,
            QueryState::Success(data) => QueryState::Success(Arc::clone(data)),
            QueryState::Error(err) => QueryState::Error(err.clone()),
        }
    }
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    /// Data if the query succeeded
    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }
}

type SharedFetch<T> = Shared<BoxFuture<'static, Result<Arc<T>, FetchError>>>;

/// A request that is currently running for a key
struct InFlight<T> {
    /// Distinguishes this request from a later one for the same key
    id: u64,
    future: SharedFetch<T>,
}

struct Inner<T> {
    entries: HashMap<QueryKey, CacheEntry<T>>,
    in_flight: HashMap<QueryKey, InFlight<T>>,
    next_id: u64,
}

/// Cache of query results keyed by [`QueryKey`]
///
/// The lock is never held across an await; waiting happens on the shared
/// future outside of it.
pub struct QueryCache<T> {
    inner: Mutex<Inner<T>>,
    stale_time: Duration,
}

impl<T: Send + Sync + 'static> QueryCache<T> {
    /// Creates an empty cache with the default staleness window
    pub fn new() -> Self {
        Self::with_stale_time(DEFAULT_STALE_TIME)
    }

    /// Creates an empty cache with a custom staleness window
    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
                next_id: 0,
            }),
            stale_time,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a snapshot of the entry for `key`
    pub fn get(&self, key: &QueryKey) -> Option<CacheEntry<T>> {
        self.lock().entries.get(key).cloned()
    }

    /// Whether `key` holds a successful result younger than the window
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_fresh(self.stale_time))
    }

    /// Whether a request for `key` is running
    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.lock().in_flight.contains_key(key)
    }

    /// Drops the entry for `key`
    ///
    /// A request already running for the key keeps running and records its
    /// result; the next fetch for the key joins it.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut inner = self.lock();
        inner.entries.remove(key);
        tracing::debug!(?key, "cache entry invalidated");
    }

    /// Returns the value for `key`, fetching it if needed
    ///
    /// A fresh entry is returned without calling `fetcher`. If a request for
    /// the key is already running, the caller waits for that request instead
    /// of starting another one.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let (id, future) = {
            let mut inner = self.lock();

            if let Some(entry) = inner.entries.get(&key) {
                if entry.is_fresh(self.stale_time) {
                    if let Some(data) = &entry.data {
                        tracing::debug!(?key, "cache hit");
                        return Ok(Arc::clone(data));
                    }
                }
            }

            if let Some(running) = inner.in_flight.get(&key) {
                tracing::debug!(?key, "joining in-flight request");
                (running.id, running.future.clone())
            } else {
                let id = inner.next_id;
                inner.next_id += 1;

                let future: SharedFetch<T> = fetcher().map(|r| r.map(Arc::new)).boxed().shared();
                inner.in_flight.insert(
                    key.clone(),
                    InFlight {
                        id,
                        future: future.clone(),
                    },
                );

                let previous = inner.entries.remove(&key);
                inner.entries.insert(
                    key.clone(),
                    CacheEntry {
                        status: EntryStatus::Pending,
                        data: previous.and_then(|e| e.data),
                        error: None,
                        updated_at: Instant::now(),
                    },
                );
                tracing::debug!(?key, "starting request");
                (id, future)
            }
        };

        let result = future.await;
        self.settle(&key, id, &result);
        result
    }

    /// Records the outcome of request `id`, once
    fn settle(&self, key: &QueryKey, id: u64, result: &Result<Arc<T>, FetchError>) {
        let mut inner = self.lock();

        match inner.in_flight.get(key) {
            Some(running) if running.id == id => {}
            // Already recorded by another waiter of the same request
            _ => return,
        }
        inner.in_flight.remove(key);

        let previous_data = inner.entries.get(key).and_then(|e| e.data.clone());
        let entry = match result {
            Ok(data) => CacheEntry {
                status: EntryStatus::Success,
                data: Some(Arc::clone(data)),
                error: None,
                updated_at: Instant::now(),
            },
            Err(err) => CacheEntry {
                status: EntryStatus::Error,
                data: previous_data,
                error: Some(err.clone()),
                updated_at: Instant::now(),
            },
        };
        inner.entries.insert(key.clone(), entry);
    }
}

impl<T: Send + Sync + 'static> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
