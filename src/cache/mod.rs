//! Cache module for query results
//!
//! This module provides an in-memory cache keyed by resource, category and
//! sort order. Entries are reused until they are older than the staleness
//! window, and concurrent requests for the same key share one fetch.

mod query;

pub use query::{
    CacheEntry, EntryStatus, QueryCache, QueryKey, QueryState, ResourceKind, DEFAULT_STALE_TIME,
};
