//! Background catalog fetching
//!
//! Runs cache-backed requests as tokio tasks and reports their outcome to the
//! UI loop over a channel, so the loop never blocks on the network.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::cache::{QueryCache, QueryKey};
use crate::data::{fetch_products_query, CatalogSource, FetchError, Product};

/// Capacity of the result channel
const CHANNEL_CAPACITY: usize = 32;

/// Messages sent from fetch tasks to the UI loop
#[derive(Debug, Clone)]
pub enum FetchMessage {
    /// A products query finished
    Products {
        key: QueryKey,
        result: Result<Arc<Vec<Product>>, FetchError>,
    },
    /// The category list query finished
    Categories(Result<Arc<Vec<String>>, FetchError>),
}

/// Spawns catalog requests through the query caches
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn CatalogSource>,
    products: Arc<QueryCache<Vec<Product>>>,
    categories: Arc<QueryCache<Vec<String>>>,
    sender: mpsc::Sender<FetchMessage>,
}

impl Fetcher {
    /// Creates a fetcher and the receiver its results arrive on
    pub fn new(
        source: Arc<dyn CatalogSource>,
        stale_time: Duration,
    ) -> (Self, mpsc::Receiver<FetchMessage>) {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let fetcher = Self {
            source,
            products: Arc::new(QueryCache::with_stale_time(stale_time)),
            categories: Arc::new(QueryCache::with_stale_time(stale_time)),
            sender,
        };
        (fetcher, receiver)
    }

    /// Cache of products queries
    pub fn products_cache(&self) -> &QueryCache<Vec<Product>> {
        &self.products
    }

    /// Cache of the category list query
    pub fn categories_cache(&self) -> &QueryCache<Vec<String>> {
        &self.categories
    }

    /// Starts (or joins) the products request for `key`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_products(&self, key: QueryKey) {
        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.products);
        let sender = self.sender.clone();

        tokio::spawn(async move {
            let category = key.category.clone();
            let sort = key.sort;
            let result = cache
                .fetch(key.clone(), move || async move {
                    fetch_products_query(source.as_ref(), &category, sort).await
                })
                .await;

            match &result {
                Ok(products) => tracing::info!(?key, count = products.len(), "products loaded"),
                Err(err) => tracing::warn!(?key, error = %err, "products failed"),
            }
            let _ = sender.send(FetchMessage::Products { key, result }).await;
        });
    }

    /// Starts (or joins) the category list request
    pub fn spawn_categories(&self) {
        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.categories);
        let sender = self.sender.clone();

        tokio::spawn(async move {
            let result = cache
                .fetch(QueryKey::categories(), move || async move {
                    source.fetch_categories().await
                })
                .await;

            match &result {
                Ok(categories) => tracing::info!(count = categories.len(), "categories loaded"),
                Err(err) => tracing::warn!(error = %err, "categories failed"),
            }
            let _ = sender.send(FetchMessage::Categories(result)).await;
        });
    }
}

/// Checks for a finished request without blocking
///
/// # Returns
/// * `Some(FetchMessage)` if a result was available
/// * `None` if nothing is pending
pub fn try_recv(receiver: &mut mpsc::Receiver<FetchMessage>) -> Option<FetchMessage> {
    receiver.try_recv().ok()
}
