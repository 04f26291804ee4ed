//! Shared test fixtures: an in-memory catalog with call counters

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::data::{CatalogSource, FetchError, Product, SortOrder};
use crate::fetch::{FetchMessage, Fetcher};

/// Builds a product with the given id, title and category
pub fn product(id: u64, title: &str, category: &str) -> Product {
    Product {
        id,
        title: title.to_string(),
        price: format!("{}.99", id * 10),
        category: category.to_string(),
        description: format!("Description of {title}"),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
    }
}

/// A small catalog spanning two categories
pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "Backpack", "men's clothing"),
        product(2, "Gold Ring", "jewelery"),
        product(3, "Hard Drive", "electronics"),
        product(4, "Monitor", "electronics"),
        product(5, "Rain Jacket", "women's clothing"),
    ]
}

/// In-memory catalog that records every request
pub struct MockCatalog {
    products: Vec<Product>,
    categories: Vec<String>,
    /// Delay before a products response
    products_delay: Duration,
    /// When set, products requests fail with this status
    products_status: Mutex<Option<u16>>,
    product_calls: AtomicUsize,
    category_calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            products: sample_products(),
            categories: vec![
                "electronics".to_string(),
                "jewelery".to_string(),
                "men's clothing".to_string(),
                "women's clothing".to_string(),
            ],
            products_delay: Duration::ZERO,
            products_status: Mutex::new(None),
            product_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_products_delay(mut self, delay: Duration) -> Self {
        self.products_delay = delay;
        self
    }

    pub fn failing_products(self, status: u16) -> Self {
        *self.products_status.lock().unwrap() = Some(status);
        self
    }

    pub fn set_products_status(&self, status: Option<u16>) {
        *self.products_status.lock().unwrap() = status;
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    /// Requests in the order they were made, e.g. `products?sort=asc`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    async fn respond(&self, request: String, category: Option<&str>) -> Result<Vec<Product>, FetchError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(self.products_delay).await;

        if let Some(status) = *self.products_status.lock().unwrap() {
            return Err(FetchError::HttpStatus {
                status,
                url: format!("http://mock/{request}"),
            });
        }

        Ok(self
            .products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect())
    }
}

fn with_sort(path: String, sort: SortOrder) -> String {
    match sort.as_param() {
        Some(s) => format!("{path}?sort={s}"),
        None => path,
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn fetch_products(&self, sort: SortOrder) -> Result<Vec<Product>, FetchError> {
        self.respond(with_sort("products".to_string(), sort), None).await
    }

    async fn fetch_category_products(
        &self,
        category: &str,
        sort: SortOrder,
    ) -> Result<Vec<Product>, FetchError> {
        let request = with_sort(format!("products/category/{category}"), sort);
        self.respond(request, Some(category)).await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, FetchError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push("categories".to_string());
        Ok(self.categories.clone())
    }
}

/// Fetcher over `catalog` with the default staleness window
pub fn fetcher(catalog: &Arc<MockCatalog>) -> (Fetcher, mpsc::Receiver<FetchMessage>) {
    Fetcher::new(catalog.clone(), crate::cache::DEFAULT_STALE_TIME)
}
