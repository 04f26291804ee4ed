//! Remote catalog API client
//!
//! Builds request URLs for the product and category endpoints, issues the
//! requests, and decodes the JSON arrays they return.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{Product, SortOrder};

/// Default catalog host
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Default path of the category list, relative to the base URL
pub const DEFAULT_CATEGORIES_PATH: &str = "categories";

/// Errors that can occur when fetching from the catalog
///
/// Cloneable so that a single in-flight request can hand the same outcome to
/// every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The body was not the expected JSON
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The base URL cannot have endpoint paths appended
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Source of catalog data
///
/// Implemented by [`CatalogClient`] over HTTP; tests provide in-memory
/// implementations.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All products, optionally sorted
    async fn fetch_products(&self, sort: SortOrder) -> Result<Vec<Product>, FetchError>;

    /// Products of one category, optionally sorted
    async fn fetch_category_products(
        &self,
        category: &str,
        sort: SortOrder,
    ) -> Result<Vec<Product>, FetchError>;

    /// Names of all categories
    async fn fetch_categories(&self) -> Result<Vec<String>, FetchError>;
}

/// Fetches the product list for a filter selection
///
/// An empty `category` selects the all-products endpoint; anything else
/// selects the category endpoint.
pub async fn fetch_products_query(
    source: &dyn CatalogSource,
    category: &str,
    sort: SortOrder,
) -> Result<Vec<Product>, FetchError> {
    if category.is_empty() {
        source.fetch_products(sort).await
    } else {
        source.fetch_category_products(category, sort).await
    }
}

/// Client for the remote catalog REST API
#[derive(Debug, Clone)]
pub struct CatalogClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL of the API
    base_url: Url,
    /// Path segments of the category list endpoint
    categories_path: Vec<String>,
}

impl CatalogClient {
    /// Creates a client for the catalog at `base_url`
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
            categories_path: split_path(DEFAULT_CATEGORIES_PATH),
        }
    }

    /// Overrides the category list path
    pub fn with_categories_path(mut self, path: &str) -> Self {
        self.categories_path = split_path(path);
        self
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the all-products endpoint
    pub fn products_url(&self, sort: SortOrder) -> Result<Url, FetchError> {
        self.endpoint(&["products"], sort)
    }

    /// URL of the category-scoped products endpoint
    pub fn category_products_url(&self, category: &str, sort: SortOrder) -> Result<Url, FetchError> {
        self.endpoint(&["products", "category", category], sort)
    }

    /// URL of the category list endpoint
    pub fn categories_url(&self) -> Result<Url, FetchError> {
        let segments: Vec<&str> = self.categories_path.iter().map(String::as_str).collect();
        self.endpoint(&segments, SortOrder::Unsorted)
    }

    /// Appends path segments to the base URL and the sort parameter, if any
    fn endpoint(&self, segments: &[&str], sort: SortOrder) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::InvalidUrl(format!("base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        if let Some(sort) = sort.as_param() {
            url.query_pairs_mut().append_pair("sort", sort);
        }

        Ok(url)
    }

    /// Issues a GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::debug!(%url, "catalog request");

        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "catalog request failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        let decoded = serde_json::from_str(&text)?;
        Ok(decoded)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_products(&self, sort: SortOrder) -> Result<Vec<Product>, FetchError> {
        let url = self.products_url(sort)?;
        self.get_json(url).await
    }

    async fn fetch_category_products(
        &self,
        category: &str,
        sort: SortOrder,
    ) -> Result<Vec<Product>, FetchError> {
        let url = self.category_products_url(category, sort)?;
        self.get_json(url).await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, FetchError> {
        let url = self.categories_url()?;
        self.get_json(url).await
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn client() -> CatalogClient {
        CatalogClient::new(Url::parse(DEFAULT_BASE_URL).unwrap())
    }

    #[test]
    fn test_products_url_without_sort() {
        let url = client().products_url(SortOrder::Unsorted).unwrap();
        assert_eq!(url.as_str(), "https://fakestoreapi.com/products");
    }

    #[test]
    fn test_products_url_with_sort() {
        let c = client();
        assert_eq!(
            c.products_url(SortOrder::Asc).unwrap().as_str(),
            "https://fakestoreapi.com/products?sort=asc"
        );
        assert_eq!(
            c.products_url(SortOrder::Desc).unwrap().as_str(),
            "https://fakestoreapi.com/products?sort=desc"
        );
    }

    #[test]
    fn test_category_products_url_matches_template() {
        let c = client();
        for category in ["electronics", "jewelery"] {
            for sort in SortOrder::ALL {
                let url = c.category_products_url(category, sort).unwrap();
                let expected = match sort.as_param() {
                    Some(s) => format!("https://fakestoreapi.com/products/category/{category}?sort={s}"),
                    None => format!("https://fakestoreapi.com/products/category/{category}"),
                };
                assert_eq!(url.as_str(), expected);
            }
        }
    }

    #[test]
    fn test_category_with_spaces_is_one_segment() {
        let url = client()
            .category_products_url("men's clothing", SortOrder::Unsorted)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://fakestoreapi.com/products/category/men's%20clothing"
        );
    }

    #[test]
    fn test_category_with_slash_does_not_escape_path() {
        let url = client()
            .category_products_url("a/b", SortOrder::Unsorted)
            .unwrap();
        assert_eq!(url.path(), "/products/category/a%2Fb");
    }

    #[test]
    fn test_base_url_with_trailing_path() {
        let c = CatalogClient::new(Url::parse("http://localhost:8080/api/").unwrap());
        assert_eq!(
            c.products_url(SortOrder::Asc).unwrap().as_str(),
            "http://localhost:8080/api/products?sort=asc"
        );
    }

    #[test]
    fn test_categories_url_default_and_override() {
        assert_eq!(
            client().categories_url().unwrap().as_str(),
            "https://fakestoreapi.com/categories"
        );
        assert_eq!(
            client()
                .with_categories_path("/products/categories/")
                .categories_url()
                .unwrap()
                .as_str(),
            "https://fakestoreapi.com/products/categories"
        );
    }

    #[test]
    fn test_base_url_without_path_is_invalid_url() {
        let c = CatalogClient::new(Url::parse("mailto:shop@example.com").unwrap());

        let err = c.products_url(SortOrder::Unsorted).unwrap_err();

        assert!(matches!(err, FetchError::InvalidUrl(_)), "got {err:?}");
        assert!(err.to_string().contains("mailto:shop@example.com"));
    }

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(client().base_url().as_str(), "https://fakestoreapi.com/");
    }

    #[test]
    fn test_fetch_error_messages() {
        let err = FetchError::HttpStatus {
            status: 500,
            url: "https://fakestoreapi.com/products".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500 from https://fakestoreapi.com/products");

        let err: FetchError = serde_json::from_str::<Vec<Product>>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    /// Records which endpoint was hit
    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatalogSource for RecordingSource {
        async fn fetch_products(&self, sort: SortOrder) -> Result<Vec<Product>, FetchError> {
            self.calls.lock().unwrap().push(format!("all:{sort}"));
            Ok(Vec::new())
        }

        async fn fetch_category_products(
            &self,
            category: &str,
            sort: SortOrder,
        ) -> Result<Vec<Product>, FetchError> {
            self.calls.lock().unwrap().push(format!("{category}:{sort}"));
            Ok(Vec::new())
        }

        async fn fetch_categories(&self) -> Result<Vec<String>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fetch_products_query_dispatch() {
        let source = RecordingSource::default();

        fetch_products_query(&source, "", SortOrder::Unsorted).await.unwrap();
        fetch_products_query(&source, "", SortOrder::Asc).await.unwrap();
        fetch_products_query(&source, "jewelery", SortOrder::Desc).await.unwrap();

        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["all:", "all:asc", "jewelery:desc"]);
    }
}
