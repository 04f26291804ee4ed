//! Core data models for the catalog browser
//!
//! This module contains the product record returned by the remote catalog,
//! the sort order understood by its endpoints, and the catalog client.

pub mod catalog;

pub use catalog::{fetch_products_query, CatalogClient, CatalogSource, FetchError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// A product as served by the remote catalog
///
/// Immutable snapshot; nothing in the application mutates a product after
/// it has been decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier
    pub id: u64,
    /// Display title
    pub title: String,
    /// Price in its textual form (the API sends a number)
    #[serde(deserialize_with = "price_as_text")]
    pub price: String,
    /// Category name, matching an entry of the categories list
    pub category: String,
    /// Long-form description
    pub description: String,
    /// Image URL
    pub image: String,
}

/// Accepts `109.95` and `"109.95"` alike.
fn price_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceRepr {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match PriceRepr::deserialize(deserializer)? {
        PriceRepr::Number(n) => n.to_string(),
        PriceRepr::Text(s) => s,
    })
}

/// Sort order applied by the remote catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// No `sort` parameter is sent
    #[default]
    Unsorted,
    /// `sort=asc`
    Asc,
    /// `sort=desc`
    Desc,
}

/// Error returned when a sort string is not one of `""`, `asc`, `desc`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sort order: '{0}'. Valid values: asc, desc")]
pub struct InvalidSortOrder(pub String);

impl SortOrder {
    /// All sort orders in the order the sort picker lists them
    pub const ALL: [SortOrder; 3] = [SortOrder::Unsorted, SortOrder::Asc, SortOrder::Desc];

    /// Value of the `sort` query parameter, if any
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            SortOrder::Unsorted => None,
            SortOrder::Asc => Some("asc"),
            SortOrder::Desc => Some("desc"),
        }
    }

    /// Label shown in the filter bar and the sort picker
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Unsorted => "Sort By",
            SortOrder::Asc => "Name: A to Z",
            SortOrder::Desc => "Name: Z to A",
        }
    }
}

impl FromStr for SortOrder {
    type Err = InvalidSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(SortOrder::Unsorted),
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param().unwrap_or(""))
    }
}
