//! storeview library
//!
//! A product-catalog browser: fetches products from a REST catalog API,
//! filters them by category, sorts them by name and renders them as a grid
//! of cards in the terminal.
//!
//! The query layer ([`cache`], [`fetch`]) caches responses per filter
//! combination and shares concurrent requests for the same key. The
//! [`coordinator`] holds the category list back until products have loaded
//! once.

pub mod app;
pub mod cache;
pub mod cli;
pub mod coordinator;
pub mod data;
pub mod fetch;
pub mod logging;
pub mod store;
pub mod ui;

#[cfg(test)]
mod testing;
