//! Search module.
//!
//! Query building, debouncing, and in-memory filtering of listings, plus
//! the [`ProductSource`] seam the storefront fetches listings through.

mod debounce;
mod filter;
mod query;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use filter::{filter_products, matches, sort_products};
pub use query::{category_filter, ProductQuery, SortOption, CATEGORIES};

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use async_trait::async_trait;

/// Where listings come from.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Listings matching `query`.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError>;

    /// A single listing; `ProductNotFound` if it does not exist.
    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError>;
}

/// A fixed set of listings, filtered in memory.
#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    products: Vec<Product>,
}

impl LocalCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[async_trait]
impl ProductSource for LocalCatalog {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError> {
        Ok(filter_products(&self.products, query))
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }
}
