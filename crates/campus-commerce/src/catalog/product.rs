//! Product listing type.

use crate::ids::{ProductId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product listed on the marketplace.
///
/// Values are read-only to the cart: the cart copies a snapshot on first add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Listing title.
    pub title: String,
    /// Unit price. Never negative.
    pub price: Money,
    /// Category label (e.g., "Books").
    pub category: String,
    /// Image URLs, primary image first.
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Seller who posted the listing.
    pub seller_id: Option<UserId>,
    /// When the listing was posted.
    pub listed_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a product with the required fields; the rest start empty.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            category: String::new(),
            images: Vec::new(),
            description: String::new(),
            seller_id: None,
            listed_at: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Set the seller.
    pub fn with_seller(mut self, seller: impl Into<UserId>) -> Self {
        self.seller_id = Some(seller.into());
        self
    }

    /// Set the listing timestamp.
    pub fn with_listed_at(mut self, listed_at: DateTime<Utc>) -> Self {
        self.listed_at = Some(listed_at);
        self
    }

    /// Primary image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Case-insensitive substring match against title and description.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Case-insensitive category comparison.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category.trim())
    }
}
