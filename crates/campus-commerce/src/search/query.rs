//! Product query builder.

use serde::{Deserialize, Serialize};

/// Category menu shown above the listings. "All" means no category filter.
pub const CATEGORIES: &[&str] = &[
    "All",
    "Books",
    "Electronics",
    "Lab Equipment",
    "Stationery",
    "Furniture",
    "Cycle",
    "Accessories",
];

/// Map a menu label to a category filter; "All" and blanks mean none.
pub fn category_filter(label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(label.to_string())
    }
}

/// Sort options for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// The order the source returned them in.
    #[default]
    Listed,
    /// Most recently listed first.
    Newest,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by title A-Z.
    TitleAsc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Listed => "listed",
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::TitleAsc => "title-asc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Listed => "As listed",
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::TitleAsc => "Title: A-Z",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "listed" => Some(SortOption::Listed),
            "newest" => Some(SortOption::Newest),
            "price-asc" => Some(SortOption::PriceAsc),
            "price-desc" => Some(SortOption::PriceDesc),
            "title-asc" => Some(SortOption::TitleAsc),
            _ => None,
        }
    }
}

/// What the shopper is looking for: free text, a category, and an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProductQuery {
    /// Free-text search; empty means no text filter.
    pub search: String,
    /// Category filter; `None` means all categories.
    pub category: Option<String>,
    /// Result order.
    pub sort: SortOption,
}

impl ProductQuery {
    /// Create an empty query (everything, in source order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the category from a menu label ("All" clears it).
    pub fn with_category(mut self, label: &str) -> Self {
        self.category = category_filter(label);
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Trimmed search text, if any.
    pub fn search_text(&self) -> Option<&str> {
        let text = self.search.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Check whether the query filters nothing.
    pub fn is_unfiltered(&self) -> bool {
        self.search_text().is_none() && self.category.is_none()
    }

    /// Query-string parameters for the listing endpoint.
    ///
    /// Only non-empty `search` and `category` are included, in that order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(text) = self.search_text() {
            pairs.push(("search", text.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        pairs
    }
}
