//! Catalog module.
//!
//! Product listings as seen by the storefront.

mod product;

pub use product::Product;
