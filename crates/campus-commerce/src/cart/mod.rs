//! Shopping cart module.
//!
//! Contains the cart store, line items, and the summary used by checkout.

mod store;
mod summary;

pub use store::{AddOutcome, CartStore, LineItem};
pub use summary::{CartSummary, LineSummary};
