//! Cart, search and checkout logic for the campus marketplace.
//!
//! This crate holds everything the storefront does locally:
//!
//! - **Catalog**: the product listing record
//! - **Cart**: line items, quantities, derived count and total
//! - **Search**: query building, debouncing, in-memory filtering
//! - **Checkout**: booking requests and the gateway they are sent through
//! - **Persist**: saving the cart between sessions
//! - **Account**: credentials, sessions and public user profiles
//!
//! Network access lives behind the [`search::ProductSource`],
//! [`checkout::BookingGateway`] and [`account::AccountGateway`] traits; user-facing messages go through a
//! [`notify::NotificationSink`].
//!
//! # Example
//!
//! ```rust
//! use campus_commerce::prelude::*;
//!
//! let mut cart = CartStore::with_sink(NullSink);
//! let lamp = Product::new("p1", "Desk Lamp", Money::from_minor(25_000));
//!
//! cart.add_to_cart(&lamp);
//! cart.add_to_cart(&lamp);
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total_price().display(Currency::INR), "₹500.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod notify;

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod persist;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::notify::{
        Notification, NotificationLevel, NotificationSink, NullSink, RecordingSink, TracingSink,
    };

    // Catalog
    pub use crate::catalog::Product;

    // Cart
    pub use crate::cart::{AddOutcome, CartStore, CartSummary, LineItem, LineSummary};

    // Persistence
    pub use crate::persist::{CartBackend, CartSnapshot, JsonFileBackend, MemoryBackend, PersistentCart};

    // Checkout
    pub use crate::checkout::{
        place_booking, AuthToken, BookedLine, Booking, BookingConfirmation, BookingGateway,
        BookingLine, BookingRequest,
    };

    // Account
    pub use crate::account::{AccountGateway, Credentials, LoginSession, NewAccount, UserProfile};

    // Search
    pub use crate::search::{
        filter_products, Debouncer, LocalCatalog, ProductQuery, ProductSource, SortOption,
        CATEGORIES,
    };
}
