//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in marketplace operations.
///
/// Cart mutations themselves never fail; these cover the collaborators
/// around the cart (product lookup, checkout, persistence).
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product record from outside the crate failed validation.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Operation requires a signed-in user.
    #[error("Please login to proceed.")]
    NotAuthenticated,

    /// The backend refused the booking.
    #[error("{0}")]
    BookingRejected(String),

    /// Login or sign-up refused, locally or by the backend.
    #[error("{0}")]
    AuthRejected(String),

    /// Transport or protocol failure talking to the backend.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Cart snapshot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CommerceError {
    fn from(e: std::io::Error) -> Self {
        CommerceError::Storage(e.to_string())
    }
}
