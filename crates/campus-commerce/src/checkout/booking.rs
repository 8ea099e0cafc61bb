//! Booking request and booking read-model types.

use crate::cart::CartStore;
use crate::ids::{BookingId, ProductId};
use crate::money::Money;
use crate::notify::NotificationSink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of a booking request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price from the cart snapshot.
    pub price: Money,
}

/// Everything the backend needs to place a booking for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRequest {
    /// One line per cart line item, in cart order.
    pub products: Vec<BookingLine>,
    pub total_price: Money,
}

impl BookingRequest {
    /// Build a request from the current cart contents.
    pub fn from_cart<S: NotificationSink>(cart: &CartStore<S>) -> Self {
        Self {
            products: cart
                .items()
                .iter()
                .map(|item| BookingLine {
                    product_id: item.product_id().clone(),
                    quantity: item.quantity(),
                    price: item.unit_price(),
                })
                .collect(),
            total_price: cart.total_price(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// What the backend returns for an accepted booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookingConfirmation {
    /// Identifier of the new booking, when the backend reports one.
    pub booking_id: Option<BookingId>,
    /// Backend message, if any.
    pub message: Option<String>,
}

/// A booking as listed under "My Bookings".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub total_price: Money,
    /// Backend status label (e.g., "pending", "confirmed").
    pub status: String,
    pub booked_at: Option<DateTime<Utc>>,
    pub lines: Vec<BookedLine>,
}

impl Booking {
    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// One product inside a placed booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookedLine {
    pub product_id: ProductId,
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub quantity: u32,
    pub price: Money,
}
