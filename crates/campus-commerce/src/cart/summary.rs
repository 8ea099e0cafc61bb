//! Cart summary for checkout displays.

use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Point-in-time breakdown of a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Per-line breakdown in cart order.
    pub lines: Vec<LineSummary>,
    /// Sum of quantities.
    pub item_count: u64,
    /// Sum of line subtotals.
    pub total: Money,
}

impl CartSummary {
    /// Check if the summary has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Badge text for a cart icon ("" when empty, "99+" past 99).
    pub fn badge(&self) -> String {
        match self.item_count {
            0 => String::new(),
            1..=99 => self.item_count.to_string(),
            _ => "99+".to_string(),
        }
    }

    /// Total formatted for display.
    pub fn total_display(&self, currency: Currency) -> String {
        self.total.display(currency)
    }
}

/// Pricing breakdown for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSummary {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// Unit price times quantity.
    pub subtotal: Money,
}
