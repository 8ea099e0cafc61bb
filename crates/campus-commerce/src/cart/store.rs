//! Cart store and line item types.

use crate::cart::{CartSummary, LineSummary};
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use crate::notify::{Notification, NotificationSink, TracingSink};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What [`CartStore::add_to_cart`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended with quantity 1.
    Added,
    /// An existing line item's quantity went up by one.
    QuantityUpdated { quantity: u32 },
}

/// The shopping cart for the current session.
///
/// Holds at most one [`LineItem`] per product, in insertion order. All writes
/// go through the mutators below; readers only ever see `&[LineItem]`.
/// Aggregates are recomputed from the line items on every read.
#[derive(Debug, Clone)]
pub struct CartStore<S = TracingSink> {
    items: Vec<LineItem>,
    notifier: S,
}

impl CartStore<TracingSink> {
    /// Create an empty cart that reports to the `tracing` log.
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl Default for CartStore<TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NotificationSink> CartStore<S> {
    /// Create an empty cart that reports to `notifier`.
    pub fn with_sink(notifier: S) -> Self {
        Self {
            items: Vec::new(),
            notifier,
        }
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart keeps the snapshot taken when it was
    /// first added; only its quantity changes.
    pub fn add_to_cart(&mut self, product: &Product) -> AddOutcome {
        if let Some(existing) = self.find_mut(&product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            let quantity = existing.quantity;
            debug!(product_id = %product.id, quantity, "cart quantity incremented");
            self.notifier.notify(Notification::success(format!(
                "{} quantity updated in cart!",
                product.title
            )));
            return AddOutcome::QuantityUpdated { quantity };
        }

        self.items.push(LineItem::new(product.clone(), 1));
        debug!(product_id = %product.id, lines = self.items.len(), "product added to cart");
        self.notifier
            .notify(Notification::success(format!("{} added to cart!", product.title)));
        AddOutcome::Added
    }

    /// Remove the line item for `product_id`. Returns whether one was removed.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product.id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            debug!(%product_id, "product removed from cart");
            self.notifier
                .notify(Notification::error("Item removed from cart"));
        }
        removed
    }

    /// Add one to the quantity of `product_id`. No-op if it is not in the cart.
    pub fn increase_quantity(&mut self, product_id: &ProductId) -> Option<u32> {
        let item = self.find_mut(product_id)?;
        item.quantity = item.quantity.saturating_add(1);
        let quantity = item.quantity;
        debug!(%product_id, quantity, "cart quantity increased");
        Some(quantity)
    }

    /// Take one off the quantity of `product_id`, dropping the line at zero.
    ///
    /// Returns the new quantity, `Some(0)` when the line was removed, and
    /// `None` when the product was not in the cart.
    pub fn decrease_quantity(&mut self, product_id: &ProductId) -> Option<u32> {
        let index = self.items.iter().position(|i| &i.product.id == product_id)?;
        let item = self.items.get_mut(index)?;
        if item.quantity <= 1 {
            self.items.remove(index);
            debug!(%product_id, "cart line dropped at zero quantity");
            return Some(0);
        }
        item.quantity -= 1;
        let quantity = item.quantity;
        debug!(%product_id, quantity, "cart quantity decreased");
        Some(quantity)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        debug!("cart cleared");
    }

    /// Fold another cart's lines into this one.
    ///
    /// Products already here keep this cart's snapshot and gain the other
    /// cart's quantity; new products are appended in the other cart's order.
    pub fn merge<T>(&mut self, other: CartStore<T>) {
        self.absorb(other.items);
    }

    pub(crate) fn absorb(&mut self, lines: impl IntoIterator<Item = LineItem>) {
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            if let Some(existing) = self.find_mut(&line.product.id) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                self.items.push(line);
            }
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line item for `product_id`, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    /// Sum of quantities over all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of unit price times quantity over all line items.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Per-line breakdown plus totals, for checkout displays.
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            lines: self
                .items
                .iter()
                .map(|item| LineSummary {
                    product_id: item.product.id.clone(),
                    title: item.product.title.clone(),
                    unit_price: item.product.price,
                    quantity: item.quantity,
                    subtotal: item.subtotal(),
                })
                .collect(),
            item_count: self.item_count(),
            total: self.total_price(),
        }
    }

    /// The sink this cart reports to.
    pub fn notifier(&self) -> &S {
        &self.notifier
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| &i.product.id == product_id)
    }
}

/// One product in the cart and how many of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    product: Product,
    quantity: u32,
}

impl LineItem {
    pub(crate) fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Product snapshot taken when the line was created.
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Quantity, always at least 1 while the line is in a cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Snapshot unit price.
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    /// Unit price times quantity.
    pub fn subtotal(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationLevel, RecordingSink};

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Product {id}"), Money::from_minor(price))
    }

    fn cart() -> (CartStore<RecordingSink>, RecordingSink) {
        let sink = RecordingSink::new();
        (CartStore::with_sink(sink.clone()), sink)
    }

    #[test]
    fn test_cart_creation() {
        let cart = CartStore::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price(), Money::ZERO);
    }

    #[test]
    fn test_add_item() {
        let (mut cart, sink) = cart();
        let outcome = cart.add_to_cart(&product("a", 100));

        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(
            sink.last(),
            Some(Notification::success("Product a added to cart!"))
        );
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let (mut cart, sink) = cart();
        let p = product("a", 100);

        cart.add_to_cart(&p);
        let outcome = cart.add_to_cart(&p);

        assert_eq!(outcome, AddOutcome::QuantityUpdated { quantity: 2 });
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(
            sink.last(),
            Some(Notification::success("Product a quantity updated in cart!"))
        );
    }

    #[test]
    fn test_repeat_add_keeps_first_snapshot() {
        let (mut cart, _) = cart();
        cart.add_to_cart(&product("a", 100));

        let repriced = Product::new("a", "Renamed", Money::from_minor(999));
        cart.add_to_cart(&repriced);

        let line = cart.line(&ProductId::new("a")).unwrap();
        assert_eq!(line.unit_price(), Money::from_minor(100));
        assert_eq!(line.product().title, "Product a");
        assert_eq!(cart.total_price(), Money::from_minor(200));
    }

    #[test]
    fn test_two_products_keep_insertion_order() {
        let (mut cart, _) = cart();
        let a = product("a", 100);
        let b = product("b", 50);

        cart.add_to_cart(&a);
        cart.add_to_cart(&b);
        cart.add_to_cart(&b);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_price(), Money::from_minor(200));
        let ids: Vec<_> = cart.items().iter().map(|i| i.product_id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cart.items()[0].quantity(), 1);
        assert_eq!(cart.items()[1].quantity(), 2);
    }

    #[test]
    fn test_remove_item() {
        let (mut cart, sink) = cart();
        cart.add_to_cart(&product("a", 100));

        assert!(cart.remove_from_cart(&ProductId::new("a")));
        assert!(cart.is_empty());
        let last = sink.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.message, "Item removed from cart");
    }

    #[test]
    fn test_remove_absent_is_silent_noop() {
        let (mut cart, sink) = cart();
        cart.add_to_cart(&product("a", 100));
        sink.drain();

        assert!(!cart.remove_from_cart(&ProductId::new("zzz")));
        assert_eq!(cart.line_count(), 1);
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_increase_and_decrease() {
        let (mut cart, _) = cart();
        let id = ProductId::new("a");
        cart.add_to_cart(&product("a", 100));

        assert_eq!(cart.increase_quantity(&id), Some(2));
        assert_eq!(cart.decrease_quantity(&id), Some(1));
        assert_eq!(cart.decrease_quantity(&id), Some(0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_absent_is_noop() {
        let (mut cart, _) = cart();
        assert_eq!(cart.increase_quantity(&ProductId::new("x")), None);
        assert_eq!(cart.decrease_quantity(&ProductId::new("x")), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let (mut cart, _) = cart();
        cart.add_to_cart(&product("a", 100));
        cart.add_to_cart(&product("b", 100));

        cart.clear();

        assert!(cart.items().is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price(), Money::ZERO);
    }

    #[test]
    fn test_merge_sums_quantities_and_appends() {
        let (mut cart, _) = cart();
        cart.add_to_cart(&product("a", 100));

        let mut other = CartStore::with_sink(crate::notify::NullSink);
        other.add_to_cart(&Product::new("a", "Other snapshot", Money::from_minor(1)));
        other.add_to_cart(&product("c", 10));
        other.add_to_cart(&product("c", 10));

        cart.merge(other);

        assert_eq!(cart.line_count(), 2);
        let a = cart.line(&ProductId::new("a")).unwrap();
        assert_eq!(a.quantity(), 2);
        assert_eq!(a.unit_price(), Money::from_minor(100));
        assert_eq!(cart.items()[1].product_id().as_str(), "c");
        assert_eq!(cart.items()[1].quantity(), 2);
    }

    #[test]
    fn test_absorb_skips_zero_quantity_lines() {
        let (mut cart, _) = cart();
        cart.absorb(vec![LineItem::new(product("a", 100), 0)]);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_summary() {
        let (mut cart, _) = cart();
        cart.add_to_cart(&product("a", 250));
        cart.increase_quantity(&ProductId::new("a"));
        cart.add_to_cart(&product("b", 100));

        let summary = cart.summary();
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total, Money::from_minor(600));
        assert_eq!(summary.lines[0].subtotal, Money::from_minor(500));
        assert_eq!(summary.lines[1].quantity, 1);
    }
}
