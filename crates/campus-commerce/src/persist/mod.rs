//! Cart persistence.
//!
//! The cart store itself is pure session state. [`PersistentCart`] wraps it
//! and writes a [`CartSnapshot`] to a [`CartBackend`] after every mutation,
//! restoring the last snapshot when opened. Mutation semantics are exactly
//! the store's; only the save step can fail.

mod file;
mod memory;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

use crate::cart::{AddOutcome, CartStore, LineItem};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::notify::NotificationSink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized cart contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    /// Format version.
    pub version: u32,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Line items in cart order.
    pub items: Vec<LineItem>,
}

impl CartSnapshot {
    /// Capture the current contents of `cart`.
    pub fn capture<S>(cart: &CartStore<S>) -> Self
    where
        S: NotificationSink,
    {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            items: cart.items().to_vec(),
        }
    }
}

/// Storage for cart snapshots.
pub trait CartBackend {
    /// Load the last saved snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<CartSnapshot>, CommerceError>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CommerceError>;
}

impl<B: CartBackend + ?Sized> CartBackend for &B {
    fn load(&self) -> Result<Option<CartSnapshot>, CommerceError> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CommerceError> {
        (**self).save(snapshot)
    }
}

/// A cart store that saves itself after every mutation.
#[derive(Debug)]
pub struct PersistentCart<S, B> {
    pub(crate) store: CartStore<S>,
    backend: B,
}

impl<S, B> PersistentCart<S, B>
where
    S: NotificationSink,
    B: CartBackend,
{
    /// Open a cart, restoring whatever `backend` last saved.
    pub fn open(notifier: S, backend: B) -> Result<Self, CommerceError> {
        let mut store = CartStore::with_sink(notifier);
        if let Some(snapshot) = backend.load()? {
            if snapshot.version != SNAPSHOT_VERSION {
                return Err(CommerceError::Storage(format!(
                    "unsupported cart snapshot version {}",
                    snapshot.version
                )));
            }
            store.absorb(snapshot.items);
            info!(
                lines = store.line_count(),
                items = store.item_count(),
                "restored saved cart"
            );
        }
        Ok(Self { store, backend })
    }

    /// See [`CartStore::add_to_cart`].
    pub fn add_to_cart(&mut self, product: &Product) -> Result<AddOutcome, CommerceError> {
        let outcome = self.store.add_to_cart(product);
        self.save()?;
        Ok(outcome)
    }

    /// See [`CartStore::remove_from_cart`].
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Result<bool, CommerceError> {
        let removed = self.store.remove_from_cart(product_id);
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// See [`CartStore::increase_quantity`].
    pub fn increase_quantity(
        &mut self,
        product_id: &ProductId,
    ) -> Result<Option<u32>, CommerceError> {
        let quantity = self.store.increase_quantity(product_id);
        if quantity.is_some() {
            self.save()?;
        }
        Ok(quantity)
    }

    /// See [`CartStore::decrease_quantity`].
    pub fn decrease_quantity(
        &mut self,
        product_id: &ProductId,
    ) -> Result<Option<u32>, CommerceError> {
        let quantity = self.store.decrease_quantity(product_id);
        if quantity.is_some() {
            self.save()?;
        }
        Ok(quantity)
    }

    /// See [`CartStore::clear`].
    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.store.clear();
        self.save()
    }

    /// See [`CartStore::merge`]. Saves only when `other` had lines.
    pub fn merge<T: NotificationSink>(&mut self, other: CartStore<T>) -> Result<(), CommerceError> {
        if other.is_empty() {
            return Ok(());
        }
        self.store.merge(other);
        self.save()
    }

    /// Write the current contents to the backend.
    pub fn save(&self) -> Result<(), CommerceError> {
        let snapshot = CartSnapshot::capture(&self.store);
        self.backend.save(&snapshot)?;
        debug!(lines = snapshot.items.len(), "cart snapshot saved");
        Ok(())
    }

    /// Read-only view of the wrapped store.
    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Unwrap into the store and backend.
    pub fn into_parts(self) -> (CartStore<S>, B) {
        (self.store, self.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::notify::{NullSink, RecordingSink};

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Product {id}"), Money::from_minor(price))
    }

    #[test]
    fn test_open_on_empty_backend_gives_empty_cart() {
        let cart = PersistentCart::open(NullSink, MemoryBackend::new()).unwrap();
        assert!(cart.store().is_empty());
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let backend = MemoryBackend::new();
        let mut cart = PersistentCart::open(NullSink, backend.clone()).unwrap();

        cart.add_to_cart(&product("a", 100)).unwrap();
        cart.add_to_cart(&product("a", 100)).unwrap();
        cart.add_to_cart(&product("b", 40)).unwrap();
        cart.decrease_quantity(&ProductId::new("a")).unwrap();

        let saved = backend.snapshot().unwrap();
        assert_eq!(saved.version, SNAPSHOT_VERSION);
        assert_eq!(saved.items.len(), 2);
        assert_eq!(saved.items[0].quantity(), 1);
        assert_eq!(saved.items[1].product_id().as_str(), "b");
    }

    #[test]
    fn test_restore_yields_same_lines() {
        let backend = MemoryBackend::new();
        {
            let mut cart = PersistentCart::open(NullSink, backend.clone()).unwrap();
            cart.add_to_cart(&product("a", 100)).unwrap();
            cart.add_to_cart(&product("b", 50)).unwrap();
            cart.increase_quantity(&ProductId::new("b")).unwrap();
        }

        let restored = PersistentCart::open(RecordingSink::new(), backend).unwrap();
        assert_eq!(restored.store().item_count(), 3);
        assert_eq!(restored.store().total_price(), Money::from_minor(200));
        let ids: Vec<_> = restored
            .store()
            .items()
            .iter()
            .map(|i| i.product_id().as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_absent_noops_do_not_write() {
        let backend = MemoryBackend::new();
        let mut cart = PersistentCart::open(NullSink, backend.clone()).unwrap();

        assert!(!cart.remove_from_cart(&ProductId::new("x")).unwrap());
        assert_eq!(cart.increase_quantity(&ProductId::new("x")).unwrap(), None);
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_save_failure_surfaces_but_mutation_stands() {
        let backend = MemoryBackend::new();
        let mut cart = PersistentCart::open(NullSink, backend.clone()).unwrap();
        backend.fail_saves(true);

        let result = cart.add_to_cart(&product("a", 100));

        assert!(matches!(result, Err(CommerceError::Storage(_))));
        assert_eq!(cart.store().item_count(), 1);
    }

    #[test]
    fn test_merge_restored_cart_is_saved() {
        let saved_elsewhere = MemoryBackend::new();
        {
            let mut other = PersistentCart::open(NullSink, saved_elsewhere.clone()).unwrap();
            other.add_to_cart(&product("a", 100)).unwrap();
            other.add_to_cart(&product("c", 10)).unwrap();
        }
        let (other, _) = PersistentCart::open(NullSink, saved_elsewhere)
            .unwrap()
            .into_parts();

        let backend = MemoryBackend::new();
        let mut cart = PersistentCart::open(NullSink, backend.clone()).unwrap();
        cart.add_to_cart(&product("a", 100)).unwrap();
        cart.merge(other).unwrap();

        let saved = backend.snapshot().unwrap();
        assert_eq!(saved.items.len(), 2);
        assert_eq!(saved.items[0].quantity(), 2);
        assert_eq!(saved.items[1].product_id().as_str(), "c");
        assert_eq!(backend.save_count(), 2);
    }

    #[test]
    fn test_merge_of_empty_cart_does_not_write() {
        let backend = MemoryBackend::new();
        let mut cart = PersistentCart::open(NullSink, backend.clone()).unwrap();

        cart.merge(CartStore::with_sink(NullSink)).unwrap();

        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_unknown_snapshot_version_is_rejected() {
        let backend = MemoryBackend::new();
        backend
            .save(&CartSnapshot {
                version: 99,
                saved_at: Utc::now(),
                items: vec![],
            })
            .unwrap();

        let result = PersistentCart::open(NullSink, backend);
        assert!(matches!(result, Err(CommerceError::Storage(_))));
    }
}
