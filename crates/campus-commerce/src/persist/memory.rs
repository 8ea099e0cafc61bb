//! In-memory snapshot backend.

use crate::error::CommerceError;
use crate::persist::{CartBackend, CartSnapshot};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    snapshot: Mutex<Option<CartSnapshot>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

/// Backend that keeps the latest snapshot in memory.
///
/// Clones share state. Saves can be made to fail for exercising error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest saved snapshot.
    pub fn snapshot(&self) -> Option<CartSnapshot> {
        match self.inner.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.inner.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl CartBackend for MemoryBackend {
    fn load(&self) -> Result<Option<CartSnapshot>, CommerceError> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CommerceError> {
        if self.inner.fail_saves.load(Ordering::SeqCst) {
            return Err(CommerceError::Storage("memory backend refused save".into()));
        }
        let mut guard = self
            .inner
            .snapshot
            .lock()
            .map_err(|_| CommerceError::Storage("memory backend lock poisoned".into()))?;
        *guard = Some(snapshot.clone());
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
