//! JSON file snapshot backend.

use crate::error::CommerceError;
use crate::persist::{CartBackend, CartSnapshot};
use std::fs;
use std::path::{Path, PathBuf};

/// Backend that stores the snapshot as pretty-printed JSON in one file.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous snapshot intact. A missing file
/// loads as an empty cart.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cart.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<CartSnapshot>, CommerceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CommerceError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), CommerceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartStore;
    use crate::catalog::Product;
    use crate::money::Money;
    use crate::notify::NullSink;
    use crate::persist::PersistentCart;

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("cart.json"));
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("cart.json"));

        let mut store = CartStore::with_sink(NullSink);
        store.add_to_cart(&Product::new("a", "Lab Coat", Money::from_minor(45_000)));
        backend.save(&CartSnapshot::capture(&store)).unwrap();

        let loaded = backend.load().unwrap().unwrap();
        assert_eq!(loaded.items, store.items());
        assert!(!dir.path().join("nested").join("cart.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(
            backend.load(),
            Err(CommerceError::Serialization(_))
        ));
    }

    #[test]
    fn test_persistent_cart_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let mut cart = PersistentCart::open(NullSink, JsonFileBackend::new(&path)).unwrap();
        cart.add_to_cart(&Product::new("a", "Drafter", Money::from_minor(30_000)))
            .unwrap();
        cart.add_to_cart(&Product::new("a", "Drafter", Money::from_minor(30_000)))
            .unwrap();
        drop(cart);

        let reopened = PersistentCart::open(NullSink, JsonFileBackend::new(&path)).unwrap();
        assert_eq!(reopened.store().item_count(), 2);
        assert_eq!(reopened.store().total_price(), Money::from_minor(60_000));
    }
}
