//! # Cart Persistence
//!
//! Durable storage for the cart's line items. Only the items array is
//! stored; the transient visibility flag always resets on reload.
//!
//! Storage failures never reach the buyer: loads fall back to an empty
//! cart and writes are logged and swallowed, with the in-memory cart
//! staying authoritative.

use crate::cart::{Cart, CartLineItem};
use crate::error::{PaymentError, PaymentResult};
use crate::product::Product;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fixed namespace for the durable cart slot
pub const STORAGE_NAMESPACE: &str = "cart-storage";

/// Storage port for cart line items.
///
/// Implementations must be atomic with respect to readers: a load must
/// never observe a partially written item list.
pub trait CartRepository: Send + Sync {
    /// Read the stored items. `Ok(None)` means no usable data (cold
    /// start, or a shape mismatch treated as absent — no partial trust).
    fn load(&self) -> PaymentResult<Option<Vec<CartLineItem>>>;

    /// Replace the stored items with the given list.
    fn save(&self, items: &[CartLineItem]) -> PaymentResult<()>;
}

/// JSON-file-backed repository.
///
/// Writes go to a sibling temp file followed by a rename, so readers
/// see either the previous list or the new one, never a torn write.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository storing under `dir/cart-storage.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_NAMESPACE}.json")),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl CartRepository for JsonFileRepository {
    fn load(&self) -> PaymentResult<Option<Vec<CartLineItem>>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PaymentError::Persistence(e.to_string())),
        };

        match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                warn!("Stored cart at {} is malformed, treating as absent: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, items: &[CartLineItem]) -> PaymentResult<()> {
        let json = serde_json::to_string(items)
            .map_err(|e| PaymentError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PaymentError::Persistence(e.to_string()))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| PaymentError::Persistence(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| PaymentError::Persistence(e.to_string()))?;

        debug!("Persisted {} cart line item(s) to {}", items.len(), self.path.display());
        Ok(())
    }
}

/// In-memory repository for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryRepository {
    items: std::sync::Mutex<Option<Vec<CartLineItem>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartRepository for MemoryRepository {
    fn load(&self) -> PaymentResult<Option<Vec<CartLineItem>>> {
        Ok(self.items.lock().expect("repository lock poisoned").clone())
    }

    fn save(&self, items: &[CartLineItem]) -> PaymentResult<()> {
        *self.items.lock().expect("repository lock poisoned") = Some(items.to_vec());
        Ok(())
    }
}

/// The cart store: single source of truth for the buyer's pending
/// order intent.
///
/// Owns a [`Cart`] plus an injected repository. Every mutation is
/// written through; a write failure is logged and swallowed so the
/// buyer keeps a working in-memory cart.
pub struct CartStore {
    cart: Cart,
    repo: Box<dyn CartRepository>,
}

impl CartStore {
    /// Open the store, restoring items from the repository when
    /// present. Absent or malformed data initializes an empty cart.
    pub fn open(repo: Box<dyn CartRepository>) -> Self {
        let cart = match repo.load() {
            Ok(Some(items)) => {
                debug!("Restored cart with {} line item(s)", items.len());
                Cart::with_items(items)
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!("Failed to load stored cart, starting empty: {}", e);
                Cart::new()
            }
        };

        Self { cart, repo }
    }

    /// Read access to the underlying cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        self.cart.add_item(product, quantity);
        self.persist();
    }

    pub fn remove_item(&mut self, product_id: &str) {
        self.cart.remove_item(product_id);
        self.persist();
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        self.cart.update_quantity(product_id, quantity);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }

    pub fn total_price(&self) -> i64 {
        self.cart.total_price()
    }

    pub fn item_quantity(&self, product_id: &str) -> u32 {
        self.cart.item_quantity(product_id)
    }

    /// Visibility flag mutations — not written through, the flag is
    /// transient by contract.
    pub fn toggle_open(&mut self) {
        self.cart.toggle_open();
    }

    pub fn set_open(&mut self, open: bool) {
        self.cart.set_open(open);
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save(self.cart.items()) {
            warn!("Cart persistence failed, keeping in-memory state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Currency, Price};
    use std::path::PathBuf;

    fn phone(id: &str, amount: i64) -> Product {
        Product::new(id, format!("Phone {id}"), Price::from_minor(amount, Currency::XAF))
    }

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!(
                "market-cart-test-{}",
                uuid::Uuid::new_v4().simple()
            ));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_cold_start_is_empty() {
        let dir = TempDir::new();
        let store = CartStore::open(Box::new(JsonFileRepository::new(&dir.0)));
        assert!(store.cart().is_empty());
        assert_eq!(store.total_price(), 0);
    }

    #[test]
    fn test_persist_reload_round_trip() {
        let dir = TempDir::new();

        {
            let mut store = CartStore::open(Box::new(JsonFileRepository::new(&dir.0)));
            store.add_item(&phone("a", 10_000), 1);
            store.add_item(&phone("b", 20_000), 2);
            store.add_item(&phone("c", 5_000), 3);
            store.set_open(true);
        }

        let store = CartStore::open(Box::new(JsonFileRepository::new(&dir.0)));
        let items = store.cart().items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "a");
        assert_eq!(items[1].quantity, 2);
        assert_eq!(items[2].product.price.amount, 5_000);
        assert_eq!(store.total_price(), 10_000 + 40_000 + 15_000);

        // visibility is transient and never restored
        assert!(!store.cart().is_open());
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_empty() {
        let dir = TempDir::new();
        let repo = JsonFileRepository::new(&dir.0);
        fs::write(dir.0.join("cart-storage.json"), "{not json]").unwrap();

        assert!(repo.load().unwrap().is_none());

        let store = CartStore::open(Box::new(repo));
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_shape_mismatch_treated_as_absent() {
        let dir = TempDir::new();
        // valid JSON, wrong shape
        fs::write(dir.0.join("cart-storage.json"), r#"{"items": 42}"#).unwrap();

        let repo = JsonFileRepository::new(&dir.0);
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new();
        let mut store = CartStore::open(Box::new(JsonFileRepository::new(&dir.0)));
        store.add_item(&phone("a", 10_000), 1);

        assert!(dir.0.join("cart-storage.json").exists());
        assert!(!dir.0.join("cart-storage.json.tmp").exists());
    }

    #[test]
    fn test_memory_repository_round_trip() {
        let repo = MemoryRepository::new();
        let items = vec![CartLineItem::from_product(&phone("a", 10_000), 2)];
        repo.save(&items).unwrap();

        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].quantity, 2);
    }

    #[test]
    fn test_clear_persists() {
        let dir = TempDir::new();
        {
            let mut store = CartStore::open(Box::new(JsonFileRepository::new(&dir.0)));
            store.add_item(&phone("a", 10_000), 1);
            store.clear();
        }

        let store = CartStore::open(Box::new(JsonFileRepository::new(&dir.0)));
        assert!(store.cart().is_empty());
    }
}
