use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::{Cart, DatacenterLocation};

/// Virtual funds a fresh cart starts with.
pub const STARTING_BUDGET: f64 = 1_000_000.0;

const CART_EXT: &str = "cart";

/// Per-user carts, kept in memory and mirrored to one `<username>.cart` JSON
/// file each. The map and the files share a single readers-writer lock:
/// mutations persist before the write lock is released, so a caller sees a
/// fully applied or fully rejected change.
pub struct CartStore {
    dir: PathBuf,
    carts: RwLock<HashMap<String, Cart>>,
}

impl CartStore {
    /// Ensures the cart directory exists and loads every `*.cart` file into
    /// memory. Unreadable files are skipped with a warning.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut carts = HashMap::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CART_EXT) {
                continue;
            }
            let Some(username) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable cart file");
                    continue;
                }
            };
            match serde_json::from_str::<Cart>(&contents) {
                Ok(cart) => {
                    carts.insert(username.to_string(), cart);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unparsable cart file"),
            }
        }
        info!(count = carts.len(), dir = %dir.display(), "loaded carts");
        Ok(Self {
            dir,
            carts: RwLock::new(carts),
        })
    }

    pub fn get(&self, username: &str) -> Result<Option<Cart>, ApiError> {
        Ok(self
            .carts
            .read()
            .map_err(|_| ApiError::Poisoned)?
            .get(username)
            .cloned())
    }

    /// Adds an item and deducts its cost, lazily creating the cart with the
    /// default budget. A purchase costing more than the remaining funds is
    /// rejected and leaves the cart unchanged.
    pub fn add(
        &self,
        username: &str,
        item: DatacenterLocation,
        cost: f64,
    ) -> Result<Cart, ApiError> {
        let mut carts = self.carts.write().map_err(|_| ApiError::Poisoned)?;
        let cart = carts.entry(username.to_string()).or_insert_with(|| Cart {
            username: username.to_string(),
            items: Vec::new(),
            money_left: STARTING_BUDGET,
        });
        if cart.money_left < cost {
            return Err(ApiError::InsufficientFunds {
                available: cart.money_left,
                cost,
            });
        }
        cart.items.push(item);
        cart.money_left -= cost;
        self.persist(cart)?;
        Ok(cart.clone())
    }

    /// Removes the item at `index`. The money spent on it is not refunded.
    pub fn remove_at(&self, username: &str, index: usize) -> Result<Cart, ApiError> {
        let mut carts = self.carts.write().map_err(|_| ApiError::Poisoned)?;
        let cart = carts
            .get_mut(username)
            .ok_or_else(|| ApiError::CartNotFound(username.to_string()))?;
        if index >= cart.items.len() {
            return Err(ApiError::InvalidIndex { index });
        }
        cart.items.remove(index);
        self.persist(cart)?;
        Ok(cart.clone())
    }

    /// Drops the user's cart from memory and deletes its backing file.
    pub fn delete(&self, username: &str) -> Result<(), ApiError> {
        let mut carts = self.carts.write().map_err(|_| ApiError::Poisoned)?;
        if carts.remove(username).is_none() {
            return Err(ApiError::CartNotFound(username.to_string()));
        }
        fs::remove_file(self.cart_path(username))?;
        Ok(())
    }

    fn cart_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{username}.{CART_EXT}"))
    }

    // Callers must hold the write lock.
    fn persist(&self, cart: &Cart) -> Result<(), ApiError> {
        let data = serde_json::to_vec_pretty(cart)?;
        fs::write(self.cart_path(&cart.username), data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn site(name: &str) -> DatacenterLocation {
        DatacenterLocation {
            latitude: 40.0,
            longitude: -75.0,
            name: name.to_string(),
            ..DatacenterLocation::default()
        }
    }

    #[test]
    fn first_purchase_creates_a_cart_with_default_budget() {
        let dir = tempdir().unwrap();
        let store = CartStore::load(dir.path()).unwrap();

        let cart = store.add("alice", site("Site A"), 250_000.0).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.money_left, STARTING_BUDGET - 250_000.0);
        assert!(dir.path().join("alice.cart").exists());
    }

    #[test]
    fn overdraft_is_rejected_and_cart_unchanged() {
        let dir = tempdir().unwrap();
        let store = CartStore::load(dir.path()).unwrap();

        store.add("bob", site("Site A"), 900_000.0).unwrap();
        let err = store.add("bob", site("Site B"), 200_000.0).unwrap_err();
        assert!(matches!(err, ApiError::InsufficientFunds { .. }));

        let cart = store.get("bob").unwrap().unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.money_left, 100_000.0);
    }

    #[test]
    fn spending_the_exact_balance_is_allowed() {
        let dir = tempdir().unwrap();
        let store = CartStore::load(dir.path()).unwrap();

        let cart = store.add("carol", site("Site A"), STARTING_BUDGET).unwrap();
        assert_eq!(cart.money_left, 0.0);
    }

    #[test]
    fn remove_at_checks_bounds_and_leaves_cart_intact() {
        let dir = tempdir().unwrap();
        let store = CartStore::load(dir.path()).unwrap();

        store.add("dave", site("Site A"), 100_000.0).unwrap();
        assert!(matches!(
            store.remove_at("dave", 1),
            Err(ApiError::InvalidIndex { index: 1 })
        ));
        assert_eq!(store.get("dave").unwrap().unwrap().items.len(), 1);

        let cart = store.remove_at("dave", 0).unwrap();
        assert!(cart.items.is_empty());
        // No refund on removal.
        assert_eq!(cart.money_left, STARTING_BUDGET - 100_000.0);
    }

    #[test]
    fn remove_from_missing_cart_is_not_found() {
        let dir = tempdir().unwrap();
        let store = CartStore::load(dir.path()).unwrap();
        assert!(matches!(
            store.remove_at("ghost", 0),
            Err(ApiError::CartNotFound(_))
        ));
    }

    #[test]
    fn carts_survive_a_restart() {
        let dir = tempdir().unwrap();
        {
            let store = CartStore::load(dir.path()).unwrap();
            store.add("erin", site("Site A"), 300_000.0).unwrap();
            store.add("erin", site("Site B"), 100_000.0).unwrap();
        }

        let reloaded = CartStore::load(dir.path()).unwrap();
        let cart = reloaded.get("erin").unwrap().unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[1].name, "Site B");
        assert_eq!(cart.money_left, STARTING_BUDGET - 400_000.0);
    }

    #[test]
    fn delete_removes_memory_and_file() {
        let dir = tempdir().unwrap();
        let store = CartStore::load(dir.path()).unwrap();

        store.add("frank", site("Site A"), 1_000.0).unwrap();
        store.delete("frank").unwrap();

        assert!(store.get("frank").unwrap().is_none());
        assert!(!dir.path().join("frank.cart").exists());
        assert!(matches!(
            store.delete("frank"),
            Err(ApiError::CartNotFound(_))
        ));
    }

    #[test]
    fn broken_cart_files_are_skipped_on_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.cart"), "{ not json").unwrap();
        fs::write(dir.path().join("ignored.txt"), "not a cart").unwrap();

        let store = CartStore::load(dir.path()).unwrap();
        assert!(store.get("bad").unwrap().is_none());
    }
}
