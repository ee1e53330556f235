//! Flat-file JSON record store.
//!
//! Every collection is a single JSON document holding one top-level array.
//! Reads are fail-open: a missing, unreadable, or corrupt file loads as an
//! empty collection so a cold-start filesystem never blocks the server.
//! Writes rewrite the whole document. Mutating callers must hold the
//! collection's lock across the load-mutate-save window.

mod models;

pub use models::{Coupon, Product, User};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Named collections persisted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Users,
    Coupons,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Products => "products.json",
            Collection::Users => "users.json",
            Collection::Coupons => "coupons.json",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write collection file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Whole-file JSON persistence rooted at a data directory.
pub struct JsonStore {
    data_dir: PathBuf,
    locks: Mutex<HashMap<Collection, Arc<tokio::sync::Mutex<()>>>>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the backing file for a collection.
    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Acquire the per-collection mutation lock. Hold the guard across
    /// load, mutate, and save; plain reads do not need it.
    pub async fn lock(&self, collection: Collection) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(collection).or_default())
        };
        lock.lock_owned().await
    }

    /// Load all records of a collection. Never fails: absent or corrupt
    /// files load as an empty collection.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let path = self.collection_path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Collection file is not valid JSON, treating as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite a collection with the full record slice, pretty-printed.
    /// Creates the data directory if it does not exist yet.
    pub async fn save<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let (_dir, store) = temp_store();
        let products: Vec<Product> = store.load(Collection::Products).await;
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let (_dir, store) = temp_store();
        tokio::fs::write(store.collection_path(Collection::Coupons), b"{not json")
            .await
            .unwrap();
        let coupons: Vec<Coupon> = store.load(Collection::Coupons).await;
        assert!(coupons.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_in_order() {
        let (_dir, store) = temp_store();
        let coupons = vec![
            Coupon {
                id: "coupon-1".into(),
                code: "TEN".into(),
                discount: 10.0,
                kind: "percentage".into(),
                active: true,
            },
            Coupon {
                id: "coupon-2".into(),
                code: "FLAT".into(),
                discount: 500.0,
                kind: "fixed".into(),
                active: false,
            },
        ];
        store.save(Collection::Coupons, &coupons).await.unwrap();

        let loaded: Vec<Coupon> = store.load(Collection::Coupons).await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "coupon-1");
        assert_eq!(loaded[1].id, "coupon-2");
    }

    #[tokio::test]
    async fn save_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested").join("data"));
        store
            .save::<Product>(Collection::Products, &[])
            .await
            .unwrap();
        assert!(store.collection_path(Collection::Products).exists());
    }

    #[tokio::test]
    async fn output_is_pretty_printed() {
        let (_dir, store) = temp_store();
        let users = vec![User {
            id: "user-1".into(),
            username: "admin".into(),
            password_hash: "x".into(),
            role: "admin".into(),
        }];
        store.save(Collection::Users, &users).await.unwrap();

        let text = tokio::fs::read_to_string(store.collection_path(Collection::Users))
            .await
            .unwrap();
        assert!(text.contains('\n'));
    }
}
