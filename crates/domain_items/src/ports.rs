//! Item Domain Ports
//!
//! The `ItemPort` trait defines every operation the item domain needs
//! from its store. Adapters implementing it:
//!
//! - **Memory Adapter**: in-process collection for tests and demos
//! - **File Adapter**: in-process collection persisted to a JSON file (infra_db)
//! - **Postgres Adapter**: JSONB-backed tables (infra_db)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_items::ports::ItemPort;
//! use std::sync::Arc;
//!
//! let items: Arc<dyn ItemPort> = match config.storage_backend {
//!     StorageBackend::Memory => Arc::new(InMemoryItemPort::new()),
//!     StorageBackend::Postgres => Arc::new(PostgresItemAdapter::new(pool)),
//!     StorageBackend::File => store.clone(),
//! };
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, ItemId, PortError};

use crate::item::Item;
use crate::query::ItemQuery;

/// The main port trait for item storage
///
/// All methods return `Result<T, PortError>` so services handle every
/// backend's failures the same way.
#[async_trait]
pub trait ItemPort: DomainPort + HealthCheckable {
    /// Retrieves an item by ID
    ///
    /// # Returns
    ///
    /// The item if found, or `PortError::NotFound`
    async fn get_item(&self, id: ItemId) -> Result<Item, PortError>;

    /// Finds items matching the query, newest first and paginated
    async fn find_items(&self, query: &ItemQuery) -> Result<Vec<Item>, PortError>;

    /// Stores a new item
    ///
    /// Returns `PortError::Conflict` if the id is already taken
    async fn insert_item(&self, item: &Item) -> Result<(), PortError>;

    /// Replaces a stored item
    ///
    /// Returns `PortError::NotFound` if the item does not exist
    async fn save_item(&self, item: &Item) -> Result<(), PortError>;

    /// Hard-deletes an item
    async fn delete_item(&self, id: ItemId) -> Result<(), PortError>;
}

/// Answers whether any claim refers to an item
///
/// Question lists become read-only once a claimant has seen and answered
/// them. The claims crate implements this on top of its own port.
#[async_trait]
pub trait ClaimReferences: Send + Sync {
    async fn has_claims(&self, item_id: ItemId) -> Result<bool, PortError>;
}

/// In-memory item store
#[cfg(any(test, feature = "memory"))]
pub mod memory {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory implementation of ItemPort
    ///
    /// Items are kept in insertion order so unfiltered scans see the pool
    /// the way it was reported.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryItemPort {
        items: Arc<RwLock<Vec<Item>>>,
    }

    impl InMemoryItemPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with items for testing
        pub async fn with_items(items: Vec<Item>) -> Self {
            let port = Self::new();
            port.items.write().await.extend(items);
            port
        }

        /// Snapshot of every stored item in insertion order
        pub async fn all(&self) -> Vec<Item> {
            self.items.read().await.clone()
        }
    }

    impl DomainPort for InMemoryItemPort {}

    #[async_trait]
    impl HealthCheckable for InMemoryItemPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("memory-item-port")
        }
    }

    #[async_trait]
    impl ItemPort for InMemoryItemPort {
        async fn get_item(&self, id: ItemId) -> Result<Item, PortError> {
            self.items
                .read()
                .await
                .iter()
                .find(|item| item.id == id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Item", id))
        }

        async fn find_items(&self, query: &ItemQuery) -> Result<Vec<Item>, PortError> {
            Ok(query.apply(self.items.read().await.iter()))
        }

        async fn insert_item(&self, item: &Item) -> Result<(), PortError> {
            let mut items = self.items.write().await;
            if items.iter().any(|existing| existing.id == item.id) {
                return Err(PortError::conflict(format!("Item {} already exists", item.id)));
            }
            items.push(item.clone());
            Ok(())
        }

        async fn save_item(&self, item: &Item) -> Result<(), PortError> {
            let mut items = self.items.write().await;
            let slot = items
                .iter_mut()
                .find(|existing| existing.id == item.id)
                .ok_or_else(|| PortError::not_found("Item", item.id))?;
            *slot = item.clone();
            Ok(())
        }

        async fn delete_item(&self, id: ItemId) -> Result<(), PortError> {
            let mut items = self.items.write().await;
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                return Err(PortError::not_found("Item", id));
            }
            Ok(())
        }
    }

    /// Claim references backed by a plain set of item ids
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimReferences {
        claimed: Arc<RwLock<HashSet<ItemId>>>,
    }

    impl InMemoryClaimReferences {
        pub fn new() -> Self {
            Self::default()
        }

        /// Records that a claim now refers to `item_id`
        pub async fn add(&self, item_id: ItemId) {
            self.claimed.write().await.insert(item_id);
        }
    }

    #[async_trait]
    impl ClaimReferences for InMemoryClaimReferences {
        async fn has_claims(&self, item_id: ItemId) -> Result<bool, PortError> {
            Ok(self.claimed.read().await.contains(&item_id))
        }
    }
}
