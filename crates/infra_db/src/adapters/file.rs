//! JSON File Store
//!
//! An in-process store for items and claims that persists its whole state
//! to a single JSON document after every change. It suits demos and small
//! single-instance deployments that do not run PostgreSQL.
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! data file. If persisting fails the in-memory state is left as it was
//! before the operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, ItemId, PortError,
};
use domain_claims::{ClaimAttempt, ClaimPort, ClaimQuery};
use domain_claims::ports::sort_oldest_first;
use domain_items::{Item, ItemPort, ItemQuery};

use crate::error::{db_to_port_error, DatabaseError};

/// On-disk document layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub claims: Vec<ClaimAttempt>,
}

/// Item and claim store persisted to a JSON file
///
/// Cloning shares the same underlying state.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Arc<RwLock<StoreSnapshot>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let path = path.into();
        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => StoreSnapshot::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreSnapshot::default(),
            Err(e) => return Err(DatabaseError::io(path.display().to_string(), e)),
        };

        info!(
            path = %path.display(),
            items = snapshot.items.len(),
            claims = snapshot.claims.len(),
            "Opened JSON file store"
        );

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(snapshot)),
        })
    }

    /// Opens the store and, if it holds no items, writes `seed` to it
    pub async fn open_with_seed(
        path: impl Into<PathBuf>,
        seed: StoreSnapshot,
    ) -> Result<Self, DatabaseError> {
        let store = Self::open(path).await?;
        let mut state = store.state.write().await;
        if state.items.is_empty() && state.claims.is_empty() {
            store.persist(&seed).await?;
            info!(items = seed.items.len(), "Seeded JSON file store");
            *state = seed;
        }
        drop(state);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    async fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), DatabaseError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        let display = self.path.display().to_string();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DatabaseError::io(display.clone(), e))?;
        }
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| DatabaseError::io(tmp.display().to_string(), e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DatabaseError::io(display, e))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Persisted store");
        Ok(())
    }

    /// Applies `change` to a copy of the state, persists the copy, then
    /// swaps it in
    async fn mutate<F>(&self, change: F) -> Result<(), PortError>
    where
        F: FnOnce(&mut StoreSnapshot) -> Result<(), PortError> + Send,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        change(&mut next)?;
        self.persist(&next).await.map_err(db_to_port_error)?;
        *state = next;
        Ok(())
    }
}

impl DomainPort for JsonFileStore {}

#[async_trait]
impl HealthCheckable for JsonFileStore {
    /// Checks that the data file's directory is reachable
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        let result = tokio::fs::metadata(&dir).await;

        let mut check = HealthCheckResult::healthy("json-file-store");
        check.latency_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                check.status = AdapterHealth::Unhealthy;
                check.message = Some(format!("{} is not a directory", dir.display()));
            }
            Err(e) => {
                check.status = AdapterHealth::Unhealthy;
                check.message = Some(format!("Cannot access {}: {}", dir.display(), e));
            }
        }
        check
    }
}

#[async_trait]
impl ItemPort for JsonFileStore {
    async fn get_item(&self, id: ItemId) -> Result<Item, PortError> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Item", id))
    }

    async fn find_items(&self, query: &ItemQuery) -> Result<Vec<Item>, PortError> {
        Ok(query.apply(self.state.read().await.items.iter()))
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn insert_item(&self, item: &Item) -> Result<(), PortError> {
        let item = item.clone();
        self.mutate(move |state| {
            if state.items.iter().any(|existing| existing.id == item.id) {
                return Err(PortError::conflict(format!("Item {} already exists", item.id)));
            }
            state.items.push(item);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn save_item(&self, item: &Item) -> Result<(), PortError> {
        let item = item.clone();
        self.mutate(move |state| {
            let slot = state
                .items
                .iter_mut()
                .find(|existing| existing.id == item.id)
                .ok_or_else(|| PortError::not_found("Item", item.id))?;
            *slot = item;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn delete_item(&self, id: ItemId) -> Result<(), PortError> {
        self.mutate(move |state| {
            let before = state.items.len();
            state.items.retain(|item| item.id != id);
            if state.items.len() == before {
                return Err(PortError::not_found("Item", id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ClaimPort for JsonFileStore {
    async fn get_claim(&self, id: ClaimId) -> Result<ClaimAttempt, PortError> {
        self.state
            .read()
            .await
            .claims
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("ClaimAttempt", id))
    }

    async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<ClaimAttempt>, PortError> {
        let mut claims: Vec<_> = self
            .state
            .read()
            .await
            .claims
            .iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();
        sort_oldest_first(&mut claims);
        Ok(claims)
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn insert_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError> {
        let claim = claim.clone();
        self.mutate(move |state| {
            if state.claims.iter().any(|c| c.id == claim.id) {
                return Err(PortError::conflict(format!("Claim {} already exists", claim.id)));
            }
            state.claims.push(claim);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn save_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError> {
        let claim = claim.clone();
        self.mutate(move |state| {
            let slot = state
                .claims
                .iter_mut()
                .find(|c| c.id == claim.id)
                .ok_or_else(|| PortError::not_found("ClaimAttempt", claim.id))?;
            *slot = claim;
            Ok(())
        })
        .await
    }
}
