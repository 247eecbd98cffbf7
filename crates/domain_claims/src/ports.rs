//! Claims Domain Ports
//!
//! The `ClaimPort` trait defines the storage operations the claims domain
//! needs. Claim attempts are never deleted, so the port has no delete.

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, ItemId, PortError, UserId};
use domain_items::ClaimReferences;

use crate::claim::{ClaimAttempt, ClaimStatus};

/// Query parameters for finding claims
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    pub item_id: Option<ItemId>,
    pub claimant_id: Option<UserId>,
    /// Accepted statuses; empty accepts all
    pub statuses: Vec<ClaimStatus>,
}

impl ClaimQuery {
    /// Claims on one item
    pub fn for_item(item_id: ItemId) -> Self {
        Self {
            item_id: Some(item_id),
            ..Default::default()
        }
    }

    /// Claims submitted by one user
    pub fn by_claimant(claimant_id: UserId) -> Self {
        Self {
            claimant_id: Some(claimant_id),
            ..Default::default()
        }
    }

    /// Every pending claim
    pub fn pending() -> Self {
        Self::default().with_statuses([ClaimStatus::Pending])
    }

    pub fn with_claimant(mut self, claimant_id: UserId) -> Self {
        self.claimant_id = Some(claimant_id);
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ClaimStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn matches(&self, claim: &ClaimAttempt) -> bool {
        self.item_id.map_or(true, |id| claim.item_id == id)
            && self.claimant_id.map_or(true, |id| claim.claimant_id == id)
            && (self.statuses.is_empty() || self.statuses.contains(&claim.status))
    }
}

/// Sorts claims oldest first, the order reviewers work through them
pub fn sort_oldest_first(claims: &mut [ClaimAttempt]) {
    claims.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}

/// The main port trait for claim storage
#[async_trait]
pub trait ClaimPort: DomainPort + HealthCheckable {
    /// Retrieves a claim by ID, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<ClaimAttempt, PortError>;

    /// Finds claims matching the query, oldest first
    async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<ClaimAttempt>, PortError>;

    /// Stores a new claim
    async fn insert_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError>;

    /// Replaces a stored claim
    async fn save_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError>;
}

/// Answers the item domain's "has this item been claimed" question from
/// a claim store
#[derive(Clone)]
pub struct ClaimPortReferences(Arc<dyn ClaimPort>);

impl ClaimPortReferences {
    pub fn new(claims: Arc<dyn ClaimPort>) -> Self {
        Self(claims)
    }
}

#[async_trait]
impl ClaimReferences for ClaimPortReferences {
    async fn has_claims(&self, item_id: ItemId) -> Result<bool, PortError> {
        let claims = self.0.find_claims(&ClaimQuery::for_item(item_id)).await?;
        Ok(!claims.is_empty())
    }
}

/// In-memory claim store
#[cfg(any(test, feature = "memory"))]
pub mod memory {
    use super::*;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory implementation of ClaimPort
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimPort {
        claims: Arc<RwLock<Vec<ClaimAttempt>>>,
    }

    impl InMemoryClaimPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims for testing
        pub async fn with_claims(claims: Vec<ClaimAttempt>) -> Self {
            let port = Self::new();
            port.claims.write().await.extend(claims);
            port
        }

        pub async fn all(&self) -> Vec<ClaimAttempt> {
            self.claims.read().await.clone()
        }
    }

    impl DomainPort for InMemoryClaimPort {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("memory-claim-port")
        }
    }

    #[async_trait]
    impl ClaimPort for InMemoryClaimPort {
        async fn get_claim(&self, id: ClaimId) -> Result<ClaimAttempt, PortError> {
            self.claims
                .read()
                .await
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ClaimAttempt", id))
        }

        async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<ClaimAttempt>, PortError> {
            let mut found: Vec<_> = self
                .claims
                .read()
                .await
                .iter()
                .filter(|c| query.matches(c))
                .cloned()
                .collect();
            sort_oldest_first(&mut found);
            Ok(found)
        }

        async fn insert_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            if claims.iter().any(|c| c.id == claim.id) {
                return Err(PortError::conflict(format!("Claim {} already exists", claim.id)));
            }
            claims.push(claim.clone());
            Ok(())
        }

        async fn save_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let slot = claims
                .iter_mut()
                .find(|c| c.id == claim.id)
                .ok_or_else(|| PortError::not_found("ClaimAttempt", claim.id))?;
            *slot = claim.clone();
            Ok(())
        }
    }
}
