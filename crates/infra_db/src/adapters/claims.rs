//! PostgreSQL Claim Adapter
//!
//! Implements `ClaimPort` on top of `ClaimsRepository`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, DomainPort, HealthCheckResult, HealthCheckable, ItemId, PortError, UserId};
use domain_claims::{ClaimAnswer, ClaimAttempt, ClaimPort, ClaimQuery, ClaimStatus};

use crate::adapters::ping;
use crate::error::db_to_port_error;
use crate::repositories::claims::{
    ClaimAttemptRow, ClaimFilter, ClaimStatus as DbClaimStatus, ClaimsRepository,
};

/// PostgreSQL-backed implementation of the ClaimPort trait
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-claim-adapter").await
    }
}

#[async_trait]
impl ClaimPort for PostgresClaimAdapter {
    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim(&self, id: ClaimId) -> Result<ClaimAttempt, PortError> {
        let row = self
            .repository
            .get_by_id(id.into())
            .await
            .map_err(db_to_port_error)?;
        row_to_claim(row)
    }

    #[instrument(skip(self))]
    async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<ClaimAttempt>, PortError> {
        let filter = ClaimFilter {
            item_id: query.item_id.map(Into::into),
            claimant_id: query.claimant_id.map(Into::into),
            statuses: query.statuses.iter().map(|s| s.as_str().to_string()).collect(),
        };
        let rows = self.repository.find(&filter).await.map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Found claims");
        rows.into_iter().map(row_to_claim).collect()
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id, item_id = %claim.item_id))]
    async fn insert_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError> {
        let row = claim_to_row(claim)?;
        self.repository.insert(&row).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn save_claim(&self, claim: &ClaimAttempt) -> Result<(), PortError> {
        let row = claim_to_row(claim)?;
        self.repository.update_review(&row).await.map_err(db_to_port_error)
    }
}

fn db_status(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Pending => DbClaimStatus::Pending,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

fn domain_status(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Pending => ClaimStatus::Pending,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}

pub(crate) fn claim_to_row(claim: &ClaimAttempt) -> Result<ClaimAttemptRow, PortError> {
    let answers = serde_json::to_value(&claim.answers)
        .map_err(|e| PortError::transformation(format!("Failed to encode answers: {}", e)))?;

    Ok(ClaimAttemptRow {
        claim_id: claim.id.into(),
        item_id: claim.item_id.into(),
        claimant_id: claim.claimant_id.into(),
        claimant_name: claim.claimant_name.clone(),
        answers,
        status: db_status(claim.status),
        reporter_response: claim.reporter_response.clone(),
        created_at: claim.created_at,
        updated_at: claim.updated_at,
    })
}

pub(crate) fn row_to_claim(row: ClaimAttemptRow) -> Result<ClaimAttempt, PortError> {
    let answers: Vec<ClaimAnswer> = serde_json::from_value(row.answers).map_err(|e| {
        PortError::transformation(format!("Malformed answers on claim {}: {}", row.claim_id, e))
    })?;

    Ok(ClaimAttempt {
        id: ClaimId::from(row.claim_id),
        item_id: ItemId::from(row.item_id),
        claimant_id: UserId::from(row.claimant_id),
        claimant_name: row.claimant_name,
        answers,
        status: domain_status(row.status),
        reporter_response: row.reporter_response,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
