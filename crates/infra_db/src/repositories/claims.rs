//! Claims repository implementation
//!
//! Row-level access to the `claim_attempts` table. Answers are stored as
//! a JSONB array of `{questionId, answer}`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Claim status as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

/// One row of the `claim_attempts` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimAttemptRow {
    pub claim_id: Uuid,
    pub item_id: Uuid,
    pub claimant_id: Uuid,
    pub claimant_name: String,
    pub answers: serde_json::Value,
    pub status: ClaimStatus,
    pub reporter_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter for claim listings
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub item_id: Option<Uuid>,
    pub claimant_id: Option<Uuid>,
    /// Status literals; empty accepts all
    pub statuses: Vec<String>,
}

/// Repository for managing claim attempts
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimAttemptRow, DatabaseError> {
        sqlx::query_as::<_, ClaimAttemptRow>(
            r"
            SELECT
                claim_id, item_id, claimant_id, claimant_name, answers,
                status, reporter_response, created_at, updated_at
            FROM claim_attempts
            WHERE claim_id = $1
            ",
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("ClaimAttempt", claim_id))
    }

    /// Lists claims matching the filter, oldest first
    pub async fn find(&self, filter: &ClaimFilter) -> Result<Vec<ClaimAttemptRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClaimAttemptRow>(
            r"
            SELECT
                claim_id, item_id, claimant_id, claimant_name, answers,
                status, reporter_response, created_at, updated_at
            FROM claim_attempts
            WHERE ($1::uuid IS NULL OR item_id = $1)
              AND ($2::uuid IS NULL OR claimant_id = $2)
              AND (cardinality($3::text[]) = 0 OR status::text = ANY($3))
            ORDER BY created_at ASC, claim_id ASC
            ",
        )
        .bind(filter.item_id)
        .bind(filter.claimant_id)
        .bind(&filter.statuses)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new claim
    ///
    /// The partial unique index on active claims turns a second active
    /// claim by the same user into `DuplicateEntry`.
    pub async fn insert(&self, row: &ClaimAttemptRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO claim_attempts (
                claim_id, item_id, claimant_id, claimant_name, answers,
                status, reporter_response, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(row.claim_id)
        .bind(row.item_id)
        .bind(row.claimant_id)
        .bind(&row.claimant_name)
        .bind(&row.answers)
        .bind(row.status)
        .bind(row.reporter_response.as_deref())
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stores a review outcome
    pub async fn update_review(&self, row: &ClaimAttemptRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r"
            UPDATE claim_attempts
            SET status = $2, reporter_response = $3, updated_at = $4
            WHERE claim_id = $1
            ",
        )
        .bind(row.claim_id)
        .bind(row.status)
        .bind(row.reporter_response.as_deref())
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("ClaimAttempt", row.claim_id));
        }
        Ok(())
    }
}
