//! Items repository implementation
//!
//! Row-level access to the `items` table. Verification questions live in
//! a JSONB column and are decoded by the adapter.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Item status as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "item_status", rename_all = "lowercase")]
pub enum ItemStatus {
    Found,
    Lost,
    Claimed,
    Matched,
    Returned,
}

/// One row of the `items` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    pub item_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub date_found: Option<DateTime<Utc>>,
    pub date_lost: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    pub reported_by: Uuid,
    pub reporter_name: String,
    pub reporter_contact: String,
    pub image_url: Option<String>,
    /// JSON array of `{id, question, answer}`
    pub questions: serde_json::Value,
    pub claimed_by: Option<Uuid>,
    pub returned_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter for item listings
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Status literals; empty accepts all
    pub statuses: Vec<String>,
    pub reported_by: Option<Uuid>,
    pub category: Option<String>,
    /// Already wrapped in `%` and escaped for ILIKE
    pub search_pattern: Option<String>,
    pub limit: Option<i64>,
    pub offset: i64,
}

const SELECT_ITEMS: &str = r"
    SELECT
        item_id, name, description, category, location,
        date_found, date_lost, status, reported_by,
        reporter_name, reporter_contact, image_url, questions,
        claimed_by, returned_date, created_at, updated_at
    FROM items
";

/// Repository for the `items` table
#[derive(Debug, Clone)]
pub struct ItemsRepository {
    pool: PgPool,
}

impl ItemsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves an item row by its identifier
    pub async fn get_by_id(&self, item_id: Uuid) -> Result<ItemRow, DatabaseError> {
        let sql = format!("{SELECT_ITEMS} WHERE item_id = $1");
        sqlx::query_as::<_, ItemRow>(&sql)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Item", item_id))
    }

    /// Lists rows matching the filter, newest first
    pub async fn find(&self, filter: &ItemFilter) -> Result<Vec<ItemRow>, DatabaseError> {
        let sql = format!(
            r"{SELECT_ITEMS}
            WHERE (cardinality($1::text[]) = 0 OR status::text = ANY($1))
              AND ($2::uuid IS NULL OR reported_by = $2)
              AND ($3::text IS NULL OR lower(trim(category)) = lower($3))
              AND ($4::text IS NULL
                   OR name ILIKE $4 OR description ILIKE $4
                   OR category ILIKE $4 OR location ILIKE $4)
            ORDER BY created_at DESC, item_id DESC
            LIMIT $5 OFFSET $6"
        );

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(&filter.statuses)
            .bind(filter.reported_by)
            .bind(filter.category.as_deref())
            .bind(filter.search_pattern.as_deref())
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Inserts a new item row
    pub async fn insert(&self, row: &ItemRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO items (
                item_id, name, description, category, location,
                date_found, date_lost, status, reported_by,
                reporter_name, reporter_contact, image_url, questions,
                claimed_by, returned_date, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17
            )
            ",
        )
        .bind(row.item_id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.category)
        .bind(&row.location)
        .bind(row.date_found)
        .bind(row.date_lost)
        .bind(row.status)
        .bind(row.reported_by)
        .bind(&row.reporter_name)
        .bind(&row.reporter_contact)
        .bind(row.image_url.as_deref())
        .bind(&row.questions)
        .bind(row.claimed_by)
        .bind(row.returned_date)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites every mutable column of an existing row
    pub async fn update(&self, row: &ItemRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r"
            UPDATE items SET
                name = $2, description = $3, category = $4, location = $5,
                date_found = $6, date_lost = $7, status = $8,
                reporter_name = $9, reporter_contact = $10, image_url = $11,
                questions = $12, claimed_by = $13, returned_date = $14,
                updated_at = $15
            WHERE item_id = $1
            ",
        )
        .bind(row.item_id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.category)
        .bind(&row.location)
        .bind(row.date_found)
        .bind(row.date_lost)
        .bind(row.status)
        .bind(&row.reporter_name)
        .bind(&row.reporter_contact)
        .bind(row.image_url.as_deref())
        .bind(&row.questions)
        .bind(row.claimed_by)
        .bind(row.returned_date)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Item", row.item_id));
        }
        Ok(())
    }

    /// Hard-deletes a row
    pub async fn delete(&self, item_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Item", item_id));
        }
        Ok(())
    }
}

/// Wraps free text for a contains-style ILIKE match, escaping wildcards
pub fn ilike_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
