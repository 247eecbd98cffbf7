//! PostgreSQL Item Adapter
//!
//! Implements `ItemPort` on top of `ItemsRepository`, translating between
//! `Item` and `ItemRow` and mapping database errors to port errors.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, ItemId, PortError, UserId};
use domain_items::{Item, ItemPort, ItemQuery, ItemStatus, Question};

use crate::adapters::ping;
use crate::error::db_to_port_error;
use crate::repositories::items::{
    ilike_pattern, ItemFilter, ItemRow, ItemStatus as DbItemStatus, ItemsRepository,
};

/// PostgreSQL-backed implementation of the ItemPort trait
#[derive(Debug, Clone)]
pub struct PostgresItemAdapter {
    repository: ItemsRepository,
    pool: PgPool,
}

impl PostgresItemAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ItemsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &ItemsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresItemAdapter {}

#[async_trait]
impl HealthCheckable for PostgresItemAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-item-adapter").await
    }
}

#[async_trait]
impl ItemPort for PostgresItemAdapter {
    #[instrument(skip(self), fields(item_id = %id))]
    async fn get_item(&self, id: ItemId) -> Result<Item, PortError> {
        debug!("Fetching item by ID");
        let row = self
            .repository
            .get_by_id(id.into())
            .await
            .map_err(db_to_port_error)?;
        row_to_item(row)
    }

    #[instrument(skip(self))]
    async fn find_items(&self, query: &ItemQuery) -> Result<Vec<Item>, PortError> {
        let filter = ItemFilter {
            statuses: query.statuses.iter().map(|s| s.as_str().to_string()).collect(),
            reported_by: query.reported_by.map(Into::into),
            category: query
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            search_pattern: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ilike_pattern),
            limit: query.limit.map(|l| l.min(i64::MAX as usize) as i64),
            offset: query.offset.min(i64::MAX as usize) as i64,
        };

        let rows = self.repository.find(&filter).await.map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Found items");
        rows.into_iter().map(row_to_item).collect()
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn insert_item(&self, item: &Item) -> Result<(), PortError> {
        let row = item_to_row(item)?;
        self.repository.insert(&row).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn save_item(&self, item: &Item) -> Result<(), PortError> {
        let row = item_to_row(item)?;
        self.repository.update(&row).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn delete_item(&self, id: ItemId) -> Result<(), PortError> {
        self.repository.delete(id.into()).await.map_err(db_to_port_error)
    }
}

fn db_status(status: ItemStatus) -> DbItemStatus {
    match status {
        ItemStatus::Found => DbItemStatus::Found,
        ItemStatus::Lost => DbItemStatus::Lost,
        ItemStatus::Claimed => DbItemStatus::Claimed,
        ItemStatus::Matched => DbItemStatus::Matched,
        ItemStatus::Returned => DbItemStatus::Returned,
    }
}

fn domain_status(status: DbItemStatus) -> ItemStatus {
    match status {
        DbItemStatus::Found => ItemStatus::Found,
        DbItemStatus::Lost => ItemStatus::Lost,
        DbItemStatus::Claimed => ItemStatus::Claimed,
        DbItemStatus::Matched => ItemStatus::Matched,
        DbItemStatus::Returned => ItemStatus::Returned,
    }
}

/// Converts a domain item to its table row
pub(crate) fn item_to_row(item: &Item) -> Result<ItemRow, PortError> {
    let questions = serde_json::to_value(&item.questions)
        .map_err(|e| PortError::transformation(format!("Failed to encode questions: {}", e)))?;

    Ok(ItemRow {
        item_id: item.id.into(),
        name: item.name.clone(),
        description: item.description.clone(),
        category: item.category.clone(),
        location: item.location.clone(),
        date_found: item.date_found,
        date_lost: item.date_lost,
        status: db_status(item.status),
        reported_by: item.reported_by.into(),
        reporter_name: item.reporter_name.clone(),
        reporter_contact: item.reporter_contact.clone(),
        image_url: item.image_url.clone(),
        questions,
        claimed_by: item.claimed_by.map(Into::into),
        returned_date: item.returned_date,
        created_at: item.created_at,
        updated_at: item.updated_at,
    })
}

/// Converts a table row back to a domain item
pub(crate) fn row_to_item(row: ItemRow) -> Result<Item, PortError> {
    let questions: Vec<Question> = serde_json::from_value(row.questions).map_err(|e| {
        PortError::transformation(format!("Malformed questions on item {}: {}", row.item_id, e))
    })?;

    Ok(Item {
        id: ItemId::from(row.item_id),
        name: row.name,
        description: row.description,
        category: row.category,
        location: row.location,
        date_found: row.date_found,
        date_lost: row.date_lost,
        status: domain_status(row.status),
        reported_by: UserId::from(row.reported_by),
        reporter_name: row.reporter_name,
        reporter_contact: row.reporter_contact,
        image_url: row.image_url,
        questions,
        claimed_by: row.claimed_by.map(UserId::from),
        returned_date: row.returned_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_item() -> Item {
        let now = Utc::now();
        Item {
            id: ItemId::new_v7(),
            name: "Water Bottle".to_string(),
            description: "Steel".to_string(),
            category: "Personal Items".to_string(),
            location: "Library".to_string(),
            date_found: Some(now),
            date_lost: None,
            status: ItemStatus::Claimed,
            reported_by: UserId::new_v7(),
            reporter_name: "Finder".to_string(),
            reporter_contact: "finder@campus.edu".to_string(),
            image_url: None,
            questions: vec![Question::new("Color?", "Blue"), Question::new("Sticker?", "Cat")],
            claimed_by: Some(UserId::new_v7()),
            returned_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_conversion_preserves_item() {
        let item = sample_item();
        let row = item_to_row(&item).unwrap();

        assert_eq!(row.status, DbItemStatus::Claimed);
        assert!(row.questions.is_array());
        assert_eq!(row_to_item(row).unwrap(), item);
    }

    #[test]
    fn test_malformed_questions_is_transformation_error() {
        let mut row = item_to_row(&sample_item()).unwrap();
        row.questions = serde_json::json!({"not": "an array"});

        assert!(matches!(row_to_item(row), Err(PortError::Transformation { .. })));
    }
}
