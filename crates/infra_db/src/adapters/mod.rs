//! Domain Adapters
//!
//! Implementations of the domain ports over the storage backends.
//!
//! - `PostgresItemAdapter` / `PostgresClaimAdapter` translate between
//!   domain models and table rows through the repository layer
//! - `JsonFileStore` keeps both collections in memory and persists them
//!   to one JSON document
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresItemAdapter;
//! use domain_items::ItemPort;
//!
//! let adapter = PostgresItemAdapter::new(pool);
//! let item = adapter.get_item(item_id).await?;
//! ```

pub mod items;
pub mod claims;
pub mod file;

pub use items::PostgresItemAdapter;
pub use claims::PostgresClaimAdapter;
pub use file::{JsonFileStore, StoreSnapshot};

use chrono::Utc;
use sqlx::PgPool;
use std::time::Instant;

use core_kernel::{AdapterHealth, HealthCheckResult};

/// Health check shared by the PostgreSQL adapters: a `SELECT 1` round trip
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        },
        Err(e) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(format!("Database error: {}", e)),
            checked_at: Utc::now(),
        },
    }
}
