//! Infrastructure Storage Layer
//!
//! Storage backends for the lost-and-found domain ports:
//!
//! - **PostgreSQL**: items and claim attempts in relational tables, with
//!   verification questions and answers as JSONB documents
//! - **JSON file**: both collections held in memory and written to a
//!   single document after every change
//!
//! The in-memory adapters used by tests live with their ports in the
//! domain crates.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresItemAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/lost_found")).await?;
//! run_migrations(&pool).await?;
//! let items = PostgresItemAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, DatabaseConfig, create_pool, run_migrations};
pub use error::{DatabaseError, db_to_port_error};
pub use adapters::{PostgresItemAdapter, PostgresClaimAdapter, JsonFileStore, StoreSnapshot};
