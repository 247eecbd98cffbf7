//! Repository implementations for the lost-and-found tables
//!
//! Repositories own the SQL and map rows to plain structs; the adapters
//! convert those rows to domain types. Queries are built at runtime with
//! `sqlx::query_as`, so the crate compiles without a live database.

pub mod items;
pub mod claims;

pub use items::ItemsRepository;
pub use claims::ClaimsRepository;
