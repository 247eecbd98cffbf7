//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! lost-and-found test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built users, dates, questions and reports
//! - `builders`: Builder patterns for items and claim attempts
//! - `database`: PostgreSQL test container management
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based and fake-data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
