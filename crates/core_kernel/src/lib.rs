//! Core Kernel - Foundational types shared by the lost-and-found crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for items, claims, questions and users
//! - User accounts, roles and the acting principal of a request
//! - Port infrastructure (error type, marker traits, health checks)

pub mod identifiers;
pub mod user;
pub mod ports;
pub mod error;

pub use identifiers::{ItemId, ClaimId, QuestionId, UserId};
pub use user::{User, UserRole, Actor};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
