//! Route handlers

pub mod items;
pub mod claims;
pub mod auth;
pub mod health;
