//! Item Domain
//!
//! This crate implements the reported-item side of the lost-and-found
//! system: found and lost reports, their verification questions, listings
//! and dashboard counts, and the heuristic matcher that pairs lost reports
//! with found ones.
//!
//! # Item Lifecycle
//!
//! ```text
//! Found -> Claimed -> Returned
//! Lost  -> Matched
//! ```

pub mod item;
pub mod validation;
pub mod matching;
pub mod query;
pub mod ports;
pub mod services;
pub mod error;

pub use item::{
    Item, ItemStatus, ItemKind, Question, NewQuestion,
    ReportFoundItem, ReportLostItem, UpdateItemRequest,
};
pub use validation::ItemValidator;
pub use matching::{check_for_matches, is_potential_match};
pub use query::{ItemQuery, ItemStats, StatusCounts, CategoryCount};
pub use ports::{ItemPort, ClaimReferences};
pub use services::{ItemService, ReportOutcome};
pub use error::ItemError;
