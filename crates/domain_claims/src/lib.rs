//! Claims Domain
//!
//! This crate implements claim attempts against found items: submitting
//! answers to the reporter's verification questions, comparing them with
//! the expected answers, and the reviewer decision that binds an item to
//! its owner.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Pending -> Approved   (item: Found -> Claimed)
//! Pending -> Rejected   (item unchanged)
//! ```
//!
//! In auto-verify mode a claim with all answers correct is recorded as
//! approved immediately and the pending step is skipped.

pub mod claim;
pub mod verification;
pub mod review;
pub mod ports;
pub mod services;
pub mod error;

pub use claim::{ClaimAttempt, ClaimStatus, ClaimAnswer};
pub use verification::{verify_answers, compare_answers, AnswerComparison};
pub use review::{ReviewDecision, ReviewSheet};
pub use ports::{ClaimPort, ClaimQuery, ClaimPortReferences};
pub use services::{ClaimService, ClaimMode, ClaimOutcome, SubmitClaim};
pub use error::ClaimError;
