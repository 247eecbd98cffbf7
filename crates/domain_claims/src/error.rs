//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, ItemId, PortError};
use domain_items::{ItemError, ItemStatus};
use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("Invalid claim status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    #[error("Item is {status} and can no longer be claimed")]
    ItemNotClaimable { status: ItemStatus },

    #[error("One or more answers are incorrect. Please try again.")]
    IncorrectAnswers,

    #[error("You already have an active claim on this item")]
    DuplicateClaim,

    #[error(transparent)]
    Item(ItemError),

    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl ClaimError {
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClaimError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ClaimError::Unauthorized(message.into())
    }

    /// Maps a port error from an item lookup
    pub fn item_lookup(error: PortError, id: ItemId) -> Self {
        if error.is_not_found() {
            ClaimError::ItemNotFound(id)
        } else {
            ClaimError::Storage(error)
        }
    }

    /// Maps a port error from a claim lookup
    pub fn claim_lookup(error: PortError, id: ClaimId) -> Self {
        if error.is_not_found() {
            ClaimError::ClaimNotFound(id)
        } else {
            ClaimError::Storage(error)
        }
    }
}

impl From<PortError> for ClaimError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Validation { field, message } => ClaimError::Validation { field, message },
            other => ClaimError::Storage(other),
        }
    }
}

impl From<ItemError> for ClaimError {
    fn from(error: ItemError) -> Self {
        match error {
            ItemError::NotFound(id) => ClaimError::ItemNotFound(id),
            ItemError::Storage(e) => ClaimError::Storage(e),
            other => ClaimError::Item(other),
        }
    }
}
