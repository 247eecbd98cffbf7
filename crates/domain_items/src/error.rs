//! Item domain errors

use thiserror::Error;

use core_kernel::{ItemId, PortError};
use crate::item::ItemStatus;

/// Errors that can occur in the item domain
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ItemStatus, to: ItemStatus },

    #[error("Verification questions cannot be changed once a claim has been submitted")]
    QuestionsLocked,

    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl ItemError {
    pub fn validation(message: impl Into<String>) -> Self {
        ItemError::Validation {
            field: None,
            message: message.into(),
        }
    }

    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ItemError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ItemError::Unauthorized(message.into())
    }

    /// Maps a port error for a lookup of `id`, turning a missing record
    /// into [`ItemError::NotFound`]
    pub fn from_lookup(error: PortError, id: ItemId) -> Self {
        if error.is_not_found() {
            ItemError::NotFound(id)
        } else {
            ItemError::Storage(error)
        }
    }
}

impl From<PortError> for ItemError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Validation { field, message } => ItemError::Validation { field, message },
            other => ItemError::Storage(other),
        }
    }
}
