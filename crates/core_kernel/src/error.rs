//! Errors raised by kernel value types

use thiserror::Error;

/// Failure to interpret a kernel value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A role name other than `user` or `admin`
    #[error("Invalid role: {0}")]
    InvalidRole(String),
}
