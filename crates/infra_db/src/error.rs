//! Storage error types
//!
//! This module defines the errors that can occur in the storage backends,
//! and their translation into the domain-facing `PortError`.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during storage operations
///
/// Covers both the PostgreSQL backend and the JSON file store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in storage
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing the data file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Item", "ITM-123");
    /// assert!(error.to_string().contains("Item"));
    /// ```
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a duplicate entry error
    pub fn duplicate(entity: &str, field: &str, value: impl std::fmt::Display) -> Self {
        DatabaseError::DuplicateEntry(format!(
            "{} with {} '{}' already exists",
            entity, field, value
        ))
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        DatabaseError::Io {
            path: path.into(),
            source,
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_) | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted | DatabaseError::Io { .. }
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
/// based on the PostgreSQL error code.
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::QueryFailed("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                    Some("23514") => DatabaseError::ConstraintViolation(db_err.message().to_string()),
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::SerializationError(error.to_string())
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        DatabaseError::SerializationError(error.to_string())
    }
}

/// Translates storage errors into the port error the domain sees
pub fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound { entity, id } => PortError::not_found(entity, id),
        DatabaseError::DuplicateEntry(msg) => PortError::conflict(msg),
        DatabaseError::ConstraintViolation(msg) => PortError::validation(msg),
        DatabaseError::SerializationError(msg) => PortError::transformation(msg),
        DatabaseError::ConnectionFailed(msg) => PortError::connection(msg),
        DatabaseError::PoolExhausted => PortError::Timeout {
            operation: "acquire connection".to_string(),
            duration_ms: 0,
        },
        DatabaseError::Io { path, source } => PortError::Connection {
            message: format!("Failed to access {}", path),
            source: Some(Box::new(source)),
        },
        other => PortError::internal(other.to_string()),
    }
}

impl From<DatabaseError> for PortError {
    fn from(e: DatabaseError) -> Self {
        db_to_port_error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let port = db_to_port_error(DatabaseError::not_found("Item", "ITM-1"));
        assert!(port.is_not_found());
    }

    #[test]
    fn test_io_is_connection_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let port = db_to_port_error(DatabaseError::io("/tmp/data.json", io));
        assert!(matches!(port, PortError::Connection { .. }));
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let port = db_to_port_error(DatabaseError::duplicate("Item", "id", "ITM-1"));
        assert!(matches!(port, PortError::Conflict { .. }));
    }
}
