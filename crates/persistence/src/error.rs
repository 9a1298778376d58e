// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bus_station::CoreError;
use bus_station_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested session was not found.
    SessionNotFound(String),
    /// User cannot be deleted because tickets reference it.
    UserReferenced { user_id: i64 },
    /// The requested resource was not found.
    NotFound(String),
    /// An engine rule rejected the operation inside a transaction.
    ///
    /// The transaction has already been rolled back when this is returned.
    Rejected(CoreError),
    /// The store aborted the transaction to keep concurrent writers
    /// serializable (for example an `InnoDB` deadlock). Retrying may succeed.
    SerializationConflict(String),
    /// A general error occurred.
    Other(String),
}

impl PersistenceError {
    /// Builds the error used when a stored row cannot be mapped to the domain.
    pub(crate) fn corrupt(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Rejected(CoreError::DataIntegrity(format!("{context}: {err}")))
    }

    /// Whether the whole transaction can be run again unchanged.
    #[must_use]
    pub const fn is_serialization_conflict(&self) -> bool {
        matches!(self, Self::SerializationConflict(_))
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::SessionNotFound(msg) => write!(f, "Session not found: {msg}"),
            Self::UserReferenced { user_id } => {
                write!(
                    f,
                    "User {user_id} cannot be deleted: referenced by sold tickets"
                )
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Rejected(err) => write!(f, "{err}"),
            Self::SerializationConflict(msg) => {
                write!(f, "Transaction aborted by a concurrent writer: {msg}")
            }
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                info,
            ) => Self::SerializationConflict(info.message().to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Rejected(CoreError::Validation(err))
    }
}
