use thiserror::Error;

use crate::api::errors::{AccountApiError, BidFlowError, VerificationError};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl SqliteDatabaseError {
    /// True if the underlying driver error is a uniqueness-constraint violation. Used to map
    /// a lost insert race onto the same business error as the explicit duplicate check.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SqliteDatabaseError::DriverError(sqlx::Error::Database(de)) => de.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<SqliteDatabaseError> for BidFlowError {
    fn from(e: SqliteDatabaseError) -> Self {
        if e.is_unique_violation() {
            BidFlowError::DuplicateBid
        } else {
            BidFlowError::DatabaseError(e.to_string())
        }
    }
}

impl From<SqliteDatabaseError> for VerificationError {
    fn from(e: SqliteDatabaseError) -> Self {
        VerificationError::DatabaseError(e.to_string())
    }
}

impl From<SqliteDatabaseError> for AccountApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}
