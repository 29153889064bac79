//! Error types for storage access and import runs.

use vhc_core::error::CoreError;
use vhc_core::types::DbId;

use crate::collaborators::{CredentialError, FetchError};

/// Failure reported by an [`ImportStore`](crate::store::ImportStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("Duplicate value violates unique constraint: {0}")]
    Conflict(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<sqlx::Error> for StoreError {
    /// PostgreSQL unique violations (SQLSTATE 23505) become
    /// [`StoreError::Conflict`]; everything else is passed through.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return Self::Conflict(constraint);
            }
        }
        Self::Database(err)
    }
}

/// Failure of an import step.
///
/// `Configuration` and `ExternalService` abort the whole batch; `Validation`
/// and `Storage` raised while processing a booking only fail that booking.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Dealer system error: {0}")]
    ExternalService(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<CredentialError> for ImportError {
    fn from(err: CredentialError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<FetchError> for ImportError {
    fn from(err: FetchError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

impl From<CoreError> for ImportError {
    fn from(err: CoreError) -> Self {
        Self::Configuration(err.to_string())
    }
}
