use crate::db::error::DbError;
use crate::error::DomainError;
use crate::models::types::UserId;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// ServiceError represents errors that can occur in the service layer of the application.
/// Lookup and metadata write failures are fatal to the requested operation. Audit log
/// failures never show up here; they are logged and swallowed by the service.
///
/// Wraps lower-level errors to provide a consistent error handling mechanism across the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: UserId },

    #[error("user not found: {source}")]
    UserLookup {
        user_id: UserId,
        #[source]
        source: DbError,
    },

    #[error("metadata update failed: {source}")]
    MetadataUpdateFailed {
        user_id: UserId,
        #[source]
        source: DbError,
    },

    #[error("unknown caller: {0}")]
    UnknownCaller(UserId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Database(#[from] DbError),
}
