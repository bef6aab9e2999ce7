use sea_orm::DbErr;
use thiserror::Error;

use models::errors::{db_error, ModelError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// True for errors caused by the request rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Model(ModelError::Validation(_)) | Self::Model(ModelError::Conflict(_))
        )
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match db_error(e) {
            ModelError::Db(msg) => Self::Db(msg),
            other => Self::Model(other),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self { Self::Storage(e.to_string()) }
}
