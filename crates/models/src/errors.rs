use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

/// Classify a driver error: constraint violations are the client's fault, the rest is ours.
pub fn db_error(e: DbErr) -> ModelError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::Conflict(unique_message(&msg)),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ModelError::Validation("referenced record does not exist".into())
        }
        _ => ModelError::Db(e.to_string()),
    }
}

fn unique_message(raw: &str) -> String {
    if raw.contains("username") {
        "username already exists".into()
    } else if raw.contains("name") {
        "name already exists".into()
    } else {
        "record already exists".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_message_names_the_column() {
        assert_eq!(unique_message("duplicate key value violates unique constraint \"user_username_key\""), "username already exists");
        assert_eq!(unique_message("UNIQUE constraint failed: location.name"), "name already exists");
        assert_eq!(unique_message("whatever"), "record already exists");
    }

    #[test]
    fn plain_errors_stay_db_errors() {
        let err = db_error(DbErr::Custom("boom".into()));
        assert!(matches!(err, ModelError::Db(_)));
    }
}
