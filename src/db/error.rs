use thiserror::Error;

/// Postgres SQLSTATE codes the store maps to domain outcomes.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,

    #[error("Conflicting record")]
    Conflict,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return DatabaseError::NotFound;
        }
        let (code, message) = match err.as_database_error() {
            Some(db) => (db.code().map(|c| c.into_owned()), db.message().to_string()),
            None => return DatabaseError::Sqlx(err),
        };
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => DatabaseError::Duplicate,
            Some(EXCLUSION_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => DatabaseError::Conflict,
            Some(CHECK_VIOLATION) => DatabaseError::InvalidInput(message),
            _ => DatabaseError::Sqlx(err),
        }
    }
}
