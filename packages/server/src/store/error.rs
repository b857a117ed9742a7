use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    /// A unique constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist.
    #[error("Referenced row does not exist: {0}")]
    Referential(String),

    #[error("Invalid specification: {0}")]
    InvalidSpecification(String),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

impl StoreError {
    /// Translate constraint violations raised by an insert into distinguishable kinds.
    pub(crate) fn from_insert(err: DbErr, what: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violated on {what} insert: {detail}");
                Self::Conflict(format!("{what} already exists"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::debug!("Foreign key violated on {what} insert: {detail}");
                Self::Referential(format!("{what} references a missing row"))
            }
            _ => Self::Db(err),
        }
    }
}
