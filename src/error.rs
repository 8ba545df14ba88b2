// Crate-wide error taxonomy
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required field was blank or missing. The operation wrote nothing.
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    /// A referenced id does not exist. The operation wrote nothing.
    #[error("{entity} not found: id {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Export was asked for a table this store does not manage.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn validation(field: &'static str) -> Self {
        Error::Validation { field }
    }

    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Error::NotFound { entity, id }
    }
}
