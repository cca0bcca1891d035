pub mod document_db;
pub mod sqlite;

pub use document_db::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store access failed on {relation}: {source}")]
    StoreAccess {
        relation: String,
        source: rusqlite::Error,
    },

    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Malformed document in {collection}: {reason}")]
    MalformedDocument { collection: String, reason: String },
}

impl DatabaseError {
    pub fn invalid_argument(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Tags a rusqlite failure with the relation that was being queried.
pub(crate) fn store_access(
    relation: &str,
) -> impl FnOnce(rusqlite::Error) -> DatabaseError + '_ {
    move |source| DatabaseError::StoreAccess {
        relation: relation.to_string(),
        source,
    }
}
