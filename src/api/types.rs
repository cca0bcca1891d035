//! Shared state for the explorer API layer.

use std::sync::Arc;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::config::ExplorerConfig;
use crate::db::{open_database, open_document_database};
use crate::documents::SqliteDocumentStore;

/// Shared context for all API routes. Each request opens its own
/// read-only connections; nothing is cached between requests.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<ExplorerConfig>,
}

impl ApiContext {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn open_db(&self) -> Result<Connection, ApiError> {
        open_database(&self.config.database_path).map_err(|e| {
            ApiError::Internal(format!(
                "cannot open clinical store {}: {e}",
                self.config.database_path.display()
            ))
        })
    }

    pub fn open_documents(&self) -> Result<SqliteDocumentStore, ApiError> {
        open_document_database(&self.config.documents_path)
            .map(SqliteDocumentStore::new)
            .map_err(|e| {
                ApiError::Internal(format!(
                    "cannot open document store {}: {e}",
                    self.config.documents_path.display()
                ))
            })
    }
}
