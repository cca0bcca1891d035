//! Document store database — discharge notes and ECG machine measurements.
//!
//! Kept in its own SQLite file with its own migration chain, separate from
//! the relational clinical store. Bodies are JSON; the lookup keys are
//! lifted into columns at insert time.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::DatabaseError;

/// Open an existing document store read-only.
pub fn open_document_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.execute_batch("PRAGMA query_only=ON;")?;
    Ok(conn)
}

/// Create (or upgrade) a document store on disk.
pub fn create_document_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=DELETE;")?;
    run_document_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory document store (for testing).
pub fn open_memory_document_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    run_document_migrations(&conn)?;
    Ok(conn)
}

/// Separate migration chain from the clinical store: the document database
/// has its own schema_version table and numbering.
fn run_document_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/document_migrations/001_documents.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running document migration v{version}");
            conn.execute_batch(sql).map_err(|e| {
                DatabaseError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                }
            })?;
        }
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}
