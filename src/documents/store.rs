use rusqlite::types::ToSql;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::db::{store_access, DatabaseError};
use super::types::*;

const DOCUMENTS_TABLE: &str = "documents";

/// Document lookup abstraction (allows mocking for tests)
pub trait DocumentStore {
    /// Raw documents of one collection matching the filter, in insertion order.
    fn find(
        &self,
        collection: DocumentCollection,
        filter: &DocumentFilter,
    ) -> Result<Vec<Value>, DatabaseError>;

    fn discharge_notes(
        &self,
        subject_id: i64,
        hadm_id: i64,
    ) -> Result<Vec<DischargeNote>, DatabaseError> {
        let collection = DocumentCollection::Discharge;
        let docs = self.find(collection, &DocumentFilter::admission(subject_id, hadm_id))?;
        decode_all(collection, docs)
    }

    fn ecg_measurements(
        &self,
        subject_id: i64,
        study_id: i64,
    ) -> Result<Vec<EcgMeasurement>, DatabaseError> {
        let collection = DocumentCollection::MachineMeasurement;
        let docs = self.find(collection, &DocumentFilter::study(subject_id, study_id))?;
        decode_all(collection, docs)
    }
}

fn decode_all<T: DeserializeOwned>(
    collection: DocumentCollection,
    docs: Vec<Value>,
) -> Result<Vec<T>, DatabaseError> {
    docs.into_iter()
        .map(|doc| {
            serde_json::from_value(doc).map_err(|e| DatabaseError::MalformedDocument {
                collection: collection.as_str().to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// SQLite-backed document store: JSON bodies with their lookup keys lifted
/// into indexed columns.
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Stores one document. The body must be a JSON object carrying an
    /// integer `subject_id`; `hadm_id` and `study_id` are optional.
    pub fn insert(
        &self,
        collection: DocumentCollection,
        body: &Value,
    ) -> Result<(), DatabaseError> {
        let malformed = |reason: &str| DatabaseError::MalformedDocument {
            collection: collection.as_str().to_string(),
            reason: reason.to_string(),
        };

        let object = body.as_object().ok_or_else(|| malformed("not a JSON object"))?;
        let subject_id = object
            .get("subject_id")
            .and_then(Value::as_i64)
            .ok_or_else(|| malformed("missing integer subject_id"))?;
        let hadm_id = object.get("hadm_id").and_then(Value::as_i64);
        let study_id = object.get("study_id").and_then(Value::as_i64);

        self.conn
            .execute(
                "INSERT INTO documents (collection, subject_id, hadm_id, study_id, body)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    collection.as_str(),
                    subject_id,
                    hadm_id,
                    study_id,
                    body.to_string()
                ],
            )
            .map_err(store_access(DOCUMENTS_TABLE))?;
        Ok(())
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn find(
        &self,
        collection: DocumentCollection,
        filter: &DocumentFilter,
    ) -> Result<Vec<Value>, DatabaseError> {
        let mut sql = String::from(
            "SELECT body FROM documents WHERE collection = ?1 AND subject_id = ?2",
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![
            Box::new(collection.as_str()),
            Box::new(filter.subject_id),
        ];
        if let Some(hadm_id) = filter.hadm_id {
            params.push(Box::new(hadm_id));
            sql.push_str(&format!(" AND hadm_id = ?{}", params.len()));
        }
        if let Some(study_id) = filter.study_id {
            params.push(Box::new(study_id));
            sql.push_str(&format!(" AND study_id = ?{}", params.len()));
        }
        sql.push_str(" ORDER BY id ASC");

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(store_access(DOCUMENTS_TABLE))?;
        let bodies = stmt
            .query_map(param_refs.as_slice(), |row| row.get::<_, String>(0))
            .map_err(store_access(DOCUMENTS_TABLE))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_access(DOCUMENTS_TABLE))?;

        bodies
            .iter()
            .map(|body| {
                serde_json::from_str(body).map_err(|e| DatabaseError::MalformedDocument {
                    collection: collection.as_str().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
