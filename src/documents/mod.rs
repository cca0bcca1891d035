//! Free-text clinical documents kept outside the relational store:
//! discharge notes per admission and ECG machine measurements per study,
//! plus resolution of ECG waveform records on disk.

pub mod ecg;
mod store;
mod types;

pub use store::*;
pub use types::*;

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_memory_document_database, DatabaseError};
    use serde_json::json;

    fn setup_store() -> SqliteDocumentStore {
        SqliteDocumentStore::new(open_memory_document_database().expect("Failed to open test DB"))
    }

    #[test]
    fn discharge_notes_filtered_by_admission() {
        let store = setup_store();
        store
            .insert(
                DocumentCollection::Discharge,
                &json!({
                    "note_id": "123-DS-21",
                    "subject_id": 123,
                    "hadm_id": 456,
                    "note_type": "DS",
                    "note_seq": 21,
                    "charttime": "2180-07-30T00:00:00",
                    "text": "Discharge summary body"
                }),
            )
            .unwrap();
        store
            .insert(
                DocumentCollection::Discharge,
                &json!({"subject_id": 123, "hadm_id": 789, "text": "Other admission"}),
            )
            .unwrap();

        let notes = store.discharge_notes(123, 456).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_id.as_deref(), Some("123-DS-21"));
        assert_eq!(
            notes[0].heading(),
            "Type: DS | Sequence: 21 | Chart Time: 2180-07-30 00:00:00"
        );
        assert_eq!(notes[0].body(), "Discharge summary body");
    }

    #[test]
    fn heading_marks_missing_fields() {
        let store = setup_store();
        store
            .insert(DocumentCollection::Discharge, &json!({"subject_id": 1, "hadm_id": 2}))
            .unwrap();

        let notes = store.discharge_notes(1, 2).unwrap();
        assert_eq!(notes[0].heading(), "Type: N/A | Sequence: N/A | Chart Time: N/A");
        assert_eq!(notes[0].body(), "Note text not available.");
    }

    #[test]
    fn collections_do_not_mix() {
        let store = setup_store();
        store
            .insert(
                DocumentCollection::MachineMeasurement,
                &json!({"subject_id": 1, "hadm_id": 2, "study_id": 3}),
            )
            .unwrap();

        assert!(store.discharge_notes(1, 2).unwrap().is_empty());
    }

    #[test]
    fn ecg_measurements_filtered_by_study() {
        let store = setup_store();
        for study in [41420867, 40000001] {
            store
                .insert(
                    DocumentCollection::MachineMeasurement,
                    &json!({
                        "subject_id": 10001725,
                        "study_id": study,
                        "ecg_time": "2180-07-24T09:12:00",
                        "text": "Sinus rhythm, rr_interval:857.0, p_axis:45.0, qrs_axis:12.0, t_axis:30.0"
                    }),
                )
                .unwrap();
        }

        let found = store.ecg_measurements(10001725, 41420867).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].study_id, 41420867);
        assert!(found[0].text.as_deref().unwrap().starts_with("Sinus rhythm"));
    }

    #[test]
    fn insert_requires_subject_id() {
        let store = setup_store();
        let err = store
            .insert(DocumentCollection::Discharge, &json!({"hadm_id": 2}))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MalformedDocument { .. }));

        let err = store
            .insert(DocumentCollection::Discharge, &json!(["not", "an", "object"]))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MalformedDocument { .. }));
    }

    #[test]
    fn undecodable_document_is_malformed() {
        let store = setup_store();
        store
            .insert(
                DocumentCollection::Discharge,
                &json!({"subject_id": 1, "hadm_id": 2, "note_seq": "twenty-one"}),
            )
            .unwrap();

        let err = store.discharge_notes(1, 2).unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::MalformedDocument { ref collection, .. } if collection == "discharge"
        ));
    }
}
