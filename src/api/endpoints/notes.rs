//! Discharge notes endpoint.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::documents::{DischargeNote, DocumentStore};

#[derive(Serialize)]
pub struct NoteView {
    pub heading: String,
    #[serde(flatten)]
    pub note: DischargeNote,
}

#[derive(Serialize)]
pub struct NotesResponse {
    pub subject_id: i64,
    pub hadm_id: i64,
    pub notes: Vec<NoteView>,
}

/// `GET /api/patients/:subject_id/admissions/:hadm_id/notes`
pub async fn discharge(
    State(ctx): State<ApiContext>,
    Path((subject_id, hadm_id)): Path<(i64, i64)>,
) -> Result<Json<NotesResponse>, ApiError> {
    let store = ctx.open_documents()?;
    let notes = store
        .discharge_notes(subject_id, hadm_id)?
        .into_iter()
        .map(|note| NoteView {
            heading: note.heading(),
            note,
        })
        .collect();

    Ok(Json(NotesResponse {
        subject_id,
        hadm_id,
        notes,
    }))
}
