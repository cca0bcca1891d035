//! Patient and admission endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::admission::{self, AdmissionOverview, PatientInfo};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct AdmissionsResponse {
    pub subject_id: i64,
    pub admissions: Vec<i64>,
}

/// `GET /api/patients/:subject_id`
pub async fn patient(
    State(ctx): State<ApiContext>,
    Path(subject_id): Path<i64>,
) -> Result<Json<PatientInfo>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(admission::get_patient(&conn, subject_id)?))
}

/// `GET /api/patients/:subject_id/admissions`
pub async fn admissions(
    State(ctx): State<ApiContext>,
    Path(subject_id): Path<i64>,
) -> Result<Json<AdmissionsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let admissions = admission::list_admissions(&conn, subject_id)?;
    Ok(Json(AdmissionsResponse {
        subject_id,
        admissions,
    }))
}

/// `GET /api/patients/:subject_id/admissions/:hadm_id`
pub async fn overview(
    State(ctx): State<ApiContext>,
    Path((subject_id, hadm_id)): Path<(i64, i64)>,
) -> Result<Json<AdmissionOverview>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(admission::get_admission_overview(
        &conn, subject_id, hadm_id,
    )?))
}
