//! ECG record lookup endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::documents::ecg::{parse_record_locator, LocatorError, RecordLocator};
use crate::documents::{DocumentStore, EcgMeasurement};

#[derive(Debug, Deserialize)]
pub struct EcgQuery {
    pub locator: String,
}

#[derive(Serialize)]
pub struct EcgResponse {
    pub locator: RecordLocator,
    pub record_path: String,
    pub available: bool,
    pub measurements: Vec<EcgMeasurement>,
}

/// `GET /api/ecg?locator=ecg/p10001725/s41420867`
///
/// Resolves the waveform record on disk and returns the machine
/// measurements stored for the same subject and study.
pub async fn lookup(
    State(ctx): State<ApiContext>,
    Query(query): Query<EcgQuery>,
) -> Result<Json<EcgResponse>, ApiError> {
    let base = ctx.config.ecg_base_dir.as_deref().ok_or_else(|| {
        ApiError::Unavailable("ECG base folder not provided; start with --ecg-base-folder".into())
    })?;

    let locator = parse_record_locator(&query.locator)?;
    let (subject_id, study_id) = locator.numeric_ids().ok_or(LocatorError::SubjectId)?;

    let available = locator.is_available(base);
    if !available {
        tracing::debug!(locator = %query.locator, "ECG record files not found");
    }

    let measurements = ctx.open_documents()?.ecg_measurements(subject_id, study_id)?;

    Ok(Json(EcgResponse {
        record_path: locator.record_path(base).display().to_string(),
        available,
        measurements,
        locator,
    }))
}
