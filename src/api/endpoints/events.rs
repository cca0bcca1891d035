//! Windowed event series endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::admission::get_admission;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::catalog::SourceRelation;
use crate::events::{fetch_series, EventRequest, EventSeries};

/// Window bounds as ISO-8601 local timestamps (`2180-07-23T12:00:00`).
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// `GET /api/patients/:subject_id/admissions/:hadm_id/items/:source/:item_id/events`
///
/// Missing bounds default to the admission's admit and discharge times.
pub async fn series(
    State(ctx): State<ApiContext>,
    Path((subject_id, hadm_id, source, item_id)): Path<(i64, i64, String, i64)>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<EventSeries>, ApiError> {
    let source_relation: SourceRelation = source.parse()?;

    let conn = ctx.open_db()?;
    let admission = get_admission(&conn, subject_id, hadm_id)?;

    let request = EventRequest {
        subject_id,
        hadm_id,
        item_id,
        source_relation,
        start_time: window.start.unwrap_or(admission.admittime),
        end_time: window.end.unwrap_or(admission.dischtime),
    };

    Ok(Json(fetch_series(&conn, request)?))
}
