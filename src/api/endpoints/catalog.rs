//! Item catalog endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::catalog::{browse_catalog, unify_catalog, CatalogPage, CatalogQuery};

/// `GET /api/patients/:subject_id/admissions/:hadm_id/items`
///
/// Query parameters map onto [`CatalogQuery`]; the catalog is rebuilt on
/// every call.
pub async fn items(
    State(ctx): State<ApiContext>,
    Path((subject_id, hadm_id)): Path<(i64, i64)>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogPage>, ApiError> {
    let conn = ctx.open_db()?;
    let catalog = unify_catalog(&conn, subject_id, hadm_id)?;
    Ok(Json(browse_catalog(&catalog, &query)))
}
