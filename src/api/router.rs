//! Explorer API router.
//!
//! Returns a composable `Router`; routes are nested under `/api/`.
//!
//! Layers (outermost → innermost):
//! 1. Request tracing → 2. CORS → 3. `Cache-Control: no-store`

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::ExplorerConfig;

/// Build the explorer API router for a resolved configuration.
pub fn explorer_router(config: ExplorerConfig) -> Router {
    build_router(ApiContext::new(config))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/patients/:subject_id", get(endpoints::patients::patient))
        .route(
            "/patients/:subject_id/admissions",
            get(endpoints::patients::admissions),
        )
        .route(
            "/patients/:subject_id/admissions/:hadm_id",
            get(endpoints::patients::overview),
        )
        .route(
            "/patients/:subject_id/admissions/:hadm_id/items",
            get(endpoints::catalog::items),
        )
        .route(
            "/patients/:subject_id/admissions/:hadm_id/items/:source/:item_id/events",
            get(endpoints::events::series),
        )
        .route(
            "/patients/:subject_id/admissions/:hadm_id/notes",
            get(endpoints::notes::discharge),
        )
        .route("/ecg", get(endpoints::ecg::lookup))
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .nest("/api", api)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
