//! HTTP handler functions for the parcel map API.

use actix_web::{HttpResponse, web};
use parcel_map_parcel_models::{CategoryGroup, MAP_CENTER, MAP_ZOOM};
use parcel_map_server_models::{ApiCategory, ApiHealth, ApiMapConfig, ParcelQueryParams};

use crate::{AppState, pipeline};

/// Browser UI, embedded at compile time.
const INDEX_HTML: &str = include_str!("../static/index.html");

/// `GET /`
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/categories`
///
/// Returns the map center, zoom, and the sidebar toggles.
pub async fn categories() -> HttpResponse {
    HttpResponse::Ok().json(ApiMapConfig {
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        categories: CategoryGroup::TOGGLEABLE
            .iter()
            .copied()
            .map(ApiCategory::from)
            .collect(),
    })
}

/// `GET /api/parcels`
///
/// Runs one render pass for the given viewport and toggles. Upstream
/// failures are answered with `502 Bad Gateway`; an empty area is a
/// `200` warning.
pub async fn parcels(
    state: web::Data<AppState>,
    params: web::Query<ParcelQueryParams>,
) -> HttpResponse {
    let view_state = params.view_state();
    let outcome = pipeline::run(&state.client, &view_state).await;
    let failed = outcome.is_failure();
    let response = outcome.into_response(state.client.config().debug);

    if failed {
        HttpResponse::BadGateway().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}
