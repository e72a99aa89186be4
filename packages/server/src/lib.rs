#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the parcel map.
//!
//! Serves a single-page UI (Leaflet map plus land category toggles) and
//! the JSON API it calls. Each `/api/parcels` request runs the whole
//! pipeline once: bbox resolution, one WFS request, GML parsing,
//! category coloring, and overlay rendering.

mod handlers;
pub mod interactive;
pub mod pipeline;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use parcel_map_wfs::{ServiceConfig, WfsClient};

/// Shared application state.
pub struct AppState {
    /// Feature service client.
    pub client: WfsClient,
}

/// Default listen address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port when `PORT` is unset or not a number.
pub const DEFAULT_PORT: u16 = 8080;

/// Resolves the listen address from `BIND_ADDR` and `PORT` via `lookup`.
fn listen_addr(lookup: impl Fn(&str) -> Option<String>) -> (String, u16) {
    let host = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let port = lookup("PORT")
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (host, port)
}

/// Registers the API scope and the UI page.
fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/categories", web::get().to(handlers::categories))
            .route("/parcels", web::get().to(handlers::parcels)),
    )
    .route("/", web::get().to(handlers::index));
}

/// Serves the parcel map until shutdown.
///
/// The feature service settings come from [`ServiceConfig::from_env`], the
/// listen address from `BIND_ADDR` and `PORT`. Logging and the Actix
/// runtime are set up by the binary that calls this.
///
/// # Errors
///
/// Fails when the HTTP client cannot be created, the address cannot be
/// bound, or the server stops with an I/O error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let config = ServiceConfig::from_env();
    if config.debug {
        log::info!("Diagnostics enabled");
    }

    let client = WfsClient::new(config).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState { client });
    let (host, port) = listen_addr(|name| std::env::var(name).ok());

    log::info!("Listening on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((host, port))?
    .run()
    .await
}
