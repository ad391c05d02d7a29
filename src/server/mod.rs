//! server
//!
//! HTTP interface over the site facade.
//!
//! # Routes
//!
//! | Method | Path                          | Result                      |
//! |--------|-------------------------------|-----------------------------|
//! | GET    | `/sites/`                     | site listing                |
//! | GET    | `/sites/{site}/status`        | status report               |
//! | PUT    | `/sites/{site}/update`        | `pulled`                    |
//! | PUT    | `/sites/{site}/publish`       | `published`                 |
//! | GET    | `/sites/{site}/files`         | content tree                |
//! | GET    | `/sites/{site}/files/{*path}` | raw file (or one section)   |
//! | POST   | `/sites/{site}/files/{*path}` | `saved` plus commit record  |
//!
//! `?f=json|yaml` selects the structured format, `?o=all|frontmatter|body`
//! the document section. With a static directory configured, every other
//! path is served from it.
//!
//! Request bodies are capped at the configured limit; larger uploads get a
//! 413 in the usual envelope.

mod handlers;
pub mod response;

use std::path::Path;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::service::SiteService;

/// Build the application router. `body_limit` is the largest accepted
/// request body in bytes.
pub fn router(service: SiteService, static_dir: Option<&Path>, body_limit: usize) -> Router {
    let api = Router::new()
        .route("/sites", get(handlers::list_sites))
        .route("/sites/", get(handlers::list_sites))
        .route("/sites/{site}/status", get(handlers::status))
        .route("/sites/{site}/update", axum::routing::put(handlers::update))
        .route("/sites/{site}/publish", axum::routing::put(handlers::publish))
        .route("/sites/{site}/files", get(handlers::tree))
        .route("/sites/{site}/files/", get(handlers::tree))
        .route(
            "/sites/{site}/files/{*path}",
            get(handlers::read_file).post(handlers::write_file),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(
        TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    )
}

/// Bind `address` and serve `app` until Ctrl-C.
pub async fn serve(address: &str, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received, stopping server"),
        Err(e) => {
            // Without a signal handler the server runs until killed
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
