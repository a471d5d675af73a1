//! Router construction

use std::path::Path;

use axum::{
    http::header::{HeaderValue, CACHE_CONTROL},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::routes::{health, pages};
use crate::session::session_layer;
use crate::state::AppState;

/// Build the full router: session-backed pages, health check and static files.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let pages = Router::new()
        .route("/", get(pages::home))
        .route("/language", get(pages::language))
        .route("/about", get(pages::about))
        .route("/work", get(pages::work))
        .route("/contact", get(pages::contact))
        .route("/legal", get(pages::legal))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_layer));

    Router::new()
        .merge(pages)
        .route("/health", get(health::health))
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-cache"),
                ))
                .service(ServeDir::new(static_dir)),
        )
        .fallback(health::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
