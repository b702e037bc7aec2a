use axum::http::{HeaderValue, Method};
use axum::{Router, middleware, routing::get};
use coopboard_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::gate::edge_gate;
use crate::modules::session::controller::health;
use crate::modules::session::router::{init_auth_router, init_session_router};
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", init_session_router())
        .nest("/auth", init_auth_router());

    // Page bundle behind the gate; client-side routes fall back to index.html.
    let router = match &state.server_config.pages_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.fallback(page_not_found),
    };

    router
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), edge_gate))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

async fn page_not_found() -> AppError {
    AppError::not_found("Not found")
}
