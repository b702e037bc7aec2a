use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(request_id = %request_id, method = %method, path = %path, status, latency_ms, "Server error"),
        400..=499 => warn!(request_id = %request_id, method = %method, path = %path, status, latency_ms, "Client error"),
        _ => info!(request_id = %request_id, method = %method, path = %path, status, latency_ms, "Request completed"),
    }

    response
}

/// Console logging plus daily-rolling JSON logs under `LOG_DIR` (default
/// `storage/logs`). Falls back to console only when the directory cannot be
/// created.
pub fn init_tracing() {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "storage/logs".to_string());

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,tower_http=warn,hyper=info",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        tracing_subscriber::registry().with(console_layer).init();
        warn!(error = %e, log_dir = %log_dir, "Cannot create log directory, logging to console only");
        return;
    }

    // JSON file layer for structured logs (can be ingested by Loki)
    let json_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "coopboard.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .init();

    info!(log_dir = %log_dir, "Tracing initialized");
}
