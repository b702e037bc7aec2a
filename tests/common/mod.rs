#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use coopboard::router::init_router;
use coopboard::state::AppState;
use coopboard_auth::{
    AuthProvider, AuthProviderDyn, JwtAuthProvider, Principal, ProviderError, SessionRefresh,
    create_session_token,
};
use coopboard_config::{CorsConfig, GateConfig, ServerConfig, SessionConfig};
use coopboard_core::{Role, RoutePolicy};
use http_body_util::BodyExt;
use uuid::Uuid;

pub const COOKIE_NAME: &str = "coopboard_session";

pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        ttl_secs: 3600,
        refresh_threshold_secs: 600,
        cookie_name: COOKIE_NAME.to_string(),
        secure_cookies: false,
    }
}

/// Provider that always fails the same way.
pub struct FailingProvider(pub ProviderError);

impl AuthProvider for FailingProvider {
    async fn refresh(&self, _token: &str) -> Result<SessionRefresh, ProviderError> {
        Err(self.0.clone())
    }
}

pub fn setup_app_with(provider: Arc<dyn AuthProviderDyn>) -> Router {
    build_app(provider, ServerConfig::default())
}

/// App serving the page bundle in `pages_dir` behind the gate.
pub fn setup_app_with_pages(pages_dir: &Path) -> Router {
    build_app(
        Arc::new(JwtAuthProvider::new(test_session_config())),
        ServerConfig {
            pages_dir: Some(pages_dir.to_path_buf()),
            ..ServerConfig::default()
        },
    )
}

/// Page bundle with `index.html` and one page per protected area.
pub fn write_page_bundle() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "APP-SHELL").unwrap();

    for (page, body) in [
        ("broker/submit", "BROKER-SUBMIT-PAGE"),
        ("board/queue", "BOARD-QUEUE-PAGE"),
        ("about", "ABOUT-PAGE"),
    ] {
        let page_dir = dir.path().join(page);
        std::fs::create_dir_all(&page_dir).unwrap();
        std::fs::write(page_dir.join("index.html"), body).unwrap();
    }

    dir
}

fn build_app(provider: Arc<dyn AuthProviderDyn>, server_config: ServerConfig) -> Router {
    let state = AppState::new(
        provider,
        RoutePolicy::default(),
        test_session_config(),
        GateConfig::default(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        server_config,
    )
    .unwrap();

    init_router(state)
}

pub fn setup_test_app() -> Router {
    setup_app_with(Arc::new(JwtAuthProvider::new(test_session_config())))
}

pub fn test_principal(role: Role) -> Principal {
    Principal::new(Uuid::new_v4(), format!("{}@example.com", role), role)
}

/// Session token with the full lifetime left.
pub fn session_token_for(principal: &Principal) -> String {
    create_session_token(principal, &test_session_config()).unwrap()
}

/// Session token inside the renewal window.
pub fn expiring_session_token_for(principal: &Principal) -> String {
    let config = SessionConfig {
        ttl_secs: 120,
        ..test_session_config()
    };
    create_session_token(principal, &config).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_session(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("{COOKIE_NAME}={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn location<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn body_text(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// `Set-Cookie` values for the session cookie.
pub fn session_set_cookies<B>(response: &Response<B>) -> Vec<String> {
    let prefix = format!("{COOKIE_NAME}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// Value part of a `name=value; attrs` cookie header.
pub fn cookie_value(set_cookie: &str) -> &str {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, v)| v)
        .unwrap_or("")
}
