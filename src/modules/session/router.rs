use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::session::controller::{auth_callback, check_access, get_session, sign_out};
use crate::state::AppState;

/// Mounted under `/api`.
pub fn init_session_router() -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/access", get(check_access))
}

/// Mounted under `/auth`. `/auth/callback` is on the gate's exclusion list.
/// Sign-out is POST only so a third-party page cannot end a session with a
/// plain link or image.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/callback", get(auth_callback))
        .route("/sign-out", post(sign_out))
}
