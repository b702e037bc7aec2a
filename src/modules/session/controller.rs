use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use coopboard_auth::{Principal, ProviderError, cookies};
use coopboard_core::{AppError, RouteClass, safe_redirect_target};

use crate::middleware::principal::AuthPrincipal;
use crate::modules::session::model::{AccessQuery, AccessResponse, CallbackQuery, HealthResponse};
use crate::state::AppState;

/// Current principal, for client-side session sources.
pub async fn get_session(AuthPrincipal(principal): AuthPrincipal) -> Json<Principal> {
    Json(principal)
}

/// Evaluates the shared route policy for the current principal, the same
/// way the client guard does.
pub async fn check_access(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessResponse>, AppError> {
    if !query.path.starts_with('/') {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "path must start with '/'"
        )));
    }

    let policy = state.gate.policy();
    let class = policy.classify(&query.path);

    let redirect = match class {
        RouteClass::Protected(rule) if !rule.roles.contains(principal.role) => {
            Some(state.gate_config.fallback_path.clone())
        }
        RouteClass::Auth => Some(state.gate_config.landing_path.clone()),
        _ => None,
    };

    Ok(Json(AccessResponse {
        class: class.as_str().to_string(),
        allowed: redirect.is_none(),
        redirect,
        path: query.path,
    }))
}

/// Sign-in completion. Stores the provider-issued session and consumes the
/// redirect intent.
pub async fn auth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let sign_in = &state.gate_config.sign_in_path;

    let Some(token) = query.token.filter(|t| !t.is_empty()) else {
        return sign_in_error(sign_in, "missing_token");
    };

    let refresh = match state.gate.provider().refresh_dyn(&token).await {
        Ok(refresh) => refresh,
        Err(ProviderError::InvalidSession(reason)) => {
            tracing::warn!(reason = %reason, "Rejected sign-in callback");
            return sign_in_error(sign_in, "invalid_session");
        }
        Err(ProviderError::Unavailable(reason)) => {
            tracing::error!(reason = %reason, "Auth provider unavailable during sign-in");
            return sign_in_error(sign_in, "provider_unavailable");
        }
    };

    let session_token = refresh.renewed_token.as_deref().unwrap_or(&token);
    let cookie = cookies::session_cookie(state.gate.session_config(), session_token);
    let target = safe_redirect_target(
        query.redirect_to.as_deref(),
        &state.gate_config.landing_path,
    );

    tracing::info!(
        user_id = %refresh.principal.id,
        role = %refresh.principal.role,
        target = %target,
        "Sign-in completed"
    );

    (jar.add(cookie), Redirect::to(&target)).into_response()
}

pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let clear = cookies::clear_session_cookie(state.gate.session_config());
    (jar.add(clear), Redirect::to(&state.gate_config.sign_in_path))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn sign_in_error(sign_in_path: &str, code: &str) -> Response {
    Redirect::to(&format!("{sign_in_path}?error={code}")).into_response()
}
