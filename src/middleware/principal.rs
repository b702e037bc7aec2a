use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use coopboard_auth::{Principal, cookies};
use coopboard_core::{AppError, RoleSet};

use crate::middleware::gate::ResolvedSession;
use crate::state::AppState;

/// Extractor for handlers that require a signed-in principal.
///
/// Reuses the session the edge gate resolved for this request; on paths the
/// gate skips it asks the auth provider itself.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl FromRequestParts<AppState> for AuthPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalPrincipal(principal) = OptionalPrincipal::from_request_parts(parts, state)
            .await
            .unwrap_or(OptionalPrincipal(None));

        principal
            .map(AuthPrincipal)
            .ok_or_else(|| AppError::unauthorized("Not signed in"))
    }
}

/// Like [`AuthPrincipal`] but never rejects.
#[derive(Debug, Clone)]
pub struct OptionalPrincipal(pub Option<Principal>);

impl FromRequestParts<AppState> for OptionalPrincipal {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ResolvedSession(principal)) = parts.extensions.get::<ResolvedSession>() {
            return Ok(OptionalPrincipal(principal.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = cookies::session_token(&jar, &state.gate.session_config().cookie_name);
        let (principal, _) = state.gate.resolve(token.as_deref()).await;

        Ok(OptionalPrincipal(principal))
    }
}

/// Role check for handler logic.
///
/// ```rust,ignore
/// check_role(&principal, &RoleSet::only([Role::Board]))?;
/// ```
pub fn check_role(principal: &Principal, allowed: &RoleSet) -> Result<(), AppError> {
    if !allowed.contains(principal.role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Role {} is not allowed here",
            principal.role
        )));
    }

    Ok(())
}
