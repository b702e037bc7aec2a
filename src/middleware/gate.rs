//! Edge gate: the per-request authentication boundary.
//!
//! Runs before any page or API handler for every path not on the exclusion
//! list. The path is percent-decoded and its segments resolved first, the
//! same way the page bundle is served; a spelling with `//`, `.` or `..` is
//! redirected to its canonical form and an undecodable one is rejected.
//! Then, in three steps:
//!
//! 1. **Refresh**: hand the session cookie to the auth provider, which may
//!    renew it. Any provider failure resolves to "no principal".
//! 2. **Classify**: look the path up in the shared [`RoutePolicy`].
//! 3. **Decide**: anonymous on a protected page goes to sign-in with a
//!    `redirectTo`; signed-in on an auth page goes to its `redirectTo` (or the
//!    landing page); everything else passes through.
//!
//! Cookie updates from step 1 are returned alongside the decision and
//! applied to whatever response goes out, redirect or not.

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{Uri, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use coopboard_auth::{AuthProviderDyn, Principal, ProviderError, cookies};
use coopboard_config::{GateConfig, SessionConfig};
use coopboard_core::{
    AppError, ExclusionMatcher, RouteClass, RoutePolicy, canonical_form, normalize_path,
    safe_redirect_target, sign_in_location,
};
use serde::Deserialize;

use crate::metrics::{track_gate_decision, track_session_refresh};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    PassThrough,
    RedirectToSignIn { location: String },
    RedirectAwayFromAuth { location: String },
    RedirectToCanonical { location: String },
    RejectPath,
}

impl GateDecision {
    pub fn label(&self) -> &'static str {
        match self {
            GateDecision::PassThrough => "pass_through",
            GateDecision::RedirectToSignIn { .. } => "redirect_to_sign_in",
            GateDecision::RedirectAwayFromAuth { .. } => "redirect_away_from_auth",
            GateDecision::RedirectToCanonical { .. } => "redirect_to_canonical",
            GateDecision::RejectPath => "reject_path",
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            GateDecision::PassThrough | GateDecision::RejectPath => None,
            GateDecision::RedirectToSignIn { location }
            | GateDecision::RedirectAwayFromAuth { location }
            | GateDecision::RedirectToCanonical { location } => Some(location),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CookieUpdate {
    Set(Cookie<'static>),
    Clear(Cookie<'static>),
}

impl CookieUpdate {
    pub fn into_cookie(self) -> Cookie<'static> {
        match self {
            CookieUpdate::Set(cookie) | CookieUpdate::Clear(cookie) => cookie,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub decision: GateDecision,
    pub cookies: Vec<CookieUpdate>,
    pub principal: Option<Principal>,
}

/// Session resolved by the gate, stored in request extensions on
/// pass-through so handlers do not ask the provider twice.
#[derive(Debug, Clone)]
pub struct ResolvedSession(pub Option<Principal>);

#[derive(Debug, Deserialize)]
struct AuthPageQuery {
    #[serde(rename = "redirectTo")]
    redirect_to: Option<String>,
}

pub struct EdgeGate {
    policy: Arc<RoutePolicy>,
    exclusions: ExclusionMatcher,
    provider: Arc<dyn AuthProviderDyn>,
    session: SessionConfig,
    sign_in_path: String,
    landing_path: String,
}

impl EdgeGate {
    pub fn new(
        policy: Arc<RoutePolicy>,
        exclusions: ExclusionMatcher,
        provider: Arc<dyn AuthProviderDyn>,
        session: SessionConfig,
        gate_config: &GateConfig,
    ) -> Self {
        Self {
            policy,
            exclusions,
            provider,
            session,
            sign_in_path: gate_config.sign_in_path.clone(),
            landing_path: gate_config.landing_path.clone(),
        }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    pub fn provider(&self) -> &dyn AuthProviderDyn {
        self.provider.as_ref()
    }

    /// `path` is the normalized path from [`EdgeGate::request_path`].
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclusions.is_excluded(path)
    }

    /// The decoded, segment-resolved path the policy sees, or the decision
    /// that ends the request before classification.
    pub fn request_path(&self, uri: &Uri) -> Result<String, GateDecision> {
        let raw = uri.path();
        let path = normalize_path(raw).ok_or(GateDecision::RejectPath)?;

        if let Some(canonical) = canonical_form(raw) {
            let location = match uri.query() {
                Some(query) => format!("{canonical}?{query}"),
                None => canonical,
            };
            return Err(GateDecision::RedirectToCanonical { location });
        }

        Ok(path)
    }

    /// Step 1. Never fails: provider errors collapse to "no principal".
    pub async fn resolve(&self, token: Option<&str>) -> (Option<Principal>, Vec<CookieUpdate>) {
        let Some(token) = token else {
            return (None, Vec::new());
        };

        match self.provider.refresh_dyn(token).await {
            Ok(refresh) => {
                track_session_refresh(if refresh.renewed_token.is_some() {
                    "renewed"
                } else {
                    "valid"
                });

                let updates = refresh
                    .renewed_token
                    .map(|renewed| CookieUpdate::Set(cookies::session_cookie(&self.session, &renewed)))
                    .into_iter()
                    .collect();

                (Some(refresh.principal), updates)
            }
            Err(ProviderError::InvalidSession(reason)) => {
                track_session_refresh("invalid");
                tracing::debug!(reason = %reason, "Discarding invalid session");
                (
                    None,
                    vec![CookieUpdate::Clear(cookies::clear_session_cookie(
                        &self.session,
                    ))],
                )
            }
            Err(ProviderError::Unavailable(reason)) => {
                track_session_refresh("unavailable");
                tracing::warn!(reason = %reason, "Auth provider unavailable, treating request as anonymous");
                (None, Vec::new())
            }
        }
    }

    /// Steps 2 and 3. Pure.
    pub fn decide(&self, uri: &Uri, principal: Option<&Principal>) -> GateDecision {
        let path = match self.request_path(uri) {
            Ok(path) => path,
            Err(decision) => return decision,
        };

        match (self.policy.classify(&path), principal) {
            (RouteClass::Protected(_), None) => GateDecision::RedirectToSignIn {
                location: sign_in_location(&self.sign_in_path, &path),
            },
            (RouteClass::Auth, Some(_)) => {
                let redirect_to = Query::<AuthPageQuery>::try_from_uri(uri)
                    .ok()
                    .and_then(|Query(q)| q.redirect_to);

                GateDecision::RedirectAwayFromAuth {
                    location: safe_redirect_target(redirect_to.as_deref(), &self.landing_path),
                }
            }
            _ => GateDecision::PassThrough,
        }
    }

    pub async fn evaluate(&self, uri: &Uri, token: Option<&str>) -> GateOutcome {
        let (principal, cookies) = self.resolve(token).await;
        let decision = self.decide(uri, principal.as_ref());

        GateOutcome {
            decision,
            cookies,
            principal,
        }
    }
}

pub async fn edge_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let gate = state.gate.clone();
    let uri = req.uri().clone();

    match gate.request_path(&uri) {
        Ok(path) if gate.is_excluded(&path) => return next.run(req).await,
        Ok(_) => {}
        Err(decision) => {
            track_gate_decision(decision.label());
            tracing::info!(path = %uri.path(), decision = decision.label(), "Gate refused request path");
            return refusal_response(decision);
        }
    }

    let jar = CookieJar::from_headers(req.headers());
    let token = cookies::session_token(&jar, &gate.session_config().cookie_name);

    let GateOutcome {
        decision,
        cookies,
        principal,
    } = gate.evaluate(&uri, token.as_deref()).await;

    track_gate_decision(decision.label());

    let response = match decision {
        GateDecision::PassThrough => {
            tracing::debug!(path = %uri.path(), authenticated = principal.is_some(), "Gate pass-through");
            req.extensions_mut().insert(ResolvedSession(principal));
            next.run(req).await
        }
        GateDecision::RedirectToSignIn { location }
        | GateDecision::RedirectAwayFromAuth { location } => {
            tracing::info!(path = %uri.path(), location = %location, "Gate redirect");
            Redirect::temporary(&location).into_response()
        }
        refusal @ (GateDecision::RedirectToCanonical { .. } | GateDecision::RejectPath) => {
            refusal_response(refusal)
        }
    };

    apply_cookie_updates(response, cookies, &gate.session_config().cookie_name)
}

fn refusal_response(decision: GateDecision) -> Response {
    match decision {
        GateDecision::RedirectToCanonical { location } => {
            Redirect::permanent(&location).into_response()
        }
        _ => AppError::bad_request(anyhow::anyhow!("Malformed request path")).into_response(),
    }
}

/// Handlers that set the session cookie themselves (sign-in callback,
/// sign-out) win over the gate's refresh.
fn apply_cookie_updates(response: Response, updates: Vec<CookieUpdate>, cookie_name: &str) -> Response {
    if updates.is_empty() {
        return response;
    }

    let prefix = format!("{cookie_name}=");
    let handler_owns_cookie = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix));

    if handler_owns_cookie {
        return response;
    }

    let jar = updates
        .into_iter()
        .fold(CookieJar::new(), |jar, update| jar.add(update.into_cookie()));

    (jar, response).into_response()
}
