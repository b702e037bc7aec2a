//! The auth provider seam.
//!
//! The edge gate hands the raw session cookie value to an [`AuthProvider`],
//! which validates it and may hand back a renewed token (sliding expiry).
//! This is the gate's only suspension point.

use std::future::Future;
use std::pin::Pin;

use chrono::Utc;
use coopboard_config::SessionConfig;

use crate::claims::Principal;
use crate::token::{create_session_token, verify_session_token};

/// Result of a successful session refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRefresh {
    pub principal: Principal,
    /// Set when the provider reissued the session; goes out as `Set-Cookie`.
    pub renewed_token: Option<String>,
}

impl SessionRefresh {
    pub fn unchanged(principal: Principal) -> Self {
        Self {
            principal,
            renewed_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The credential is malformed, expired, or revoked.
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// The provider could not be reached or failed internally.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Validates and refreshes sessions.
///
/// # Example
///
/// ```rust,ignore
/// impl AuthProvider for IdentityClient {
///     async fn refresh(&self, token: &str) -> Result<SessionRefresh, ProviderError> {
///         let user = self.http.get_user(token).await
///             .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
///         Ok(SessionRefresh::unchanged(user.into()))
///     }
/// }
/// ```
pub trait AuthProvider: Send + Sync + 'static {
    fn refresh(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<SessionRefresh, ProviderError>> + Send;
}

/// Object-safe wrapper for [`AuthProvider`] (needed for `Arc<dyn>`).
pub trait AuthProviderDyn: Send + Sync {
    fn refresh_dyn<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SessionRefresh, ProviderError>> + Send + 'a>>;
}

impl<T: AuthProvider> AuthProviderDyn for T {
    fn refresh_dyn<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SessionRefresh, ProviderError>> + Send + 'a>> {
        Box::pin(self.refresh(token))
    }
}

/// Provider backed by session tokens signed with a shared secret.
///
/// Reissues the token once less than `refresh_threshold_secs` of its
/// lifetime remains.
#[derive(Debug, Clone)]
pub struct JwtAuthProvider {
    config: SessionConfig,
}

impl JwtAuthProvider {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn refresh_now(&self, token: &str) -> Result<SessionRefresh, ProviderError> {
        let claims = verify_session_token(token, &self.config)
            .map_err(|e| ProviderError::InvalidSession(e.error.to_string()))?;

        let principal = Principal::try_from(&claims)
            .map_err(|e| ProviderError::InvalidSession(e.to_string()))?;

        let remaining = claims.exp as i64 - Utc::now().timestamp();
        if remaining >= self.config.refresh_threshold_secs {
            return Ok(SessionRefresh::unchanged(principal));
        }

        match create_session_token(&principal, &self.config) {
            Ok(renewed) => {
                tracing::debug!(user_id = %principal.id, remaining_secs = remaining, "Session renewed");
                Ok(SessionRefresh {
                    principal,
                    renewed_token: Some(renewed),
                })
            }
            Err(e) => {
                // Current token is still valid.
                tracing::warn!(error = %e.error, "Session renewal failed");
                Ok(SessionRefresh::unchanged(principal))
            }
        }
    }
}

impl AuthProvider for JwtAuthProvider {
    async fn refresh(&self, token: &str) -> Result<SessionRefresh, ProviderError> {
        self.refresh_now(token)
    }
}
