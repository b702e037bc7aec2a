//! Session token codec.
//!
//! Sessions are HS256 JWTs signed with the secret shared with the identity
//! service. The identity service issues them at sign-in; the gate verifies
//! them on every request and reissues them near expiry.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use coopboard_config::SessionConfig;
use coopboard_core::AppError;

use crate::claims::{Principal, SessionClaims};

/// Issues a session token for `principal` valid for `config.ttl_secs`.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_session_token(
    principal: &Principal,
    config: &SessionConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = SessionClaims {
        sub: principal.id.to_string(),
        email: principal.email.clone(),
        role: principal.role,
        exp: now + config.ttl_secs.max(0) as usize,
        iat: now,
    };

    encode_claims(&claims, config)
}

pub(crate) fn encode_claims(
    claims: &SessionClaims,
    config: &SessionConfig,
) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create session token: {}", e)))
}

/// Verifies signature and expiry and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the token is malformed, expired, or
/// signed with a different secret.
pub fn verify_session_token(token: &str, config: &SessionConfig) -> Result<SessionClaims, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired session"))
}
