//! Session claims and the principal derived from them.

use coopboard_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// The authenticated identity behind a valid session.
///
/// Derived fresh on every gate evaluation, never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session subject is not a user id: {0}")]
pub struct InvalidSubject(pub String);

impl TryFrom<&SessionClaims> for Principal {
    type Error = InvalidSubject;

    fn try_from(claims: &SessionClaims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| InvalidSubject(claims.sub.clone()))?;

        Ok(Principal {
            id,
            email: claims.email.clone(),
            role: claims.role,
        })
    }
}
