//! # Coopboard Auth
//!
//! Session handling for the Coopboard gate:
//!
//! - [`claims`]: session token payload and the [`Principal`] derived from it
//! - [`token`]: session token creation and verification
//! - [`provider`]: the [`AuthProvider`] seam and the shared-secret [`JwtAuthProvider`]
//! - [`cookies`]: session cookie construction and lookup
//!
//! # Example
//!
//! ```ignore
//! use coopboard_auth::{AuthProvider, JwtAuthProvider};
//! use coopboard_config::SessionConfig;
//!
//! let provider = JwtAuthProvider::new(SessionConfig::from_env());
//! let refresh = provider.refresh(&token).await?;
//! println!("{} signed in as {}", refresh.principal.email, refresh.principal.role);
//! ```

pub mod claims;
pub mod cookies;
pub mod provider;
pub mod token;

// Re-export commonly used types at crate root
pub use claims::{InvalidSubject, Principal, SessionClaims};
pub use provider::{AuthProvider, AuthProviderDyn, JwtAuthProvider, ProviderError, SessionRefresh};
pub use token::{create_session_token, verify_session_token};
