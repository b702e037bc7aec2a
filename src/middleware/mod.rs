//! Middleware modules for request processing.
//!
//! - [`gate`]: the edge gate that runs before every non-excluded request
//! - [`principal`]: extractors for the principal the gate resolved
//!
//! # Request Flow
//!
//! 1. The exclusion list lets static assets and the auth callback through untouched
//! 2. [`gate::edge_gate`] refreshes the session cookie and redirects or passes through
//! 3. Handlers read the principal with [`principal::AuthPrincipal`]
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::principal::{AuthPrincipal, check_role};
//!
//! async fn board_queue(AuthPrincipal(principal): AuthPrincipal) -> Result<impl IntoResponse, AppError> {
//!     check_role(&principal, &RoleSet::only([Role::Board]))?;
//!     // ...
//! }
//! ```

pub mod gate;
pub mod principal;
