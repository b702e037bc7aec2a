//! # Coopboard Core
//!
//! Shared types for the Coopboard route-protection layer.
//!
//! - [`roles`]: the role tag carried by every principal
//! - [`policy`]: the [`RoutePolicy`] table consumed by the edge gate and the client guard
//! - [`matcher`]: paths that bypass the edge gate
//! - [`path`]: request path canonicalization before classification
//! - [`redirect`]: `redirectTo` construction and open-redirect validation
//! - [`errors`]: HTTP-facing application errors
//!
//! # Example
//!
//! ```ignore
//! use coopboard_core::{RoutePolicy, RouteClass, Role};
//!
//! let policy = RoutePolicy::default();
//! assert!(policy.is_protected("/broker/submit"));
//! assert!(!policy.permits("/board/queue", Role::Applicant));
//! ```

pub mod errors;
pub mod matcher;
pub mod path;
pub mod policy;
pub mod redirect;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use matcher::{AUTH_CALLBACK_PATH, ExclusionMatcher, PathPattern};
pub use path::{canonical_form, normalize_path};
pub use policy::{PolicyError, RoleSet, RouteClass, RoutePolicy, RouteRule};
pub use redirect::{REDIRECT_PARAM, is_safe_redirect, safe_redirect_target, sign_in_location};
pub use roles::{ParseRoleError, Role};
