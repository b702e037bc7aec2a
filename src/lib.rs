//! # Coopboard
//!
//! Route protection for the Coopboard board-package platform, where
//! applicants submit co-op and condo applications, brokers and managing
//! agents route them, and board members approve or deny them.
//!
//! ## Overview
//!
//! Every request passes an **edge gate** before any page or API handler runs:
//!
//! - the session cookie is validated and, near expiry, renewed by the auth provider
//! - anonymous requests to protected areas are redirected to sign-in with a `redirectTo`
//! - signed-in requests to sign-in/recovery pages are redirected to their destination
//! - everything else passes through, with the resolved principal attached
//!
//! Role granularity (who may *render* a page) lives in the same
//! [`coopboard_core::RoutePolicy`] the client guard reads, so the two
//! enforcement points cannot drift apart.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Edge gate and principal extractors
//! ├── modules/
//! │   └── session/     # Session, access check, sign-in callback, sign-out
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus metrics
//! ├── router.rs         # Main application router
//! └── state.rs          # Shared application state
//! ```
//!
//! ## Protected Areas
//!
//! | Prefix | Roles |
//! |--------|-------|
//! | `/applications` | applicant, co-applicant, guarantor, broker, admin, board |
//! | `/broker` | broker, admin |
//! | `/agent` | admin |
//! | `/board` | board |
//! | `/my-applications`, `/settings` | any signed-in role |
//!
//! ## Environment Variables
//!
//! ```bash
//! SESSION_SECRET=shared-with-the-identity-service
//! SESSION_TTL_SECS=604800
//! SESSION_REFRESH_THRESHOLD_SECS=86400
//! DEFAULT_LANDING_PATH=/my-applications
//! PAGES_DIR=./web/dist
//! ```
//!
//! API routes under `/api` are not excluded from the gate; they are not
//! protected prefixes either, so their handlers authenticate with
//! [`middleware::principal::AuthPrincipal`] and answer `401` themselves.

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

// Re-export workspace crates for convenience
pub use coopboard_auth;
pub use coopboard_config;
pub use coopboard_core;
