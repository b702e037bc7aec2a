//! # Coopboard Guard
//!
//! Client-side role enforcement for rendered pages, on top of the edge gate.
//! The edge gate only knows "signed in or not"; the guard knows which roles
//! a page admits and redirects everyone else.
//!
//! - [`session`]: the injected session context ([`SessionSource`], [`WatchSession`])
//! - [`guard`]: the [`RouteGuard`] state machine and its async [`drive`] loop
//!
//! # Example
//!
//! ```ignore
//! use coopboard_core::RoutePolicy;
//! use coopboard_guard::{RouteGuard, WatchSession, drive};
//!
//! let session = WatchSession::new();
//! let mut guard = RouteGuard::for_path(&policy, "/board/queue", router_push);
//!
//! tokio::spawn(load_session(session.clone()));
//! drive(&mut guard, session.subscribe()).await;
//! ```

pub mod guard;
pub mod session;

pub use guard::{
    DEFAULT_FALLBACK_PATH, DEFAULT_SIGN_IN_PATH, GuardState, MountHandle, Navigator, Render,
    RouteGuard, drive,
};
pub use session::{SessionSnapshot, SessionSource, WatchSession};
