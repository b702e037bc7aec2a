//! Injected session context.
//!
//! The application root builds one [`WatchSession`] and hands clones down to
//! every guard, instead of guards reaching for a global "current user".

use std::sync::Arc;

use coopboard_auth::Principal;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub principal: Option<Principal>,
    pub is_loading: bool,
}

impl SessionSnapshot {
    pub fn loading() -> Self {
        Self {
            principal: None,
            is_loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            principal: None,
            is_loading: false,
        }
    }

    pub fn signed_in(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            is_loading: false,
        }
    }
}

/// Anything that can report the current session.
pub trait SessionSource: Send + Sync {
    fn snapshot(&self) -> SessionSnapshot;
}

/// Session context backed by a `watch` channel. Starts out loading.
#[derive(Debug, Clone)]
pub struct WatchSession {
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchSession {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::loading());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn set_loading(&self) {
        self.tx.send_replace(SessionSnapshot::loading());
    }

    /// Publishes the resolved principal, `None` when nobody is signed in.
    pub fn resolve(&self, principal: Option<Principal>) {
        self.tx.send_replace(SessionSnapshot {
            principal,
            is_loading: false,
        });
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(SessionSnapshot::signed_out());
    }
}

impl SessionSource for WatchSession {
    fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }
}
