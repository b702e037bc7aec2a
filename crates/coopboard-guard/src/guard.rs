//! Per-page role guard.
//!
//! A [`RouteGuard`] sits around a page subtree. It starts in
//! [`GuardState::Loading`] and renders a placeholder until the session
//! resolves, then either renders the children or sends the user away:
//! to sign-in when nobody is signed in, to the fallback page when the
//! principal's role is not on the page's allow-list.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use coopboard_auth::Principal;
use coopboard_core::{RoleSet, RoutePolicy};
use tokio::sync::watch;

use crate::session::SessionSnapshot;

pub const DEFAULT_FALLBACK_PATH: &str = "/my-applications";
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, path: &str) {
        self(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    UnauthorizedNoUser,
    UnauthorizedWrongRole,
    Authorized,
}

/// What the guarded subtree should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    Placeholder,
    Children,
    /// A redirect is in flight.
    Nothing,
}

/// Lets the host tear the guard down from outside the render loop.
#[derive(Debug, Clone)]
pub struct MountHandle(Arc<AtomicBool>);

impl MountHandle {
    pub fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct RouteGuard<N> {
    allowed: RoleSet,
    fallback: String,
    sign_in: String,
    navigator: N,
    state: GuardState,
    last_inputs: Option<(Option<Principal>, bool)>,
    allowed_changed: bool,
    navigated_to: Option<String>,
    mounted: MountHandle,
}

impl<N: Navigator> RouteGuard<N> {
    pub fn new(allowed: RoleSet, navigator: N) -> Self {
        Self {
            allowed,
            fallback: DEFAULT_FALLBACK_PATH.to_string(),
            sign_in: DEFAULT_SIGN_IN_PATH.to_string(),
            navigator,
            state: GuardState::Loading,
            last_inputs: None,
            allowed_changed: false,
            navigated_to: None,
            mounted: MountHandle(Arc::new(AtomicBool::new(true))),
        }
    }

    /// Guard whose allow-list comes from the shared route policy. Paths the
    /// policy does not protect admit any signed-in role.
    pub fn for_path(policy: &RoutePolicy, path: &str, navigator: N) -> Self {
        let allowed = policy.allowed_roles(path).cloned().unwrap_or(RoleSet::Any);
        Self::new(allowed, navigator)
    }

    pub fn with_fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback = path.into();
        self
    }

    pub fn with_sign_in(mut self, path: impl Into<String>) -> Self {
        self.sign_in = path.into();
        self
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn allowed(&self) -> &RoleSet {
        &self.allowed
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mounted.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_mounted()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    pub fn set_allowed(&mut self, allowed: RoleSet) {
        if allowed != self.allowed {
            self.allowed = allowed;
            self.allowed_changed = true;
        }
    }

    /// Renders against the current session. Re-evaluates only when the
    /// principal, the loading flag, or the allow-list changed.
    pub fn render(&mut self, snapshot: &SessionSnapshot) -> Render {
        if !self.is_mounted() {
            return Render::Nothing;
        }

        let inputs = (snapshot.principal.clone(), snapshot.is_loading);
        if self.allowed_changed || self.last_inputs.as_ref() != Some(&inputs) {
            self.allowed_changed = false;
            self.last_inputs = Some(inputs);
            self.evaluate(snapshot);
        }

        match self.state {
            GuardState::Loading => Render::Placeholder,
            GuardState::Authorized => Render::Children,
            GuardState::UnauthorizedNoUser | GuardState::UnauthorizedWrongRole => Render::Nothing,
        }
    }

    fn evaluate(&mut self, snapshot: &SessionSnapshot) {
        self.state = match (&snapshot.principal, snapshot.is_loading) {
            (_, true) => GuardState::Loading,
            (None, false) => GuardState::UnauthorizedNoUser,
            (Some(principal), false) if !self.allowed.contains(principal.role) => {
                GuardState::UnauthorizedWrongRole
            }
            (Some(_), false) => GuardState::Authorized,
        };

        let target = match self.state {
            GuardState::UnauthorizedNoUser => self.sign_in.clone(),
            GuardState::UnauthorizedWrongRole => self.fallback.clone(),
            GuardState::Loading | GuardState::Authorized => {
                self.navigated_to = None;
                return;
            }
        };

        if self.navigated_to.as_deref() == Some(target.as_str()) {
            return;
        }

        tracing::debug!(state = ?self.state, target = %target, "Guard redirecting");
        self.navigator.navigate(&target);
        self.navigated_to = Some(target);
    }
}

/// Re-renders `guard` on every session change until the session source goes
/// away or the guard is unmounted. Returns the last state.
pub async fn drive<N: Navigator>(
    guard: &mut RouteGuard<N>,
    mut session: watch::Receiver<SessionSnapshot>,
) -> GuardState {
    loop {
        let snapshot = session.borrow_and_update().clone();
        guard.render(&snapshot);

        if !guard.is_mounted() || session.changed().await.is_err() {
            break;
        }
    }

    guard.state()
}
