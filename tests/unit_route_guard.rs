use std::sync::{Arc, Mutex};

use coopboard_auth::Principal;
use coopboard_core::{Role, RoleSet, RoutePolicy};
use coopboard_guard::{GuardState, Navigator, Render, RouteGuard, SessionSnapshot, WatchSession, drive};
use uuid::Uuid;

#[derive(Default, Clone)]
struct RecordingNavigator(Arc<Mutex<Vec<String>>>);

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.0.lock().unwrap().push(path.to_string());
    }
}

impl RecordingNavigator {
    fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn principal(role: Role) -> Principal {
    Principal::new(Uuid::new_v4(), "resident@example.com", role)
}

#[test]
fn test_board_page_rejects_applicant_once() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(RoleSet::only([Role::Board]), nav.clone());

    assert_eq!(guard.render(&SessionSnapshot::loading()), Render::Placeholder);

    let snapshot = SessionSnapshot::signed_in(principal(Role::Applicant));
    assert_eq!(guard.render(&snapshot), Render::Nothing);
    assert_eq!(guard.render(&snapshot), Render::Nothing);

    assert_eq!(guard.state(), GuardState::UnauthorizedWrongRole);
    assert_eq!(nav.calls(), vec!["/my-applications".to_string()]);
}

#[test]
fn test_allowed_role_renders_children() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(RoleSet::only([Role::Broker, Role::Admin]), nav.clone());

    let snapshot = SessionSnapshot::signed_in(principal(Role::Admin));
    assert_eq!(guard.render(&snapshot), Render::Children);
    assert_eq!(guard.state(), GuardState::Authorized);
    assert!(nav.calls().is_empty());
}

#[test]
fn test_signed_out_goes_to_sign_in() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(RoleSet::Any, nav.clone());

    assert_eq!(guard.render(&SessionSnapshot::signed_out()), Render::Nothing);
    assert_eq!(guard.state(), GuardState::UnauthorizedNoUser);
    assert_eq!(nav.calls(), vec!["/sign-in".to_string()]);
}

#[test]
fn test_custom_fallback() {
    let nav = RecordingNavigator::default();
    let mut guard =
        RouteGuard::new(RoleSet::only([Role::Board]), nav.clone()).with_fallback("/settings");

    guard.render(&SessionSnapshot::signed_in(principal(Role::Viewer)));
    assert_eq!(nav.calls(), vec!["/settings".to_string()]);
}

#[test]
fn test_guard_from_shared_policy() {
    let policy = RoutePolicy::default();
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::for_path(&policy, "/board/queue", nav.clone());

    assert_eq!(guard.allowed(), &RoleSet::only([Role::Board]));

    guard.render(&SessionSnapshot::signed_in(principal(Role::Broker)));
    assert_eq!(nav.calls(), vec!["/my-applications".to_string()]);
}

#[test]
fn test_sign_out_after_authorization_navigates_to_sign_in() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(RoleSet::Any, nav.clone());

    assert_eq!(
        guard.render(&SessionSnapshot::signed_in(principal(Role::Attorney))),
        Render::Children
    );
    assert_eq!(guard.render(&SessionSnapshot::signed_out()), Render::Nothing);
    assert_eq!(nav.calls(), vec!["/sign-in".to_string()]);
}

#[tokio::test]
async fn test_drive_follows_session_until_source_closes() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(RoleSet::only([Role::Board]), nav.clone());

    let session = WatchSession::new();
    let rx = session.subscribe();

    let loader = tokio::spawn(async move {
        tokio::task::yield_now().await;
        session.resolve(Some(principal(Role::Applicant)));
    });

    let state = drive(&mut guard, rx).await;
    loader.await.unwrap();

    assert_eq!(state, GuardState::UnauthorizedWrongRole);
    assert_eq!(nav.calls(), vec!["/my-applications".to_string()]);
}

#[tokio::test]
async fn test_drive_stops_when_unmounted() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(RoleSet::only([Role::Board]), nav.clone());
    guard.unmount();

    let session = WatchSession::new();
    session.resolve(Some(principal(Role::Broker)));

    let state = drive(&mut guard, session.subscribe()).await;

    assert_eq!(state, GuardState::Loading);
    assert!(nav.calls().is_empty());
}
