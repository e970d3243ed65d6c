//! Session lifecycle against a scripted backend.

mod common;

use common::*;
use std::cell::RefCell;
use std::rc::Rc;
use vidshare_navigator::*;

fn record_events(session: &SessionManager) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

fn logouts(events: &RefCell<Vec<SessionEvent>>) -> usize {
    events
        .borrow()
        .iter()
        .filter(|e| **e == SessionEvent::LoggedOut)
        .count()
}

// ---- login / register ----

#[tokio::test]
async fn test_login_stores_token_and_profile() {
    let h = Harness::new();
    let events = record_events(&h.session);

    let profile = h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();

    assert!(h.session.is_authenticated());
    assert_eq!(h.store.get("auth_token").as_deref(), Some("token-1"));
    assert_eq!(h.session.current_profile(), Some(profile.clone()));
    assert_eq!(profile.username, sample_profile().username);
    assert_eq!(*events.borrow(), vec![SessionEvent::LoggedIn(profile)]);
}

#[tokio::test]
async fn test_rejected_credentials_leave_no_session() {
    let h = Harness::new();
    let err = h.session.login("a@b.com", "wrong").await.unwrap_err();

    assert!(matches!(err, SessionError::Auth(_)));
    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.current_profile(), None);
    assert!(h.store.is_empty());
    assert_eq!(h.api.calls.fetch_profile.get(), 0);
}

#[tokio::test]
async fn test_profile_failure_during_login_leaves_no_session() {
    let h = Harness::new();
    h.api
        .fail_next_profile(ApiError::Network("connection reset".to_string()));

    let err = h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap_err();

    assert!(matches!(err, SessionError::Network(_)));
    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.current_profile(), None);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let h = Harness::new();
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();

    assert!(h.session.login("a@b.com", "wrong").await.is_err());
    assert_eq!(h.session.token().as_deref(), Some("token-1"));
    assert!(h.session.current_profile().is_some());
}

#[tokio::test]
async fn test_register_then_login() {
    let h = Harness::new();
    let profile = h
        .session
        .register("ana", "a@b.com", StubApi::PASSWORD)
        .await
        .unwrap();

    assert_eq!(profile.username, "ana");
    assert!(h.session.is_authenticated());
    assert_eq!(h.api.calls.create_account.get(), 1);
    assert_eq!(h.api.calls.authenticate.get(), 1);
}

#[tokio::test]
async fn test_duplicate_registration_is_validation_error() {
    let h = Harness::new();
    h.api.registered.borrow_mut().push("a@b.com".to_string());

    let err = h
        .session
        .register("ana", "a@b.com", StubApi::PASSWORD)
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Validation(_)));
    assert!(!err.requires_login());
    assert!(!h.session.is_authenticated());
    assert_eq!(h.api.calls.authenticate.get(), 0);
}

// ---- logout ----

#[tokio::test]
async fn test_logout_twice_navigates_once() {
    let h = Harness::new();
    let events = record_events(&h.session);
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();
    h.router.push("/upload");

    assert!(h.session.logout());
    assert!(!h.session.logout());

    assert!(h.store.is_empty());
    assert_eq!(h.router.current_path(), "/");
    assert_eq!(h.history.entries(), vec!["/", "/upload", "/"]);
    assert_eq!(logouts(&events), 1);
}

#[test]
fn test_logout_without_session_still_returns_home() {
    let h = Harness::new();
    h.router.push("/upload");

    assert!(!h.session.logout());
    assert_eq!(h.router.current_path(), "/");
    assert_eq!(h.pages.names(), vec!["home", "upload", "home"]);
}

#[test]
fn test_logout_honors_configured_default_path() {
    let (router, _) = router_at("/");
    let pages = Recorder::new();
    router.register("/home", pages.handler("home")).unwrap();
    router.initialize("/home");

    let session = SessionManager::with_config(
        Rc::new(StubApi::new()),
        Rc::new(MemoryStore::new()),
        router.clone(),
        SessionConfig::new().default_path("/home"),
    );
    session.logout();
    assert_eq!(router.current_path(), "/home");
}

#[test]
fn test_logout_follows_router_default() {
    let (router, _) = router_at("/");
    let pages = Recorder::new();
    router.register("/home", pages.handler("home")).unwrap();
    router.register("/upload", pages.handler("upload")).unwrap();

    let session = SessionManager::new(
        Rc::new(StubApi::new()),
        Rc::new(MemoryStore::new()),
        router.clone(),
    );
    assert_eq!(session.logout_path(), "/");

    router.initialize("/home");
    router.push("/upload");
    assert_eq!(session.logout_path(), "/home");

    session.logout();
    assert_eq!(router.current_path(), "/home");
    assert_eq!(pages.names(), vec!["home", "upload", "home"]);
}

// ---- verify ----

#[test]
fn test_verify_without_credential_makes_no_calls() {
    let h = Harness::new();
    assert!(!pollster::block_on(h.session.verify()));
    assert_eq!(h.api.calls.total(), 0);
}

#[tokio::test]
async fn test_verify_rejected_credential_logs_out_once() {
    let h = Harness::new();
    let events = record_events(&h.session);
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();
    h.router.push("/upload");
    h.api.revoke("token-1");

    assert!(!h.session.verify().await);

    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.current_profile(), None);
    assert_eq!(h.router.current_path(), "/");
    assert_eq!(logouts(&events), 1);
}

#[tokio::test]
async fn test_verify_refreshes_cached_profile() {
    let h = Harness::new();
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();
    h.store.set("user_data", "{\"stale\":true}");
    assert_eq!(h.session.current_profile(), None);

    assert!(h.session.verify().await);
    assert_eq!(h.session.current_profile(), Some(sample_profile()));
}

#[tokio::test]
async fn test_verify_transport_failure_logs_out() {
    let h = Harness::new();
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();
    h.api
        .fail_next_profile(ApiError::Network("offline".to_string()));

    assert!(!h.session.verify().await);
    assert!(!h.session.is_authenticated());
}

// ---- authorized calls ----

#[tokio::test]
async fn test_authorized_passes_current_token() {
    let h = Harness::new();
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();

    let seen = h
        .session
        .authorized(|token| async move { Ok::<_, ApiError>(token) })
        .await
        .unwrap();
    assert_eq!(seen, "token-1");
}

#[tokio::test]
async fn test_concurrent_unauthorized_failures_tear_down_once() {
    let h = Harness::new();
    let events = record_events(&h.session);
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();
    h.router.push("/upload");
    h.api.revoke("token-1");

    let api = &h.api;
    let (first, second) = tokio::join!(
        h.session
            .authorized(|token| async move { api.fetch_current_profile(&token).await }),
        h.session
            .authorized(|token| async move { api.fetch_current_profile(&token).await }),
    );

    assert!(matches!(first, Err(SessionError::SessionExpired)));
    assert!(matches!(second, Err(SessionError::SessionExpired)));
    assert_eq!(logouts(&events), 1);
    assert_eq!(h.history.entries(), vec!["/", "/upload", "/"]);
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn test_stale_failure_does_not_end_new_session() {
    let h = Harness::new();
    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();
    h.api.revoke("token-1");

    let api = &h.api;
    let session = &h.session;
    let (stale, relogin) = tokio::join!(
        session.authorized(|token| async move {
            // Let the re-login finish first.
            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
            api.fetch_current_profile(&token).await
        }),
        async {
            session.logout();
            session.login("a@b.com", StubApi::PASSWORD).await
        },
    );

    assert!(matches!(stale, Err(SessionError::SessionExpired)));
    assert!(relogin.is_ok());
    assert_eq!(h.session.token().as_deref(), Some("token-2"));
}

// ---- guards ----

#[tokio::test]
async fn test_session_guards() {
    let h = Harness::new();
    h.router
        .register_guarded("/profile", h.session.auth_guard("/login"), h.pages.handler("profile"))
        .unwrap();
    h.router
        .register_guarded("/register", h.session.guest_guard("/"), h.pages.handler("register"))
        .unwrap();
    h.pages.clear();

    h.router.push("/profile");
    assert_eq!(h.router.current_path(), "/login");
    h.router.push("/register");
    assert_eq!(h.pages.names(), vec!["login", "register"]);

    h.session.login("a@b.com", StubApi::PASSWORD).await.unwrap();
    h.router.push("/register");
    assert_eq!(h.router.current_path(), "/");
    h.router.push("/profile");
    assert_eq!(h.pages.names(), vec!["login", "register", "home", "profile"]);
}
