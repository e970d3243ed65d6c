//! Test utilities shared by the integration tests.
//!
//! Provides fixtures (router over an in-memory history, a scripted
//! [`AuthApi`]) and assertion helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use vidshare_navigator::*;

pub const ORIGIN: &str = "https://vidshare.example";

/// Route `log` output to the test harness when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Router over a fresh in-memory history starting at `initial`.
pub fn router_at(initial: &str) -> (Router, Rc<MemoryHistory>) {
    let history = Rc::new(MemoryHistory::new(ORIGIN, initial));
    (Router::new(history.clone()), history)
}

// ============================================================================
// Recording handlers
// ============================================================================

/// Records every invocation of the handlers it hands out.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<(String, RouteParams)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that records `(name, params)` when invoked.
    pub fn handler(&self, name: &str) -> impl Fn(&RouteParams) + 'static {
        let calls = Rc::clone(&self.calls);
        let name = name.to_string();
        move |params| calls.borrow_mut().push((name.clone(), params.clone()))
    }

    /// Handler names in invocation order.
    pub fn names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    /// The most recent invocation.
    pub fn last(&self) -> Option<(String, RouteParams)> {
        self.calls.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// Assert that route parameters contain expected key-value pair
pub fn assert_param_equals(params: &RouteParams, key: &str, expected: &str) {
    let value = params.get(key);
    assert!(
        value.is_some(),
        "Parameter '{}' not found in RouteParams",
        key
    );
    assert_eq!(
        value.unwrap(),
        expected,
        "Parameter '{}' has value '{}', expected '{}'",
        key,
        value.unwrap(),
        expected
    );
}

// ============================================================================
// Scripted AuthApi
// ============================================================================

pub fn sample_profile() -> Profile {
    Profile {
        id: "65f0c0ffee".to_string(),
        username: "ana".to_string(),
        email: "a@b.com".to_string(),
        profile_image: Some("/static/img/ana.png".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

/// Per-method call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub authenticate: Cell<usize>,
    pub fetch_profile: Cell<usize>,
    pub create_account: Cell<usize>,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.authenticate.get() + self.fetch_profile.get() + self.create_account.get()
    }
}

/// Backend stub: accepts `password` for any identifier, issues `token-N`,
/// and answers profile requests for tokens it issued and has not revoked.
///
/// Every method yields once before answering so concurrent calls
/// interleave under `tokio::join!`.
#[derive(Default)]
pub struct StubApi {
    pub calls: CallCounts,
    issued: RefCell<Vec<String>>,
    revoked: RefCell<Vec<String>>,
    scripted_profile_errors: RefCell<VecDeque<ApiError>>,
    pub registered: RefCell<Vec<String>>,
}

impl StubApi {
    pub const PASSWORD: &'static str = "password";

    pub fn new() -> Self {
        Self::default()
    }

    /// Make the backend reject `token` from now on.
    pub fn revoke(&self, token: &str) {
        self.revoked.borrow_mut().push(token.to_string());
    }

    /// Fail the next profile request with `error`.
    pub fn fail_next_profile(&self, error: ApiError) {
        self.scripted_profile_errors.borrow_mut().push_back(error);
    }

    pub fn accepts(&self, token: &str) -> bool {
        self.issued.borrow().iter().any(|t| t == token)
            && !self.revoked.borrow().iter().any(|t| t == token)
    }
}

async fn yield_once() {
    tokio::task::yield_now().await;
}

#[async_trait(?Send)]
impl AuthApi for StubApi {
    async fn authenticate(&self, _identifier: &str, secret: &str) -> Result<AccessToken, ApiError> {
        self.calls.authenticate.set(self.calls.authenticate.get() + 1);
        yield_once().await;
        if secret != Self::PASSWORD {
            return Err(ApiError::Unauthorized(
                "Incorrect email or password".to_string(),
            ));
        }
        let token = format!("token-{}", self.issued.borrow().len() + 1);
        self.issued.borrow_mut().push(token.clone());
        Ok(AccessToken::bearer(token))
    }

    async fn fetch_current_profile(&self, token: &str) -> Result<Profile, ApiError> {
        self.calls.fetch_profile.set(self.calls.fetch_profile.get() + 1);
        yield_once().await;
        if let Some(error) = self.scripted_profile_errors.borrow_mut().pop_front() {
            return Err(error);
        }
        if self.accepts(token) {
            Ok(sample_profile())
        } else {
            Err(ApiError::Unauthorized(
                "Could not validate credentials".to_string(),
            ))
        }
    }

    async fn create_account(
        &self,
        username: &str,
        identifier: &str,
        _secret: &str,
    ) -> Result<Profile, ApiError> {
        self.calls.create_account.set(self.calls.create_account.get() + 1);
        yield_once().await;
        if self.registered.borrow().iter().any(|e| e == identifier) {
            return Err(ApiError::Validation("Email already registered".to_string()));
        }
        self.registered.borrow_mut().push(identifier.to_string());
        Ok(Profile {
            username: username.to_string(),
            email: identifier.to_string(),
            ..sample_profile()
        })
    }
}

/// A session wired to a stub backend and a router with `/`, `/login` and
/// `/upload` registered and initialized on `/`.
pub struct Harness {
    pub api: Rc<StubApi>,
    pub store: Rc<MemoryStore>,
    pub history: Rc<MemoryHistory>,
    pub router: Router,
    pub session: SessionManager,
    pub pages: Recorder,
}

impl Harness {
    pub fn new() -> Self {
        init_logging();
        let (router, history) = router_at("/");
        let pages = Recorder::new();
        router.register("/", pages.handler("home")).unwrap();
        router.register("/login", pages.handler("login")).unwrap();
        router.register("/upload", pages.handler("upload")).unwrap();
        router.initialize("/");

        let api = Rc::new(StubApi::new());
        let store = Rc::new(MemoryStore::new());
        let session = SessionManager::new(api.clone(), store.clone(), router.clone());

        Self {
            api,
            store,
            history,
            router,
            session,
            pages,
        }
    }
}
