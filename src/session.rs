//! Session lifecycle: credential, cached profile, and forced logout.
//!
//! [`SessionManager`] owns two entries in a [`CredentialStore`]: the bearer
//! token and the JSON-serialized [`Profile`]. Both are written together
//! after a fully successful login and removed together on logout, so the
//! store never holds one without the other.
//!
//! Every authenticated request goes through
//! [`authorized`](SessionManager::authorized). An
//! [`ApiError::Unauthorized`] answer tears the session down and sends the
//! router back to the default path. Teardown is tied to a session *epoch*:
//! when several in-flight requests fail at once, only the first one whose
//! epoch is still current logs out.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use vidshare_navigator::{AuthApi, MemoryHistory, MemoryStore, Router, SessionManager};
//!
//! # async fn run(api: Rc<dyn AuthApi>) -> Result<(), vidshare_navigator::SessionError> {
//! let router = Router::new(Rc::new(MemoryHistory::new("https://v.example", "/")));
//! let session = SessionManager::new(api, Rc::new(MemoryStore::new()), router.clone());
//!
//! let profile = session.login("a@b.com", "pw").await?;
//! println!("signed in as {}", profile.username);
//!
//! let videos = session
//!     .authorized(|token| async move {
//!         // issue the request with `Authorization: Bearer {token}`
//!         Ok::<_, vidshare_navigator::ApiError>(vec![token])
//!     })
//!     .await?;
//! # let _ = videos;
//! # Ok(())
//! # }
//! ```

use crate::api::{AuthApi, Profile};
use crate::error::{ApiError, SessionError};
#[cfg(feature = "guard")]
use crate::guards::{AuthGuard, GuestGuard};
use crate::router::Router;
use crate::storage::CredentialStore;
use crate::{debug_log, error_log, info_log, warn_log};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

// ============================================================================
// Configuration
// ============================================================================

/// Storage keys and the logout destination.
///
/// ```
/// use vidshare_navigator::SessionConfig;
///
/// let config = SessionConfig::new().default_path("/home");
/// assert_eq!(config.token_key, "auth_token");
/// assert_eq!(config.default_path.as_deref(), Some("/home"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Key of the bearer token.
    pub token_key: String,
    /// Key of the serialized profile.
    pub profile_key: String,
    /// Where logout sends the router. Unset means the router's default
    /// pattern, or `/` before the router is initialized.
    pub default_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: "auth_token".to_string(),
            profile_key: "user_data".to_string(),
            default_path: None,
        }
    }
}

impl SessionConfig {
    /// Default keys, logout to the router's default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token key.
    #[must_use]
    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    /// Set the profile key.
    #[must_use]
    pub fn profile_key(mut self, key: impl Into<String>) -> Self {
        self.profile_key = key.into();
        self
    }

    /// Set the path logout navigates to, overriding the router's default.
    #[must_use]
    pub fn default_path(mut self, path: impl Into<String>) -> Self {
        self.default_path = Some(path.into());
        self
    }
}

// ============================================================================
// Events
// ============================================================================

/// Session transition, delivered to subscribers after the store changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(Profile),
    LoggedOut,
}

/// Handle returned by [`SessionManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SessionListener = Rc<dyn Fn(&SessionEvent)>;

// ============================================================================
// SessionManager
// ============================================================================

struct SessionInner {
    api: Rc<dyn AuthApi>,
    store: Rc<dyn CredentialStore>,
    router: Router,
    config: SessionConfig,
    epoch: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, SessionListener)>>,
    next_subscription: Cell<u64>,
}

/// Session handle. Clones share the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Rc<SessionInner>,
}

impl SessionManager {
    /// Create a session with the default [`SessionConfig`].
    pub fn new(api: Rc<dyn AuthApi>, store: Rc<dyn CredentialStore>, router: Router) -> Self {
        Self::with_config(api, store, router, SessionConfig::default())
    }

    /// Create a session with custom keys or logout destination.
    pub fn with_config(
        api: Rc<dyn AuthApi>,
        store: Rc<dyn CredentialStore>,
        router: Router,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                api,
                store,
                router,
                config,
                epoch: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// The router this session navigates on logout.
    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Incremented on every login and every effective teardown.
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.get()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// `true` if a credential is stored. No network call.
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.contains(&self.inner.config.token_key)
    }

    /// The stored credential.
    pub fn token(&self) -> Option<String> {
        self.inner.store.get(&self.inner.config.token_key)
    }

    /// The cached profile. A record that no longer deserializes reads as
    /// absent.
    pub fn current_profile(&self) -> Option<Profile> {
        let raw = self.inner.store.get(&self.inner.config.profile_key)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                error_log!(
                    "Cached profile under '{}' is corrupt: {}",
                    self.inner.config.profile_key,
                    e
                );
                None
            }
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Authenticate, fetch the profile with the new token, then persist
    /// both.
    ///
    /// Nothing is written unless both requests succeed, so a failed login
    /// leaves the store exactly as it was.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Profile, SessionError> {
        debug_log!("Logging in '{}'", identifier);

        let token = self.inner.api.authenticate(identifier, secret).await?;
        let profile = self
            .inner
            .api
            .fetch_current_profile(&token.access_token)
            .await?;
        let serialized = serde_json::to_string(&profile)?;

        let config = &self.inner.config;
        self.inner.store.set(&config.token_key, &token.access_token);
        self.inner.store.set(&config.profile_key, &serialized);
        self.inner.epoch.set(self.inner.epoch.get() + 1);

        info_log!("Logged in as '{}'", profile.username);
        self.notify(&SessionEvent::LoggedIn(profile.clone()));
        Ok(profile)
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register(
        &self,
        username: &str,
        identifier: &str,
        secret: &str,
    ) -> Result<Profile, SessionError> {
        self.inner
            .api
            .create_account(username, identifier, secret)
            .await?;
        info_log!("Registered account '{}'", username);
        self.login(identifier, secret).await
    }

    /// Remove the credential and profile, then return to the default path.
    ///
    /// Idempotent. Subscribers hear [`SessionEvent::LoggedOut`] only when a
    /// session was actually torn down, and a repeated logout does not push
    /// another history entry while the router is already on the default
    /// path. Returns whether anything was torn down.
    pub fn logout(&self) -> bool {
        let torn_down = self.tear_down();
        let default_path = self.logout_path();

        if torn_down || self.inner.router.current_path() != default_path {
            self.inner.router.push(&default_path);
        }
        if torn_down {
            self.notify(&SessionEvent::LoggedOut);
        }
        torn_down
    }

    /// Where [`logout`](Self::logout) navigates.
    pub fn logout_path(&self) -> String {
        self.inner
            .config
            .default_path
            .clone()
            .or_else(|| self.inner.router.default_pattern())
            .unwrap_or_else(|| "/".to_string())
    }

    fn tear_down(&self) -> bool {
        let config = &self.inner.config;
        let store = &self.inner.store;
        let present = store.contains(&config.token_key) || store.contains(&config.profile_key);

        store.remove(&config.token_key);
        store.remove(&config.profile_key);

        if present {
            self.inner.epoch.set(self.inner.epoch.get() + 1);
            info_log!("Session cleared (epoch {})", self.inner.epoch.get());
        }
        present
    }

    /// Check the stored credential against the backend.
    ///
    /// Without a credential this returns `false` without any request. On
    /// success the cached profile is refreshed. Any failure logs out, unless
    /// the session already changed while the request was in flight.
    pub async fn verify(&self) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        let epoch = self.epoch();

        match self.inner.api.fetch_current_profile(&token).await {
            Ok(profile) => {
                if self.token().as_deref() != Some(token.as_str()) {
                    debug_log!("Credential changed during verification; profile not cached");
                    return self.is_authenticated();
                }
                match serde_json::to_string(&profile) {
                    Ok(serialized) => self
                        .inner
                        .store
                        .set(&self.inner.config.profile_key, &serialized),
                    Err(e) => {
                        error_log!("Failed to cache profile: {}", e);
                    }
                }
                true
            }
            Err(e) => {
                warn_log!("Session verification failed: {}", e);
                self.expire(epoch);
                false
            }
        }
    }

    /// Run an authenticated request with the current credential.
    ///
    /// [`ApiError::Unauthorized`] tears the session down (once per epoch)
    /// and comes back as [`SessionError::SessionExpired`]; every other error
    /// is returned without touching the session. Without a stored
    /// credential `call` is not invoked.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, SessionError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(token) = self.token() else {
            debug_log!("Authenticated call attempted without a credential");
            return Err(SessionError::SessionExpired);
        };
        let epoch = self.epoch();

        match call(token).await {
            Ok(value) => Ok(value),
            Err(ApiError::Unauthorized(msg)) => {
                warn_log!("Request rejected as unauthorized: {}", msg);
                self.expire(epoch);
                Err(SessionError::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Log out if the session that issued a failed request is still the
    /// current one.
    fn expire(&self, epoch: u64) {
        if self.epoch() == epoch {
            self.logout();
        } else {
            debug_log!(
                "Session epoch moved from {} to {}; teardown already handled",
                epoch,
                self.epoch()
            );
        }
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Call `listener` after every login and effective logout.
    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    fn notify(&self, event: &SessionEvent) {
        let listeners: Vec<SessionListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    // ========================================================================
    // Guards
    // ========================================================================

    /// Guard for pages that need a signed-in user.
    #[cfg(feature = "guard")]
    pub fn auth_guard(&self, redirect: impl Into<String>) -> AuthGuard {
        let (store, key) = self.credential_probe();
        AuthGuard::new(move || store.contains(&key), redirect)
    }

    /// Guard for pages that only make sense signed out.
    #[cfg(feature = "guard")]
    pub fn guest_guard(&self, redirect: impl Into<String>) -> GuestGuard {
        let (store, key) = self.credential_probe();
        GuestGuard::new(move || store.contains(&key), redirect)
    }

    // Guards live inside the router's table, so they must not own the
    // session (which owns the router).
    #[cfg(feature = "guard")]
    fn credential_probe(&self) -> (Rc<dyn CredentialStore>, String) {
        (
            Rc::clone(&self.inner.store),
            self.inner.config.token_key.clone(),
        )
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .field("epoch", &self.epoch())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
