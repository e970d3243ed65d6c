//! Route guards for pages that depend on the session.
//!
//! A guard runs right before a page handler registered with
//! [`Router::register_guarded`](crate::Router::register_guarded). It can let
//! the page render, skip it, or redirect elsewhere (with a new history
//! entry). The router itself stays unaware of sessions; guards get their
//! answer from whatever closure they were built with, typically
//! [`SessionManager::is_authenticated`](crate::SessionManager::is_authenticated).
//!
//! | Guard | Purpose |
//! |-------|---------|
//! | [`AuthGuard`] | Page needs a signed-in user (upload, profile) |
//! | [`GuestGuard`] | Page only makes sense signed out (login, register) |
//! | [`guard_fn`] | Anything else, from a closure |
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use vidshare_navigator::{AuthGuard, MemoryHistory, Router};
//!
//! let router = Router::new(Rc::new(MemoryHistory::new("https://v.example", "/")));
//! router.register("/login", |_| {}).unwrap();
//! router
//!     .register_guarded("/upload", AuthGuard::new(|| false, "/login"), |_| {})
//!     .unwrap();
//!
//! router.push("/upload");
//! assert_eq!(router.current_path(), "/login");
//! ```

use crate::lifecycle::NavigationAction;
use crate::NavigationRequest;

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for route guards that control access to pages.
pub trait RouteGuard: 'static {
    /// Check if the page should render.
    ///
    /// Returns:
    /// - [`NavigationAction::Continue`] to render
    /// - [`NavigationAction::Deny`] to skip the handler
    /// - [`NavigationAction::Redirect`] to push a different path instead
    fn check(&self, request: &NavigationRequest) -> NavigationAction;

    /// Guard name for debugging and error messages.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a function or closure.
///
/// ```
/// use vidshare_navigator::{guard_fn, NavigationAction};
///
/// let numeric_ids_only = guard_fn(|request| {
///     match request.params.get_as::<u64>("id") {
///         Some(_) => NavigationAction::Continue,
///         None => NavigationAction::redirect("/"),
///     }
/// });
/// ```
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&NavigationRequest) -> NavigationAction + 'static,
{
    FnGuard { f }
}

/// Guard created from a function or closure.
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&NavigationRequest) -> NavigationAction + 'static,
{
    fn check(&self, request: &NavigationRequest) -> NavigationAction {
        (self.f)(request)
    }
}

// ============================================================================
// AuthGuard / GuestGuard
// ============================================================================

/// Function type for authentication checks.
pub type AuthCheckFn = Box<dyn Fn() -> bool>;

/// Redirects to `redirect_path` unless the user is signed in.
pub struct AuthGuard {
    check_fn: AuthCheckFn,
    redirect_path: String,
}

impl AuthGuard {
    /// Create a new auth guard with a custom check function and redirect path.
    pub fn new<F>(check_fn: F, redirect_path: impl Into<String>) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
            redirect_path: redirect_path.into(),
        }
    }
}

impl RouteGuard for AuthGuard {
    fn check(&self, _request: &NavigationRequest) -> NavigationAction {
        if (self.check_fn)() {
            NavigationAction::Continue
        } else {
            NavigationAction::redirect_with_reason(&self.redirect_path, "Authentication required")
        }
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }
}

/// Redirects to `redirect_path` when the user is already signed in.
pub struct GuestGuard {
    check_fn: AuthCheckFn,
    redirect_path: String,
}

impl GuestGuard {
    /// `check_fn` answers "is the user signed in?", same as for [`AuthGuard`].
    pub fn new<F>(check_fn: F, redirect_path: impl Into<String>) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
            redirect_path: redirect_path.into(),
        }
    }
}

impl RouteGuard for GuestGuard {
    fn check(&self, _request: &NavigationRequest) -> NavigationAction {
        if (self.check_fn)() {
            NavigationAction::redirect_with_reason(&self.redirect_path, "Already signed in")
        } else {
            NavigationAction::Continue
        }
    }

    fn name(&self) -> &'static str {
        "GuestGuard"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NavigationRequest {
        NavigationRequest::new("/upload".to_string())
    }

    #[test]
    fn test_auth_guard() {
        assert!(AuthGuard::new(|| true, "/login").check(&request()).is_continue());

        let action = AuthGuard::new(|| false, "/login").check(&request());
        assert_eq!(action.redirect_path(), Some("/login"));
    }

    #[test]
    fn test_guest_guard() {
        assert!(GuestGuard::new(|| false, "/").check(&request()).is_continue());

        let action = GuestGuard::new(|| true, "/").check(&request());
        assert_eq!(action.redirect_path(), Some("/"));
    }

    #[test]
    fn test_guard_fn_sees_params() {
        let guard = guard_fn(|request| {
            if request.params.contains("id") {
                NavigationAction::Continue
            } else {
                NavigationAction::deny("missing id")
            }
        });

        assert!(guard.check(&request()).is_deny());

        let with_id = request().with_params([("id", "7")].into_iter().collect());
        assert!(guard.check(&with_id).is_continue());
        assert_eq!(guard.name(), "RouteGuard");
    }
}
