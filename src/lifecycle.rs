//! Page lifecycle: guard verdicts and page-scoped cleanup.
//!
//! - [`NavigationAction`]: what a [`RouteGuard`](crate::RouteGuard) decides
//!   about a page about to render: continue, deny, or redirect.
//! - [`PageScope`]: one-shot cleanups owned by the active page. A page
//!   handler that installs a global listener (keyboard shortcuts on the
//!   video page, say) registers its removal with
//!   [`Router::on_exit`](crate::Router::on_exit); the router runs every
//!   cleanup before the next page's handler, so listeners never pile up
//!   across navigations.

use std::fmt;

// ============================================================================
// NavigationAction
// ============================================================================

/// Result of a navigation check.
///
/// # Example
///
/// ```
/// use vidshare_navigator::NavigationAction;
///
/// let action = NavigationAction::deny("Not authorized");
/// assert!(action.is_deny());
///
/// let action = NavigationAction::redirect("/login");
/// assert_eq!(action.redirect_path(), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Allow navigation to proceed.
    Continue,

    /// Deny navigation with a reason.
    Deny {
        /// Human-readable reason for denying navigation.
        reason: String,
    },

    /// Redirect to a different path.
    Redirect {
        /// Path to redirect to.
        to: String,
        /// Optional human-readable reason for redirecting.
        reason: Option<String>,
    },
}

impl NavigationAction {
    /// Create a result that blocks navigation with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Create a result that redirects navigation to a different path.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    /// Create a redirect result with a human-readable reason.
    pub fn redirect_with_reason(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    /// Check if this action allows navigation to continue.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if this action denies navigation.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Check if this action redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect path, if this is a redirect action.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// PageScope
// ============================================================================

/// Cleanups registered by the active page, run once when it is replaced.
#[derive(Default)]
pub struct PageScope {
    cleanups: Vec<Box<dyn FnOnce()>>,
}

impl PageScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cleanup.
    pub fn add(&mut self, cleanup: impl FnOnce() + 'static) {
        self.cleanups.push(Box::new(cleanup));
    }

    /// Number of pending cleanups.
    pub fn len(&self) -> usize {
        self.cleanups.len()
    }

    /// `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.cleanups.is_empty()
    }

    /// Move the pending cleanups out, leaving this scope empty.
    ///
    /// The router takes the scope before running it so cleanups can touch
    /// the router without re-entering a borrowed cell.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Run every cleanup in registration order.
    pub fn run(self) {
        for cleanup in self.cleanups {
            cleanup();
        }
    }
}

impl fmt::Debug for PageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageScope")
            .field("cleanups", &self.cleanups.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
