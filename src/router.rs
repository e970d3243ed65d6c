//! The router: route registration, dispatch, and history integration.
//!
//! [`Router`] is a cheap-to-clone handle over single-threaded shared state.
//! It is constructed once at startup and handed to every page controller
//! (and to the [`SessionManager`](crate::SessionManager)), instead of living
//! in a global.
//!
//! # Dispatch
//!
//! [`Router::navigate`] runs, synchronously and in order:
//!
//! 1. the previous page's [`on_exit`](Router::on_exit) cleanups
//! 2. resolution (exact key, then patterns in registration order, then
//!    the default pattern)
//! 3. the [`NavigationState`] update, which starts a new generation
//! 4. `history.pushState`, only for [`NavigationOrigin::Push`]
//! 5. the handler, with its captured params
//!
//! No `RefCell` borrow is held while a handler or cleanup runs, so handlers
//! may register routes or navigate again (redirects).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use vidshare_navigator::{MemoryHistory, Router};
//!
//! let router = Router::new(Rc::new(MemoryHistory::new("https://v.example", "/")));
//! router.register("/", |_| println!("home")).unwrap();
//! router.register("/video/:id", |params| {
//!     println!("video {}", params.get("id").unwrap());
//! }).unwrap();
//! router.initialize("/");
//!
//! let outcome = router.push("/video/77");
//! assert_eq!(outcome.pattern(), Some("/video/:id"));
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ResolutionCache};
use crate::error::{NavigationOutcome, RouteError};
#[cfg(feature = "guard")]
use crate::guards::RouteGuard;
use crate::history::{ClickDisposition, HistoryBackend, LinkClick};
#[cfg(feature = "guard")]
use crate::lifecycle::NavigationAction;
use crate::lifecycle::PageScope;
use crate::matching::{strip_query, RoutePattern};
use crate::route::{MatchKind, RouteMatch, RouteTable};
use crate::state::{Generation, NavigationOrigin, NavigationState, NavigationTicket, RouterPhase};
use crate::{debug_log, info_log, trace_log, QueryParams, RouteParams};
#[cfg(feature = "guard")]
use crate::{error_log, warn_log};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Maximum nested dispatch depth a guard redirect may start from.
#[cfg(feature = "guard")]
const MAX_REDIRECT_DEPTH: usize = 5;

// ============================================================================
// NavigationRequest
// ============================================================================

/// What a guard sees about the page about to render.
///
/// ```
/// use vidshare_navigator::NavigationRequest;
///
/// let request = NavigationRequest::with_from("/upload".to_string(), "/".to_string());
/// assert_eq!(request.to, "/upload");
/// assert_eq!(request.from.as_deref(), Some("/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// The path we're navigating from (if any)
    pub from: Option<String>,

    /// The path we're navigating to
    pub to: String,

    /// Route parameters extracted from the path
    pub params: RouteParams,
}

impl NavigationRequest {
    /// Create a new navigation request.
    pub fn new(to: String) -> Self {
        Self {
            from: None,
            to,
            params: RouteParams::new(),
        }
    }

    /// Create a navigation request with a source path.
    pub fn with_from(to: String, from: String) -> Self {
        Self {
            from: Some(from),
            to,
            params: RouteParams::new(),
        }
    }

    /// Set route parameters.
    #[must_use]
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }
}

// ============================================================================
// Router
// ============================================================================

struct RouterInner {
    history: Rc<dyn HistoryBackend>,
    table: RefCell<RouteTable>,
    default_pattern: RefCell<Option<String>>,
    state: RefCell<NavigationState>,
    generation: Generation,
    page_scope: RefCell<PageScope>,
    listening: Cell<bool>,
    depth: Cell<usize>,
    #[cfg(feature = "cache")]
    cache: RefCell<ResolutionCache>,
}

/// Client-side router handle.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

/// Non-owning router handle, for closures stored inside the router itself.
#[derive(Clone)]
pub struct WeakRouter {
    inner: Weak<RouterInner>,
}

impl WeakRouter {
    /// Get the router back, unless it has been dropped.
    pub fn upgrade(&self) -> Option<Router> {
        self.inner.upgrade().map(|inner| Router { inner })
    }
}

/// Decrements the dispatch depth even if a handler panics.
struct DispatchGuard<'a>(&'a Cell<usize>);

impl<'a> DispatchGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl Router {
    /// Create a router over the given history backend. No routes, no default.
    pub fn new(history: Rc<dyn HistoryBackend>) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                history,
                table: RefCell::new(RouteTable::new()),
                default_pattern: RefCell::new(None),
                state: RefCell::new(NavigationState::default()),
                generation: Generation::default(),
                page_scope: RefCell::new(PageScope::new()),
                listening: Cell::new(false),
                depth: Cell::new(0),
                #[cfg(feature = "cache")]
                cache: RefCell::new(ResolutionCache::new()),
            }),
        }
    }

    /// Non-owning handle to this router.
    pub fn downgrade(&self) -> WeakRouter {
        WeakRouter {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `handler` for `pattern`.
    ///
    /// Registering the same pattern string again replaces the handler and
    /// keeps the original position in the match order.
    pub fn register<F>(&self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&RouteParams) + 'static,
    {
        let parsed = RoutePattern::parse(pattern)?;
        let replaced = self
            .inner
            .table
            .borrow_mut()
            .insert(parsed, Rc::new(handler));

        if replaced {
            info_log!("Replaced handler for route '{}'", pattern);
        } else {
            info_log!("Registered route '{}'", pattern);
        }

        #[cfg(feature = "cache")]
        self.inner.cache.borrow_mut().clear();
        Ok(())
    }

    /// Register a page that only renders when `guard` allows it.
    ///
    /// On [`NavigationAction::Redirect`] the router pushes the redirect
    /// target instead of rendering; on [`NavigationAction::Deny`] the
    /// handler is skipped and the current path stays as navigated.
    #[cfg(feature = "guard")]
    pub fn register_guarded<G, F>(&self, pattern: &str, guard: G, handler: F) -> Result<(), RouteError>
    where
        G: RouteGuard,
        F: Fn(&RouteParams) + 'static,
    {
        let weak = self.downgrade();
        self.register(pattern, move |params| {
            let Some(router) = weak.upgrade() else {
                return;
            };

            let request = router.request_for(params);
            match guard.check(&request) {
                NavigationAction::Continue => handler(params),
                NavigationAction::Deny { reason } => {
                    warn_log!(
                        "Guard '{}' denied '{}': {}",
                        guard.name(),
                        request.to,
                        reason
                    );
                }
                NavigationAction::Redirect { to, reason } => {
                    if router.inner.depth.get() > MAX_REDIRECT_DEPTH {
                        error_log!(
                            "Redirect loop detected (depth {}) navigating to '{}'",
                            router.inner.depth.get(),
                            to
                        );
                        return;
                    }
                    debug_log!(
                        "Guard '{}' redirecting '{}' to '{}': {:?}",
                        guard.name(),
                        request.to,
                        to,
                        reason
                    );
                    router.push(&to);
                }
            }
        })
    }

    #[cfg(feature = "guard")]
    fn request_for(&self, params: &RouteParams) -> NavigationRequest {
        let state = self.inner.state.borrow();
        let request = match &state.previous_path {
            Some(from) => NavigationRequest::with_from(state.path.clone(), from.clone()),
            None => NavigationRequest::new(state.path.clone()),
        };
        request.with_params(params.clone())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Set the default pattern, start accepting history and link events,
    /// and dispatch the backend's current location without pushing.
    ///
    /// Calling it again only changes the default and re-dispatches; event
    /// handling is attached once per router.
    pub fn initialize(&self, default_pattern: &str) -> NavigationOutcome {
        *self.inner.default_pattern.borrow_mut() = Some(default_pattern.to_string());

        if self.inner.listening.replace(true) {
            debug_log!("Router already listening; default is now '{}'", default_pattern);
        } else {
            info_log!(
                "Router listening for history and link events (default '{}')",
                default_pattern
            );
        }

        let location = self.inner.history.location();
        self.navigate(&location, NavigationOrigin::Pop)
    }

    /// `true` once [`initialize`](Self::initialize) has run.
    pub fn is_listening(&self) -> bool {
        self.inner.listening.get()
    }

    /// Register a one-shot cleanup for the page currently rendered.
    ///
    /// Runs at the start of the next navigation, before the next handler.
    pub fn on_exit(&self, cleanup: impl FnOnce() + 'static) {
        self.inner.page_scope.borrow_mut().add(cleanup);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate with a new history entry.
    pub fn push(&self, path: &str) -> NavigationOutcome {
        self.navigate(path, NavigationOrigin::Push)
    }

    /// Resolve `path`, update the navigation state, push a history entry
    /// iff `origin` is [`NavigationOrigin::Push`], then run the handler.
    ///
    /// Never fails: unmatched paths fall back to the default pattern, and
    /// without one the navigation still updates state and history but runs
    /// no handler.
    pub fn navigate(&self, path: &str, origin: NavigationOrigin) -> NavigationOutcome {
        let previous_page = self.inner.page_scope.borrow_mut().take();
        if !previous_page.is_empty() {
            trace_log!("Running {} exit cleanups", previous_page.len());
        }
        previous_page.run();

        let (route_path, query) = strip_query(path);
        let resolved = self.resolve(route_path);
        let generation = self.inner.generation.advance();

        {
            let mut state = self.inner.state.borrow_mut();
            let previous_path = (state.generation > 0).then(|| std::mem::take(&mut state.path));
            *state = NavigationState {
                path: path.to_string(),
                previous_path,
                origin,
                query: query.map(QueryParams::from_query_string).unwrap_or_default(),
                pattern: resolved.as_ref().map(|m| m.pattern.clone()),
                params: resolved
                    .as_ref()
                    .map(|m| m.params.clone())
                    .unwrap_or_default(),
                generation,
            };
        }

        if origin == NavigationOrigin::Push {
            self.inner.history.push_state(path);
        }

        let Some(route_match) = resolved else {
            debug_log!("No route for '{}' and no default registered", path);
            return NavigationOutcome::Unhandled {
                path: path.to_string(),
            };
        };

        debug_log!(
            "Dispatching '{}' to '{}' ({:?}, {:?}, generation {})",
            path,
            route_match.pattern,
            route_match.kind,
            origin,
            generation
        );

        let handler = self.inner.table.borrow().handler(&route_match.pattern);
        if let Some(handler) = handler {
            let _dispatching = DispatchGuard::enter(&self.inner.depth);
            handler(&route_match.params);
        }

        match route_match.kind {
            MatchKind::Exact | MatchKind::Pattern => NavigationOutcome::Matched {
                path: path.to_string(),
                pattern: route_match.pattern,
            },
            MatchKind::Fallback => NavigationOutcome::Fallback {
                path: path.to_string(),
                pattern: route_match.pattern,
            },
        }
    }

    /// Re-dispatch the backend's current location after a `popstate`.
    ///
    /// Returns `None` before [`initialize`](Self::initialize).
    pub fn handle_pop(&self) -> Option<NavigationOutcome> {
        if !self.is_listening() {
            return None;
        }
        let location = self.inner.history.location();
        Some(self.navigate(&location, NavigationOrigin::Pop))
    }

    /// Handle a click on an anchor element.
    ///
    /// Same-origin, unmodified clicks are dispatched with a new history
    /// entry and reported as [`ClickDisposition::Intercepted`]. Relative
    /// hrefs resolve against the backend's current location.
    pub fn handle_link_click(&self, click: &LinkClick) -> ClickDisposition {
        if !self.is_listening() {
            return ClickDisposition::PassThrough;
        }
        let history = &self.inner.history;
        match click.in_app_path(&history.origin(), &history.location()) {
            Some(path) => {
                self.push(&path);
                ClickDisposition::Intercepted
            }
            None => ClickDisposition::PassThrough,
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a path without dispatching (query ignored).
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let (route_path, _) = strip_query(path);
        self.resolve_direct(route_path).or_else(|| {
            let default = self.inner.default_pattern.borrow();
            self.inner.table.borrow().fallback(default.as_deref())
        })
    }

    #[cfg(feature = "cache")]
    fn resolve_direct(&self, route_path: &str) -> Option<RouteMatch> {
        let mut cache = self.inner.cache.borrow_mut();
        if let Some(cached) = cache.get(route_path) {
            return cached;
        }
        let resolved = self.inner.table.borrow().resolve(route_path);
        cache.insert(route_path.to_string(), resolved.clone());
        resolved
    }

    #[cfg(not(feature = "cache"))]
    fn resolve_direct(&self, route_path: &str) -> Option<RouteMatch> {
        self.inner.table.borrow().resolve(route_path)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Return the current navigation path, query included.
    pub fn current_path(&self) -> String {
        self.inner.state.borrow().path.clone()
    }

    /// Snapshot of the navigation state.
    pub fn state(&self) -> NavigationState {
        self.inner.state.borrow().clone()
    }

    /// The default pattern set by [`initialize`](Self::initialize).
    pub fn default_pattern(&self) -> Option<String> {
        self.inner.default_pattern.borrow().clone()
    }

    /// A ticket for the current navigation.
    pub fn ticket(&self) -> NavigationTicket {
        self.inner.generation.ticket()
    }

    /// Current phase.
    pub fn phase(&self) -> RouterPhase {
        if self.inner.depth.get() > 0 {
            RouterPhase::Dispatching
        } else {
            RouterPhase::Idle
        }
    }

    /// `true` while a handler is running.
    pub fn is_dispatching(&self) -> bool {
        self.phase() == RouterPhase::Dispatching
    }

    /// `true` if `pattern` is registered (exact pattern string).
    pub fn has_route(&self, pattern: &str) -> bool {
        self.inner.table.borrow().contains(pattern)
    }

    /// Registered patterns in match order.
    pub fn patterns(&self) -> Vec<String> {
        self.inner
            .table
            .borrow()
            .patterns()
            .map(str::to_string)
            .collect()
    }

    /// Resolution cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.borrow().stats().clone()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("path", &self.inner.state.borrow().path)
            .field("routes", &self.inner.table.borrow().len())
            .field("default", &self.inner.default_pattern.borrow())
            .field("listening", &self.inner.listening.get())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
