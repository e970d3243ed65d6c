//! Browser history integration.
//!
//! The router never talks to `window.history` directly. A host adapter
//! implements [`HistoryBackend`] (a thin wrapper over `pushState` and
//! `location`), forwards `popstate` events to
//! [`Router::handle_pop`](crate::Router::handle_pop) and anchor clicks to
//! [`Router::handle_link_click`](crate::Router::handle_link_click).
//!
//! [`MemoryHistory`] is a complete in-process implementation with a
//! back/forward stack, used by tests and non-browser hosts.

use std::cell::RefCell;
use url::Url;

/// Access to the host's session history.
pub trait HistoryBackend {
    /// Current location as path plus query (e.g. `/?search=cats`).
    fn location(&self) -> String;

    /// Append a new entry and make it current (`history.pushState`).
    fn push_state(&self, path: &str);

    /// Scheme, host and port of the page, e.g. `https://vidshare.example`.
    fn origin(&self) -> String;
}

// ============================================================================
// MemoryHistory
// ============================================================================

#[derive(Debug, Clone)]
struct Stack {
    entries: Vec<String>,
    current: usize,
}

/// In-memory history stack.
///
/// [`back`](Self::back) and [`forward`](Self::forward) move the cursor the
/// way the browser does before it fires `popstate`; the caller then invokes
/// [`Router::handle_pop`](crate::Router::handle_pop).
///
/// ```
/// use vidshare_navigator::{HistoryBackend, MemoryHistory};
///
/// let history = MemoryHistory::new("https://vidshare.example", "/");
/// history.push_state("/video/1");
/// assert_eq!(history.back().as_deref(), Some("/"));
/// assert_eq!(history.location(), "/");
/// ```
#[derive(Debug)]
pub struct MemoryHistory {
    origin: String,
    stack: RefCell<Stack>,
}

impl MemoryHistory {
    /// Start with a single entry at `initial`.
    pub fn new(origin: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            stack: RefCell::new(Stack {
                entries: vec![initial.into()],
                current: 0,
            }),
        }
    }

    /// Move one entry back. Returns the new location, or `None` at the start.
    pub fn back(&self) -> Option<String> {
        let mut stack = self.stack.borrow_mut();
        if stack.current > 0 {
            stack.current -= 1;
            Some(stack.entries[stack.current].clone())
        } else {
            None
        }
    }

    /// Move one entry forward. Returns the new location, or `None` at the end.
    pub fn forward(&self) -> Option<String> {
        let mut stack = self.stack.borrow_mut();
        if stack.current + 1 < stack.entries.len() {
            stack.current += 1;
            Some(stack.entries[stack.current].clone())
        } else {
            None
        }
    }

    /// Check if can go back.
    pub fn can_go_back(&self) -> bool {
        self.stack.borrow().current > 0
    }

    /// Check if can go forward.
    pub fn can_go_forward(&self) -> bool {
        let stack = self.stack.borrow();
        stack.current + 1 < stack.entries.len()
    }

    /// Total number of entries, including forward entries.
    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    /// Never true: the stack always holds the initial entry.
    pub fn is_empty(&self) -> bool {
        self.stack.borrow().entries.is_empty()
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<String> {
        self.stack.borrow().entries.clone()
    }
}

impl HistoryBackend for MemoryHistory {
    fn location(&self) -> String {
        let stack = self.stack.borrow();
        stack.entries[stack.current].clone()
    }

    fn push_state(&self, path: &str) {
        let mut stack = self.stack.borrow_mut();
        // Remove forward history when pushing
        let keep = stack.current + 1;
        stack.entries.truncate(keep);
        stack.entries.push(path.to_string());
        stack.current += 1;
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }
}

// ============================================================================
// Link clicks
// ============================================================================

/// A click on an anchor element, as reported by the host adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClick {
    /// The anchor's resolved or literal `href`.
    pub href: String,
    /// Mouse button; `0` is the primary button.
    pub button: u16,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    /// The anchor's `target` attribute.
    pub target: Option<String>,
}

impl LinkClick {
    /// A plain primary-button click on `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    /// Set the `target` attribute.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// `true` if the user asked the browser to open the link elsewhere.
    pub fn is_modified(&self) -> bool {
        self.button != 0 || self.ctrl || self.meta || self.shift || self.alt
    }

    /// The in-app path this click should navigate to, or `None` if the
    /// browser should handle it.
    ///
    /// `href` is resolved the way the browser resolves it, against
    /// `current` (the path plus query being shown) on `origin`. The link is
    /// in-app when the result has the same origin; the returned path has
    /// dot segments resolved and keeps the query but not the fragment.
    /// Fragment-only hrefs (`#comments`) stay with the browser.
    ///
    /// ```
    /// use vidshare_navigator::LinkClick;
    ///
    /// let origin = "https://vidshare.example";
    /// let click = LinkClick::new("https://vidshare.example/video/7?t=3");
    /// assert_eq!(click.in_app_path(origin, "/").as_deref(), Some("/video/7?t=3"));
    /// assert_eq!(LinkClick::new("8").in_app_path(origin, "/video/7").as_deref(), Some("/video/8"));
    /// assert_eq!(LinkClick::new("https://elsewhere.example/").in_app_path(origin, "/"), None);
    /// ```
    pub fn in_app_path(&self, origin: &str, current: &str) -> Option<String> {
        if self.is_modified() {
            return None;
        }
        if matches!(self.target.as_deref(), Some(t) if !t.is_empty() && t != "_self") {
            return None;
        }
        if self.href.starts_with('#') {
            return None;
        }

        let base = Url::parse(origin).ok()?.join(current).ok()?;
        let target = base.join(&self.href).ok()?;
        if target.origin() != base.origin() {
            return None;
        }

        let mut path = target.path().to_string();
        if let Some(query) = target.query() {
            path.push('?');
            path.push_str(query);
        }
        Some(path)
    }
}

/// What the host adapter should do with a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// The router navigated; the adapter must prevent the default action.
    Intercepted,
    /// Leave the click to the browser.
    PassThrough,
}
