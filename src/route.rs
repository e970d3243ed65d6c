//! Route table: registered patterns and their page handlers.
//!
//! The table is insertion-ordered. Resolution is a pure function of the
//! table and a path, so it can be tested and cached independently of any
//! navigation side effects.
//!
//! # Resolution order
//!
//! 1. Exact key match on the unsplit path (`/video` matches only the key
//!    `/video`), with empty params
//! 2. Patterns in registration order; first structurally compatible one wins
//! 3. The caller's default pattern, if registered (see
//!    [`fallback`](RouteTable::fallback))

use crate::matching::{split_path, RoutePattern};
use crate::params::RouteParams;
use std::fmt;
use std::rc::Rc;

/// Page handler invoked with the captured params. Rendering is its side effect.
pub type RouteHandler = Rc<dyn Fn(&RouteParams)>;

/// One registered route.
#[derive(Clone)]
pub struct RouteEntry {
    pub pattern: RoutePattern,
    pub handler: RouteHandler,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// How a path was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The path string equals a registered key.
    Exact,
    /// A pattern matched structurally.
    Pattern,
    /// Nothing matched; the default pattern was used.
    Fallback,
}

/// A resolved route: which pattern, with which params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Raw pattern string, usable as a key into the table.
    pub pattern: String,
    pub params: RouteParams,
    pub kind: MatchKind,
}

/// Insertion-ordered `pattern -> handler` map.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Returns `true` if an identical key was replaced.
    ///
    /// A replaced entry keeps its original position in the match order.
    pub fn insert(&mut self, pattern: RoutePattern, handler: RouteHandler) -> bool {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.pattern.as_str() == pattern.as_str())
        {
            entry.handler = handler;
            true
        } else {
            self.entries.push(RouteEntry { pattern, handler });
            false
        }
    }

    /// Look up an entry by its raw pattern string.
    pub fn get(&self, pattern: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.pattern.as_str() == pattern)
    }

    /// `true` if the raw pattern is registered.
    pub fn contains(&self, pattern: &str) -> bool {
        self.get(pattern).is_some()
    }

    /// Registered patterns in match order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern.as_str())
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a path (query already stripped) without fallback.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        if let Some(entry) = self.get(path) {
            return Some(RouteMatch {
                pattern: entry.pattern.as_str().to_string(),
                params: RouteParams::new(),
                kind: MatchKind::Exact,
            });
        }

        let segments = split_path(path);
        self.entries.iter().find_map(|entry| {
            entry
                .pattern
                .match_segments(&segments)
                .map(|params| RouteMatch {
                    pattern: entry.pattern.as_str().to_string(),
                    params,
                    kind: MatchKind::Pattern,
                })
        })
    }

    /// The fallback match for `default`, if it is registered.
    ///
    /// Applied by the caller after [`resolve`](Self::resolve) finds nothing,
    /// so cached direct resolutions stay valid when the default changes.
    pub fn fallback(&self, default: Option<&str>) -> Option<RouteMatch> {
        let entry = self.get(default?)?;
        Some(RouteMatch {
            pattern: entry.pattern.as_str().to_string(),
            params: RouteParams::new(),
            kind: MatchKind::Fallback,
        })
    }

    /// Handler for a raw pattern string.
    pub fn handler(&self, pattern: &str) -> Option<RouteHandler> {
        self.get(pattern).map(|e| Rc::clone(&e.handler))
    }
}
