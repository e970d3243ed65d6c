//! Navigation state

use crate::params::{QueryParams, RouteParams};
use std::cell::Cell;
use std::rc::Rc;

/// Where a navigation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationOrigin {
    /// User-initiated transition; adds a history entry.
    Push,
    /// History replay (back/forward, initial load); never adds an entry.
    #[default]
    Pop,
}

/// Router phase. Dispatch is synchronous, so `Dispatching` is only
/// observable from inside a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterPhase {
    Idle,
    Dispatching,
}

/// The currently active page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    /// Full path as navigated, query included.
    pub path: String,
    /// Path of the page this navigation replaced.
    pub previous_path: Option<String>,
    pub origin: NavigationOrigin,
    /// Parsed from the path's query string.
    pub query: QueryParams,
    /// Pattern whose handler ran, if any.
    pub pattern: Option<String>,
    pub params: RouteParams,
    /// Incremented by every navigation. Zero before the first one.
    pub generation: u64,
}

/// Generation counter shared between the router and outstanding tickets.
#[derive(Debug, Clone, Default)]
pub(crate) struct Generation(Rc<Cell<u64>>);

impl Generation {
    pub(crate) fn get(&self) -> u64 {
        self.0.get()
    }

    /// Start a new navigation and return its generation.
    pub(crate) fn advance(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }

    pub(crate) fn ticket(&self) -> NavigationTicket {
        NavigationTicket {
            generation: self.get(),
            current: self.clone(),
        }
    }
}

/// Proof of which navigation an async completion belongs to.
///
/// Page handlers take a ticket before awaiting a fetch and check
/// [`is_current`](Self::is_current) before touching the page with the result.
///
/// ```
/// use vidshare_navigator::{MemoryHistory, Router};
/// use std::rc::Rc;
///
/// let router = Router::new(Rc::new(MemoryHistory::new("https://v.example", "/")));
/// let ticket = router.ticket();
/// router.push("/video/1");
/// assert!(!ticket.is_current());
/// ```
#[derive(Debug, Clone)]
pub struct NavigationTicket {
    generation: u64,
    current: Generation,
}

impl NavigationTicket {
    /// The generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `false` once any later navigation has started.
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}
