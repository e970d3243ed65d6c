//! # vidshare-navigator
//!
//! Client-side navigation and session core for the vidshare single-page app.
//!
//! Two context objects, both cheap to clone and built once at startup:
//!
//! - [`Router`]: path patterns with `:name` captures, a default route,
//!   history push/pop, intercepted same-origin link clicks, page-scoped
//!   exit cleanups and navigation tickets for stale async results.
//! - [`SessionManager`]: bearer token plus cached [`Profile`] in a
//!   [`CredentialStore`], login/registration/logout/verification, and
//!   [`authorized`](SessionManager::authorized) calls that turn an
//!   authorization failure into exactly one logout.
//!
//! The browser stays behind traits ([`HistoryBackend`], [`CredentialStore`],
//! [`AuthApi`]); in-memory implementations are provided.
//!
//! # Quick start
//!
//! ```
//! use std::rc::Rc;
//! use vidshare_navigator::{MemoryHistory, Router};
//!
//! let router = Router::new(Rc::new(MemoryHistory::new("https://v.example", "/")));
//! router.register("/", |_| println!("home")).unwrap();
//! router.register("/video/:id", |params| {
//!     println!("watch {}", params.get("id").unwrap());
//! }).unwrap();
//! router.initialize("/");
//!
//! // Unknown paths fall back to the default route.
//! assert!(router.push("/nope").is_fallback());
//! ```
//!
//! # Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `log` | yes | Log through the `log` crate |
//! | `tracing` | no | Log through the `tracing` crate (exclusive with `log`) |
//! | `cache` | yes | LRU cache for route resolution |
//! | `guard` | yes | Route guards and `Router::register_guarded` |

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(feature = "log", feature = "tracing"))]
compile_error!(
    "Features 'log' and 'tracing' are mutually exclusive. Enable only one logging backend."
);

mod logging;

pub mod api;
#[cfg(feature = "cache")]
pub mod cache;
pub mod error;
#[cfg(feature = "guard")]
pub mod guards;
pub mod history;
pub mod lifecycle;
pub mod matching;
pub mod params;
pub mod route;
pub mod router;
pub mod session;
pub mod state;
pub mod storage;

pub use api::{AccessToken, AuthApi, Profile};
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolutionCache};
pub use error::{ApiError, NavigationOutcome, RouteError, SessionError};
#[cfg(feature = "guard")]
pub use guards::{guard_fn, AuthGuard, FnGuard, GuestGuard, RouteGuard};
pub use history::{ClickDisposition, HistoryBackend, LinkClick, MemoryHistory};
pub use lifecycle::{NavigationAction, PageScope};
pub use matching::{RoutePattern, Segment};
pub use params::{QueryParams, RouteParams};
pub use route::{MatchKind, RouteHandler, RouteMatch, RouteTable};
pub use router::{NavigationRequest, Router, WeakRouter};
pub use session::{SessionConfig, SessionEvent, SessionManager, SubscriptionId};
pub use state::{NavigationOrigin, NavigationState, NavigationTicket, RouterPhase};
pub use storage::{CredentialStore, MemoryStore};
