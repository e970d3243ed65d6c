//! Outcomes and errors for routing and session management.
//!
//! Routing never fails at runtime. An unmatched path is a routing decision,
//! so [`Router::navigate`](crate::Router::navigate) reports it as a
//! [`NavigationOutcome`] rather than an error. Only malformed patterns
//! handed to [`Router::register`](crate::Router::register) produce a
//! [`RouteError`].
//!
//! The session side has two layers:
//!
//! - [`ApiError`]: what the request layer ([`AuthApi`](crate::AuthApi))
//!   reports. `Unauthorized` is the standing signal for a rejected
//!   credential.
//! - [`SessionError`]: what [`SessionManager`](crate::SessionManager)
//!   surfaces to page controllers after it has already reacted to the
//!   failure (for example by tearing the session down).
//!
//! # Examples
//!
//! ```
//! use vidshare_navigator::error::NavigationOutcome;
//!
//! let outcome = NavigationOutcome::Fallback {
//!     path: "/unknown".into(),
//!     pattern: "/".into(),
//! };
//! assert!(outcome.is_handled());
//! assert_eq!(outcome.pattern(), Some("/"));
//! ```

use thiserror::Error;

// ============================================================================
// Navigation outcome
// ============================================================================

/// Result of a single dispatch through the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A registered pattern matched the path.
    Matched { path: String, pattern: String },
    /// Nothing matched; the default pattern's handler ran instead.
    Fallback { path: String, pattern: String },
    /// Nothing matched and no default handler is registered. No handler ran.
    Unhandled { path: String },
}

impl NavigationOutcome {
    /// Check if a registered pattern matched directly.
    pub fn is_matched(&self) -> bool {
        matches!(self, NavigationOutcome::Matched { .. })
    }

    /// Check if the default route handled the path.
    pub fn is_fallback(&self) -> bool {
        matches!(self, NavigationOutcome::Fallback { .. })
    }

    /// Check if some handler was invoked.
    pub fn is_handled(&self) -> bool {
        !matches!(self, NavigationOutcome::Unhandled { .. })
    }

    /// The navigated path, exactly as given.
    pub fn path(&self) -> &str {
        match self {
            NavigationOutcome::Matched { path, .. }
            | NavigationOutcome::Fallback { path, .. }
            | NavigationOutcome::Unhandled { path } => path,
        }
    }

    /// The pattern whose handler ran, if any.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            NavigationOutcome::Matched { pattern, .. }
            | NavigationOutcome::Fallback { pattern, .. } => Some(pattern),
            NavigationOutcome::Unhandled { .. } => None,
        }
    }
}

// ============================================================================
// Route registration errors
// ============================================================================

/// A route pattern that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The pattern string was empty.
    #[error("Route pattern is empty")]
    EmptyPattern,

    /// The pattern did not start with `/`.
    #[error("Route pattern '{pattern}' must start with '/'")]
    MissingLeadingSlash { pattern: String },

    /// The pattern contained an empty interior segment such as `/a//b`.
    #[error("Route pattern '{pattern}' contains an empty segment")]
    EmptySegment { pattern: String },

    /// A capture segment had no name (`/video/:`).
    #[error("Route pattern '{pattern}' has an unnamed capture at segment {index}")]
    UnnamedCapture { pattern: String, index: usize },
}

// ============================================================================
// Request layer errors
// ============================================================================

/// Failures reported by the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend rejected the credentials or the bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backend rejected the request payload (e.g. username taken).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Check if this is the distinguishable authorization failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

// ============================================================================
// Session errors
// ============================================================================

/// Errors surfaced by [`SessionManager`](crate::SessionManager).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Invalid credentials, or the backend refused the freshly issued token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// An authenticated call was refused; the session has been torn down.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// The backend rejected registration input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport or decoding failure.
    #[error("Request failed: {0}")]
    Network(String),

    /// The persisted session could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] serde_json::Error),
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(msg) => SessionError::Auth(msg),
            ApiError::Validation(msg) => SessionError::Validation(msg),
            ApiError::NotFound(msg) => SessionError::NotFound(msg),
            ApiError::Network(msg) | ApiError::Parse(msg) => SessionError::Network(msg),
        }
    }
}

impl SessionError {
    /// Check if this error means the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, SessionError::Auth(_) | SessionError::SessionExpired)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_matched() {
        let outcome = NavigationOutcome::Matched {
            path: "/video/42".to_string(),
            pattern: "/video/:id".to_string(),
        };
        assert!(outcome.is_matched());
        assert!(!outcome.is_fallback());
        assert!(outcome.is_handled());
        assert_eq!(outcome.path(), "/video/42");
        assert_eq!(outcome.pattern(), Some("/video/:id"));
    }

    #[test]
    fn test_outcome_unhandled() {
        let outcome = NavigationOutcome::Unhandled {
            path: "/nowhere".to_string(),
        };
        assert!(!outcome.is_handled());
        assert_eq!(outcome.pattern(), None);
    }

    #[test]
    fn test_route_error_display() {
        let error = RouteError::EmptySegment {
            pattern: "/a//b".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Route pattern '/a//b' contains an empty segment"
        );
    }

    #[test]
    fn test_api_error_classification() {
        assert!(matches!(
            SessionError::from(ApiError::Unauthorized("bad token".into())),
            SessionError::Auth(_)
        ));
        assert!(matches!(
            SessionError::from(ApiError::Validation("Email already registered".into())),
            SessionError::Validation(_)
        ));
        assert!(matches!(
            SessionError::from(ApiError::NotFound("Video not found".into())),
            SessionError::NotFound(_)
        ));
        assert!(matches!(
            SessionError::from(ApiError::Parse("eof".into())),
            SessionError::Network(_)
        ));
    }

    #[test]
    fn test_requires_login() {
        assert!(SessionError::SessionExpired.requires_login());
        assert!(SessionError::Auth("x".into()).requires_login());
        assert!(!SessionError::Network("x".into()).requires_login());
    }
}
