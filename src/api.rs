//! Request-layer contract used by the session.
//!
//! The crate never performs HTTP itself. A host implements [`AuthApi`] on
//! top of its fetch layer (`POST /api/auth/token`, `GET /api/users/me`,
//! `POST /api/auth/register`) and maps a `401` response to
//! [`ApiError::Unauthorized`]; every other failure keeps its own variant.

use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token issued by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AccessToken {
    /// A bearer token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
        }
    }
}

/// The signed-in user's profile, cached alongside the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Backend document id (`_id` on the wire).
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Authentication endpoints of the backend.
///
/// Futures are not `Send`: the whole crate runs on the browser's single
/// thread.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Exchange an identifier (email) and secret for a token.
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<AccessToken, ApiError>;

    /// Fetch the profile of the user owning `token`.
    ///
    /// The token is passed explicitly so a login can validate a token that
    /// has not been persisted yet.
    async fn fetch_current_profile(&self, token: &str) -> Result<Profile, ApiError>;

    /// Create an account. The caller logs in separately afterwards.
    async fn create_account(
        &self,
        username: &str,
        identifier: &str,
        secret: &str,
    ) -> Result<Profile, ApiError>;
}
