//! Bearer token access
//!
//! The identity provider is external: it issues tokens out of band and the
//! client only attaches them to requests. The trait seam keeps refreshing
//! providers possible without touching the API client.

use crate::api::ApiError;
use async_trait::async_trait;

/// Source of bearer tokens for API requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return the current bearer token, or an auth error when none is
    /// available.
    async fn bearer_token(&self) -> Result<String, ApiError>;
}

/// A pre-issued token, typically read from the environment at startup.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::auth("No identity token configured"));
        }
        Ok(self.token.clone())
    }
}
