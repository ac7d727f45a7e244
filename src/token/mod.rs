use crate::token::error::TokenError;

pub(crate) mod client;
pub use client::OidcTokenClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Source of short-lived, viewer-scoped dashboard tokens.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Mints a token that only grants access to the configured published dashboard.
    async fn scoped_token(&self) -> Result<String, TokenError>;
}
