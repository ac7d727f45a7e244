//! Error handling for the token module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The identity provider answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A response body lacked a field the flow depends on.
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),

    /// The token-info response was not a JSON object.
    #[error("Unexpected token info payload: {0}")]
    UnexpectedPayload(String),
}

impl TokenError {
    pub async fn from_response(response: reqwest::Response) -> TokenError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        TokenError::Http { status, message }
    }
}
