//! OIDC token client
//!
//! Mints viewer-scoped tokens for a published dashboard using the workspace's
//! client-credentials flow:
//!
//! 1. exchange service-principal credentials for an all-APIs token,
//! 2. ask the dashboard for the token info describing the external viewer,
//! 3. exchange that token info for a token limited to the dashboard.

use crate::config::Config;
use crate::consts::embed_consts::http::{connect_timeout, request_timeout};
use crate::token::TokenProvider;
use crate::token::error::TokenError;
use log::debug;
use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;
use serde_json::{Map, Value};

const USER_AGENT: &str = concat!("dashboard-embed/", env!("CARGO_PKG_VERSION"));

const TOKEN_ENDPOINT: &str = "oidc/v1/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OidcTokenClient {
    client: Client,
    config: Config,
}

impl OidcTokenClient {
    pub fn new(config: Config) -> Result<Self, TokenError> {
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout())
            .timeout(request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url(),
            endpoint.trim_start_matches('/')
        )
    }

    fn token_info_endpoint(&self) -> String {
        format!(
            "api/2.0/lakeview/dashboards/{}/published/tokeninfo?external_viewer_id={}&external_value={}",
            self.config.dashboard_id,
            urlencoding::encode(&self.config.external_viewer_id),
            urlencoding::encode(&self.config.external_value)
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, TokenError> {
        if !response.status().is_success() {
            return Err(TokenError::from_response(response).await);
        }
        Ok(response)
    }

    /// Posts a client-credentials form to the token endpoint and returns the access token.
    async fn request_token(&self, form: &[(String, String)]) -> Result<String, TokenError> {
        let response = self
            .client
            .post(self.build_url(TOKEN_ENDPOINT))
            .basic_auth(
                &self.config.service_principal_id,
                Some(&self.config.service_principal_secret),
            )
            .form(form)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let body: TokenResponse = response.json().await?;
        body.access_token
            .ok_or(TokenError::MissingField("access_token"))
    }

    async fn token_info(&self, oidc_token: &str) -> Result<Map<String, Value>, TokenError> {
        let response = self
            .client
            .get(self.build_url(&self.token_info_endpoint()))
            .bearer_auth(oidc_token)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        match response.json::<Value>().await? {
            Value::Object(map) => Ok(map),
            other => Err(TokenError::UnexpectedPayload(other.to_string())),
        }
    }
}

/// Turns a token-info object into the form of the scoped token request.
///
/// `authorization_details` travels as JSON text; every other field is passed
/// through and `grant_type` is forced to client credentials.
fn scoped_token_form(mut token_info: Map<String, Value>) -> Vec<(String, String)> {
    let authorization_details = token_info
        .remove("authorization_details")
        .unwrap_or(Value::Null);
    token_info.remove("grant_type");

    let mut form: Vec<(String, String)> = token_info
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect();
    form.push(("grant_type".to_string(), "client_credentials".to_string()));
    form.push((
        "authorization_details".to_string(),
        authorization_details.to_string(),
    ));
    form
}

#[async_trait::async_trait]
impl TokenProvider for OidcTokenClient {
    async fn scoped_token(&self) -> Result<String, TokenError> {
        let oidc_token = self
            .request_token(&[
                ("grant_type".to_string(), "client_credentials".to_string()),
                ("scope".to_string(), "all-apis".to_string()),
            ])
            .await?;
        debug!("Obtained service principal token");

        let token_info = self.token_info(&oidc_token).await?;
        let scoped = self.request_token(&scoped_token_form(token_info)).await?;
        debug!(
            "Minted scoped token for viewer {}",
            self.config.external_viewer_id
        );
        Ok(scoped)
    }
}
