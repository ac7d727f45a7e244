//! Published dashboard SDK
//!
//! A headless widget backed by the published-dashboard REST endpoint. It has
//! no rendering surface of its own; initializing and refreshing both fetch
//! the published dashboard with the viewer's scoped token.

use crate::consts::embed_consts::http::{connect_timeout, request_timeout};
use crate::widget::error::WidgetError;
use crate::widget::{Widget, WidgetOptions, WidgetSdk};
use log::{debug, info};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use std::sync::OnceLock;

const USER_AGENT: &str = concat!("dashboard-embed/", env!("CARGO_PKG_VERSION"));

/// Upper bound on how much of an error body ends up in a failure description.
const MAX_ERROR_BODY_CHARS: usize = 120;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PublishedDashboard {
    display_name: Option<String>,
    warehouse_id: Option<String>,
}

/// SDK whose widgets talk to `/api/2.0/lakeview/dashboards/{id}/published`.
#[derive(Debug, Default)]
pub struct PublishedDashboardSdk {
    client: OnceLock<Client>,
}

impl PublishedDashboardSdk {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl WidgetSdk for PublishedDashboardSdk {
    async fn load(&self) -> Result<(), WidgetError> {
        if self.client.get().is_some() {
            return Ok(());
        }
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout())
            .timeout(request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WidgetError::Load(format!("network client unavailable: {}", e)))?;
        // A concurrent load may have won the race; either client is fine.
        let _ = self.client.set(client);
        Ok(())
    }

    fn create(&self, options: WidgetOptions) -> Result<Box<dyn Widget>, WidgetError> {
        let client = self
            .client
            .get()
            .cloned()
            .ok_or_else(|| WidgetError::Construct("SDK module not loaded".to_string()))?;
        if options.token.trim().is_empty() {
            return Err(WidgetError::Construct("missing access token".to_string()));
        }
        if options.dashboard_id.trim().is_empty() {
            return Err(WidgetError::Construct("missing dashboard id".to_string()));
        }
        Ok(Box::new(PublishedDashboardWidget::new(client, options)))
    }
}

/// One published dashboard bound to a display region.
pub struct PublishedDashboardWidget {
    client: Client,
    options: WidgetOptions,
}

impl PublishedDashboardWidget {
    fn new(client: Client, options: WidgetOptions) -> Self {
        Self { client, options }
    }

    fn url(&self) -> String {
        format!(
            "{}/api/2.0/lakeview/dashboards/{}/published",
            self.options.instance_url.trim_end_matches('/'),
            self.options.dashboard_id
        )
    }

    async fn fetch(&self) -> Result<PublishedDashboard, String> {
        let response = self
            .client
            .get(self.url())
            .bearer_auth(&self.options.token)
            .header("X-Databricks-Org-Id", &self.options.workspace_id)
            .send()
            .await
            .map_err(|e| format!("network error: {}", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(describe_status(status, &body));
        }

        response
            .json::<PublishedDashboard>()
            .await
            .map_err(|e| format!("unexpected response body: {}", e.without_url()))
    }
}

/// Failure text for a non-success status, phrased so classification can pick it up.
fn describe_status(status: StatusCode, body: &str) -> String {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("invalid or expired token (HTTP {})", status.as_u16())
        }
        StatusCode::NOT_FOUND => "dashboard not found (HTTP 404)".to_string(),
        _ => format!(
            "unexpected response (HTTP {}): {}",
            status.as_u16(),
            excerpt(body)
        ),
    }
}

/// At most `MAX_ERROR_BODY_CHARS` characters of a response body, on one line.
fn excerpt(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_ERROR_BODY_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push_str("...");
    cut
}

#[async_trait::async_trait]
impl Widget for PublishedDashboardWidget {
    async fn initialize(&mut self) -> Result<(), WidgetError> {
        let dashboard = self.fetch().await.map_err(WidgetError::Initialize)?;
        info!(
            "Dashboard '{}' mounted into #{}",
            dashboard
                .display_name
                .as_deref()
                .unwrap_or(&self.options.dashboard_id),
            self.options.container
        );
        if let Some(warehouse) = dashboard.warehouse_id {
            debug!("Dashboard queries run on warehouse {}", warehouse);
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), WidgetError> {
        self.fetch().await.map_err(WidgetError::Refresh)?;
        debug!("Dashboard {} refreshed", self.options.dashboard_id);
        Ok(())
    }
}
