//! Watch session setup

use crate::config::Config;
use crate::consts::embed_consts::{CONTAINER_ID, EVENT_QUEUE_SIZE};
use crate::controller::{ConsoleRegion, DashboardController, EmbedConfig, TokioScheduler};
use crate::events::ControllerEvent;
use crate::token::{OidcTokenClient, TokenProvider};
use crate::widget::PublishedDashboardSdk;
use log::info;
use std::error::Error;
use tokio::sync::mpsc;

pub type WatchController =
    DashboardController<PublishedDashboardSdk, TokioScheduler, ConsoleRegion>;

/// Everything the watch loop needs
pub struct WatchSession {
    pub controller: WatchController,
    /// Feeds user commands and connectivity changes into the loop
    pub event_sender: mpsc::Sender<ControllerEvent>,
    pub event_receiver: mpsc::Receiver<ControllerEvent>,
    pub dashboard_id: String,
}

/// Builds the controller for a watch session.
///
/// Uses `token` when given, otherwise mints a scoped token with the configured
/// service principal.
pub async fn setup_watch_session(
    config: &Config,
    token: Option<String>,
) -> Result<WatchSession, Box<dyn Error>> {
    let access_token = match token {
        Some(token) => token,
        None => {
            info!("Minting scoped token for {}", config.external_viewer_id);
            OidcTokenClient::new(config.clone())?.scoped_token().await?
        }
    };

    let (event_sender, event_receiver) = mpsc::channel::<ControllerEvent>(EVENT_QUEUE_SIZE);
    let embed = EmbedConfig {
        instance_url: config.base_url().to_string(),
        workspace_id: config.workspace_id.clone(),
        dashboard_id: config.dashboard_id.clone(),
        access_token,
    };
    let controller = DashboardController::new(
        embed,
        PublishedDashboardSdk::new(),
        TokioScheduler::new(event_sender.clone()),
        ConsoleRegion::new(CONTAINER_ID),
    );

    Ok(WatchSession {
        controller,
        event_sender,
        event_receiver,
        dashboard_id: config.dashboard_id.clone(),
    })
}
