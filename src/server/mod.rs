//! Embed page host
//!
//! Serves the page that hosts the dashboard widget with a freshly minted,
//! viewer-scoped token injected, plus the page's static assets.

pub mod handlers;
pub mod pages;

use crate::config::Config;
use crate::consts::embed_consts::server::{
    DEFAULT_HOST, DEFAULT_STATIC_DIR, DEFAULT_TEMPLATE_PATH,
};
use crate::token::TokenProvider;
use axum::{Router, routing::get};
use log::info;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Where the host listens and reads its files from.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub template_path: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

/// Shared handler state
pub struct ServerState {
    pub config: Config,
    pub tokens: Arc<dyn TokenProvider>,
    pub template_path: PathBuf,
    pub static_dir: PathBuf,
}

pub struct EmbedServer {
    state: Arc<ServerState>,
    host: String,
}

impl EmbedServer {
    pub fn new(config: Config, tokens: Arc<dyn TokenProvider>, settings: ServerSettings) -> Self {
        Self {
            state: Arc::new(ServerState {
                config,
                tokens,
                template_path: settings.template_path,
                static_dir: settings.static_dir,
            }),
            host: settings.host,
        }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/static/*path", get(handlers::static_file))
            .fallback(handlers::not_found)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        Ok(SocketAddr::from((
            self.host.parse::<IpAddr>()?,
            self.state.config.port,
        )))
    }

    /// Binds and serves until the process is stopped.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.addr()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Server running on http://{}", addr);
        self.serve(listener).await
    }

    /// Serves on an already bound listener until Ctrl+C.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
    ) -> Result<(), Box<dyn std::error::Error>> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down");
            })
            .await?;
        Ok(())
    }
}
