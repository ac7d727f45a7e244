mod cli_messages;
mod config;
mod consts;
mod controller;
mod error_classifier;
mod events;
mod logging;
mod server;
mod session;
mod token;
mod widget;

use crate::config::{Config, ConfigError, ConfigOverrides};
use crate::consts::embed_consts::server::{DEFAULT_HOST, DEFAULT_STATIC_DIR, DEFAULT_TEMPLATE_PATH};
use crate::server::{EmbedServer, ServerSettings};
use crate::session::{run_watch_mode, setup_watch_session};
use crate::token::OidcTokenClient;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Embeds a published analytics dashboard for external viewers
struct Args {
    /// Fallback log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

/// Settings shared by every command. Flags win over environment variables,
/// which win over the config file.
#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// JSON config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Workspace instance URL
    #[arg(long, env = "INSTANCE_URL")]
    instance_url: Option<String>,

    #[arg(long, env = "WORKSPACE_ID")]
    workspace_id: Option<String>,

    /// ID of the published dashboard
    #[arg(long, env = "DASHBOARD_ID")]
    dashboard_id: Option<String>,

    #[arg(long, env = "SERVICE_PRINCIPAL_ID")]
    service_principal_id: Option<String>,

    #[arg(long, env = "SERVICE_PRINCIPAL_SECRET", hide_env_values = true)]
    service_principal_secret: Option<String>,

    /// Viewer the scoped token is issued for
    #[arg(long, env = "EXTERNAL_VIEWER_ID")]
    external_viewer_id: Option<String>,

    /// Value the dashboard filters on for this viewer
    #[arg(long, env = "EXTERNAL_VALUE")]
    external_value: Option<String>,

    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the embed page
    Serve {
        #[command(flatten)]
        config: ConfigArgs,

        /// Address to bind
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Page template with {{NAME}} placeholders
        #[arg(long, value_name = "PATH", default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,

        /// Directory served under /static
        #[arg(long, value_name = "DIR", default_value = DEFAULT_STATIC_DIR)]
        static_dir: PathBuf,
    },
    /// Load the dashboard in the terminal and follow its lifecycle
    Watch {
        #[command(flatten)]
        config: ConfigArgs,

        /// Use this token instead of minting one
        #[arg(long, env = "DASHBOARD_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

impl ConfigArgs {
    fn load(self) -> Result<Config, Box<dyn Error>> {
        let base = match &self.config {
            Some(path) => Config::load_from_file(path)
                .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
            None => Config::default(),
        };
        Ok(base.with_overrides(ConfigOverrides {
            instance_url: self.instance_url,
            workspace_id: self.workspace_id,
            dashboard_id: self.dashboard_id,
            service_principal_id: self.service_principal_id,
            service_principal_secret: self.service_principal_secret,
            external_viewer_id: self.external_viewer_id,
            external_value: self.external_value,
            port: self.port,
        }))
    }
}

/// Prints the missing settings and exits with status 1.
fn exit_missing(e: ConfigError) -> ! {
    eprintln!("{}", e);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(logging::parse_rust_log_level(&args.log_level));

    match args.command {
        Command::Serve {
            config,
            host,
            template,
            static_dir,
        } => {
            let config = config.load()?;
            if let Err(e) = config.validate() {
                exit_missing(e);
            }
            let tokens = Arc::new(OidcTokenClient::new(config.clone())?);
            let server = EmbedServer::new(
                config,
                tokens,
                ServerSettings {
                    host,
                    template_path: template,
                    static_dir,
                },
            );
            let addr = server.addr()?;
            print_cmd_info!("Serving dashboard", "http://{}", addr);
            server.run().await.inspect_err(|e| {
                print_cmd_error!("Server stopped", &e.to_string());
            })
        }
        Command::Watch { config, token } => {
            let config = config.load()?;
            let checked = match token {
                Some(_) => config.validate_embed_only(),
                None => config.validate(),
            };
            if let Err(e) = checked {
                exit_missing(e);
            }
            let session = setup_watch_session(&config, token).await.inspect_err(|e| {
                print_cmd_error!("Could not start watch session", &e.to_string());
            })?;
            run_watch_mode(session).await
        }
    }
}
