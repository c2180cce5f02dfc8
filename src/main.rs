//! ChatRelay - chat assistant backend
//!
//! Main entry point for the ChatRelay server application.

use anyhow::Result;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatrelay::cli::{Cli, Commands};
use chatrelay::config::Config;
use chatrelay::gateway::OpenAiGateway;
use chatrelay::models::ALL_MODELS;
use chatrelay::preferences::ModelPreferenceStore;
use chatrelay::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let mut config = Config::load(config_path)?;

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            // Validate configuration
            config.validate()?;

            tracing::info!("Starting ChatRelay server");
            let gateway = OpenAiGateway::new(config.gateway.clone())?;
            let state = AppState {
                store: Arc::new(ModelPreferenceStore::new()),
                gateway: Arc::new(gateway),
                locale: config.history.locale,
            };

            server::serve(&config, state).await?;
            Ok(())
        }
        Commands::Models { json } => {
            if json {
                let names: Vec<&str> = ALL_MODELS.iter().map(|m| m.as_str()).collect();
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for model in ALL_MODELS {
                    println!("{}", model);
                }
            }
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatrelay=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
