pub mod api;
pub mod cli;
pub mod core;
pub mod exchange;
pub mod providers;

use crate::core::RateQuery;
use crate::core::config::AppConfig;
use crate::providers::NbpProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Serve {
        host: Option<String>,
        port: Option<u16>,
    },
    Query {
        query: RateQuery,
        json: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = Arc::new(NbpProvider::from_config(&config.providers.nbp)?);

    match command {
        AppCommand::Serve { host, port } => {
            info!("NBP rates API starting...");
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            cli::serve::serve(&server, provider).await
        }
        AppCommand::Query { query, json } => cli::query::run(provider.as_ref(), &query, json).await,
    }
}
