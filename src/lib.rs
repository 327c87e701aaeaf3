pub mod cli;
pub mod core;
pub mod providers;
pub mod server;
pub mod service;

use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::providers::EcbProvider;
use crate::server::Server;
use crate::service::ExchangeRateService;

pub enum AppCommand {
    Serve,
    Currencies,
    Rates {
        currency: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Latest {
        currency: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ECB rates starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = EcbProvider::from_config(&config.providers.ecb)?;
    let service = Arc::new(ExchangeRateService::new(Arc::new(provider)));

    match command {
        AppCommand::Serve => Server::new(config.server, service).start().await,
        AppCommand::Currencies => cli::rates::run_currencies(&service).await,
        AppCommand::Rates {
            currency,
            start,
            end,
        } => cli::rates::run_rates(&service, &currency, start, end).await,
        AppCommand::Latest { currency } => cli::rates::run_latest(&service, &currency).await,
    }
}
