pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{Converter, CurrencyCatalog, HistoryStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: f64,
        targets: Vec<String>,
        base: Option<String>,
    },
    History,
    Delete {
        index: usize,
    },
    Currencies,
}

fn load_catalog(config: &AppConfig) -> Result<CurrencyCatalog> {
    match &config.catalog_path {
        Some(path) => CurrencyCatalog::load_from_path(path),
        None => CurrencyCatalog::builtin(),
    }
}

/// Wires the catalog, history storage and rate provider described by `config`.
pub fn build_converter(config: &AppConfig) -> Result<Converter> {
    let catalog = load_catalog(config)?;

    let data_path = config.default_data_path().ok();
    let storage =
        store::open_storage(data_path.as_deref()).context("Cannot keep conversion history")?;
    let history = HistoryStore::load(storage);

    let rate_api = &config.providers.rate_api;
    let provider = providers::RateApiProvider::new(&rate_api.base_url)
        .with_api_key(rate_api.api_key.clone())
        .with_retry(rate_api.retry);

    Ok(Converter::new(
        Arc::new(provider),
        Arc::new(catalog),
        Arc::new(Mutex::new(history)),
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Currencies => cli::currencies::run(&load_catalog(&config)?),
        AppCommand::History => {
            let converter = build_converter(&config)?;
            cli::history::run(&converter.history()).await
        }
        AppCommand::Delete { index } => {
            let converter = build_converter(&config)?;
            cli::history::delete(&converter.history(), index).await
        }
        AppCommand::Convert {
            amount,
            targets,
            base,
        } => {
            let converter = build_converter(&config)?;
            let base = base.unwrap_or_else(|| config.base_currency.clone());
            cli::convert::run(&converter, &base, &targets, amount).await
        }
    }
}
