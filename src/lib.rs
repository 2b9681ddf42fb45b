pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::rate_cache::RateCache;
use crate::providers::ExchangeRateHostProvider;
use crate::store::KeyValueStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the collection holding the pair's rate entry.
pub const RATES_COLLECTION: &str = "rates";

pub enum AppCommand {
    Convert {
        amount: String,
        reverse: bool,
        stylized: bool,
    },
    Rate,
    Interactive,
}

/// Wires the store and the live provider into a rate cache for the
/// configured pair.
pub fn build_rate_cache(config: &AppConfig) -> Result<RateCache> {
    let store = if config.cache.persist {
        KeyValueStore::open(&config.default_data_path()?)
    } else {
        KeyValueStore::in_memory()
    };
    debug!(persistent = store.is_persistent(), "Rate store ready");
    let provider = ExchangeRateHostProvider::new(&config.provider)?;

    Ok(RateCache::new(
        config.pair.clone(),
        Arc::new(provider),
        store.collection(RATES_COLLECTION, config.cache.persist),
        config.fallback()?,
    )
    .with_staleness(config.staleness()))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("lira starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let rate_cache = Arc::new(build_rate_cache(&config)?);

    match command {
        AppCommand::Convert {
            amount,
            reverse,
            stylized,
        } => cli::convert::run(&rate_cache, &amount, reverse, stylized).await,
        AppCommand::Rate => cli::convert::show_rate(&rate_cache).await,
        AppCommand::Interactive => cli::interactive::run(rate_cache).await,
    }
}
