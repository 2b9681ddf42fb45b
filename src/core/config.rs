use crate::core::currency::CurrencyPair;
use crate::core::rate::{ExchangeRate, FALLBACK_RATE};
use anyhow::{Context, Result, bail};
use chrono::TimeDelta;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_PROVIDER_URL: &str = "https://api.exchangerate.host";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Sent as `access_key` when the endpoint requires one.
    pub access_key: Option<String>,
    pub retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            access_key: None,
            retries: 2,
            retry_delay_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Stored rates older than this are refetched.
    pub staleness_hours: u32,
    /// Keep the rate on disk between runs.
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            staleness_hours: 24,
            persist: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub pair: CurrencyPair,
    pub fallback_rate: f64,
    pub cache: CacheConfig,
    pub provider: ProviderConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            pair: CurrencyPair::default(),
            fallback_rate: FALLBACK_RATE,
            cache: CacheConfig::default(),
            provider: ProviderConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or the defaults when no
    /// file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = project_dirs()?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        let config = config
            .validated()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Normalizes currency codes and rejects settings the converter cannot use.
    pub fn validated(mut self) -> Result<Self> {
        self.pair = CurrencyPair::new(&self.pair.base, &self.pair.quote);
        if self.pair.base.is_empty() || self.pair.quote.is_empty() {
            bail!("Currency codes must not be empty");
        }
        if self.pair.base == self.pair.quote {
            bail!("Currency pair needs two different currencies, got {}", self.pair);
        }
        self.fallback()?;
        Ok(self)
    }

    pub fn fallback(&self) -> Result<ExchangeRate> {
        ExchangeRate::fallback(self.fallback_rate).context("Invalid fallback_rate")
    }

    pub fn staleness(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.cache.staleness_hours))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "lira", "lira").context("Could not determine project directories")
}
