use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::config::ProviderConfig;
use crate::core::currency::{CurrencyPair, CurrencyRateProvider, FetchError};
use crate::core::rate;
use crate::providers::util::with_retry;

/// Live rates from the exchangerate.host `convert` endpoint.
pub struct ExchangeRateHostProvider {
    endpoint: reqwest::Url,
    access_key: Option<String>,
    retries: usize,
    retry_delay_ms: u64,
    client: reqwest::Client,
}

impl ExchangeRateHostProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lira/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let endpoint = reqwest::Url::parse(&format!(
            "{}/convert",
            config.base_url.trim_end_matches('/')
        ))
        .with_context(|| format!("Invalid provider base_url: {}", config.base_url))?;
        Ok(ExchangeRateHostProvider {
            endpoint,
            access_key: config.access_key.clone(),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    info: Option<ConvertInfo>,
}

#[derive(Debug, Deserialize)]
struct ConvertInfo {
    rate: Option<f64>,
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateHostProvider {
    #[instrument(name = "RateFetch", skip(self), fields(pair = %pair))]
    async fn get_rate(&self, pair: &CurrencyPair) -> Result<f64, FetchError> {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("from", &pair.base)
                .append_pair("to", &pair.quote);
            if let Some(key) = &self.access_key {
                query.append_pair("access_key", key);
            }
        }
        debug!("Requesting currency rate from {}", self.endpoint);

        let response = with_retry(
            || self.client.get(url.clone()).send(),
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|source| FetchError::Network {
            pair: pair.clone(),
            source,
        })?;

        debug!(response = ?response, "Received rate response");

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                pair: pair.clone(),
            });
        }

        let text = response.text().await.map_err(|source| FetchError::Network {
            pair: pair.clone(),
            source,
        })?;

        let data: ConvertResponse =
            serde_json::from_str(&text).map_err(|source| FetchError::Malformed {
                pair: pair.clone(),
                source,
            })?;

        let value = data
            .info
            .and_then(|info| info.rate)
            .ok_or_else(|| FetchError::MissingRate(pair.clone()))?;

        Ok(rate::validate(value)?)
    }
}
