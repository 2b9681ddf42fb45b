//! Currency pair and rate provider abstractions

use crate::core::rate::RateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The fixed pair this converter works on. `base` is the side a rate is quoted for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.trim().to_uppercase(),
            quote: quote.trim().to_uppercase(),
        }
    }

    /// Storage key holding the last known rate, e.g. `eurTryRate`.
    pub fn rate_key(&self) -> String {
        format!("{}{}Rate", self.base.to_lowercase(), capitalize(&self.quote))
    }

    /// Storage key holding the acquisition time of the rate, e.g. `eurTryRateTime`.
    pub fn rate_time_key(&self) -> String {
        format!("{}Time", self.rate_key())
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self::new("EUR", "TRY")
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

fn capitalize(code: &str) -> String {
    let lower = code.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ways a live rate lookup can fail. None of them reach the user; the rate
/// cache logs them and keeps its current rate.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request error for currency pair {pair}: {source}")]
    Network {
        pair: CurrencyPair,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for currency pair: {pair}")]
    Status {
        status: reqwest::StatusCode,
        pair: CurrencyPair,
    },

    #[error("Failed to parse JSON response for {pair}: {source}")]
    Malformed {
        pair: CurrencyPair,
        #[source]
        source: serde_json::Error,
    },

    #[error("No rate data found for currency pair: {0}")]
    MissingRate(CurrencyPair),

    #[error(transparent)]
    InvalidRate(#[from] RateError),
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Units of `pair.quote` per one unit of `pair.base`.
    async fn get_rate(&self, pair: &CurrencyPair) -> Result<f64, FetchError>;
}
