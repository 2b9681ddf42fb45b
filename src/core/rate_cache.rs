//! Acquisition and staleness policy for the pair's exchange rate.

use crate::core::cache::KeyValueCollection;
use crate::core::currency::{CurrencyPair, CurrencyRateProvider, FetchError};
use crate::core::rate::ExchangeRate;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, instrument, warn};

/// Age after which a stored rate is refetched.
pub const DEFAULT_STALENESS: TimeDelta = TimeDelta::hours(24);

/// Where the rate returned by [`RateCache::resolve`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// A stored rate younger than the staleness threshold.
    Cached,
    /// A live rate, now persisted.
    Fetched,
    /// The live lookup failed; the rate held in memory was kept.
    Fallback,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RateSource::Cached => "cached",
            RateSource::Fetched => "live",
            RateSource::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

pub struct RateCache {
    pair: CurrencyPair,
    provider: Arc<dyn CurrencyRateProvider>,
    store: Arc<dyn KeyValueCollection>,
    staleness: TimeDelta,
    current: Mutex<ExchangeRate>,
}

impl RateCache {
    /// `fallback` is the in-memory rate until a stored or live one is found.
    pub fn new(
        pair: CurrencyPair,
        provider: Arc<dyn CurrencyRateProvider>,
        store: Arc<dyn KeyValueCollection>,
        fallback: ExchangeRate,
    ) -> Self {
        Self {
            pair,
            provider,
            store,
            staleness: DEFAULT_STALENESS,
            current: Mutex::new(fallback),
        }
    }

    pub fn with_staleness(mut self, staleness: TimeDelta) -> Self {
        self.staleness = staleness;
        self
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    /// The rate held in memory, without consulting the store or provider.
    pub fn current(&self) -> ExchangeRate {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn get_rate(&self) -> ExchangeRate {
        self.resolve().await.0
    }

    pub async fn get_rate_at(&self, now: DateTime<Utc>) -> ExchangeRate {
        self.resolve_at(now).await.0
    }

    pub async fn resolve(&self) -> (ExchangeRate, RateSource) {
        self.resolve_at(Utc::now()).await
    }

    /// Returns a usable rate and where it came from. Never fails: lookup
    /// errors are logged and the in-memory rate is returned instead.
    #[instrument(name = "RateResolve", skip(self), fields(pair = %self.pair))]
    pub async fn resolve_at(&self, now: DateTime<Utc>) -> (ExchangeRate, RateSource) {
        if let Some(stored) = self.read_stored().await {
            let age = now.signed_duration_since(stored.fetched_at());
            if age < self.staleness {
                debug!(rate = stored.value(), %age, "Using stored rate");
                self.replace(stored);
                return (stored, RateSource::Cached);
            }
            debug!(rate = stored.value(), %age, "Stored rate is stale");
        }

        match self.fetch(now).await {
            Ok(fresh) => {
                self.persist(&fresh).await;
                self.replace(fresh);
                (fresh, RateSource::Fetched)
            }
            Err(e) => {
                let kept = self.current();
                warn!(error = %e, rate = kept.value(), "Could not fetch live rate, using fallback");
                (kept, RateSource::Fallback)
            }
        }
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<ExchangeRate, FetchError> {
        let value = self.provider.get_rate(&self.pair).await?;
        Ok(ExchangeRate::new(value, now)?)
    }

    async fn read_stored(&self) -> Option<ExchangeRate> {
        let value = self.store.get(&self.pair.rate_key()).await;
        let timestamp = self.store.get(&self.pair.rate_time_key()).await;
        ExchangeRate::from_stored(value.as_deref(), timestamp.as_deref())
    }

    async fn persist(&self, rate: &ExchangeRate) {
        if let Err(e) = self.write_stored(rate).await {
            warn!(error = %e, "Could not persist fetched rate");
        }
    }

    /// The timestamp goes in last. If that write fails the entry is left
    /// partial or with its old, already stale timestamp, so the next lookup
    /// refetches instead of trusting the new value under an old time.
    async fn write_stored(&self, rate: &ExchangeRate) -> anyhow::Result<()> {
        let (value, timestamp) = rate.to_stored();
        self.store.set(&self.pair.rate_key(), value).await?;
        self.store.set(&self.pair.rate_time_key(), timestamp).await
    }

    fn replace(&self, rate: ExchangeRate) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = rate;
    }
}
