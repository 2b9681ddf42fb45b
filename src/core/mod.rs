//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod converter;
pub mod currency;
pub mod log;
pub mod rate;
pub mod rate_cache;

// Re-export main types for cleaner imports
pub use cache::KeyValueCollection;
pub use converter::{ConverterState, Direction, DisplayMode};
pub use currency::{CurrencyPair, CurrencyRateProvider, FetchError};
pub use rate::ExchangeRate;
pub use rate_cache::{RateCache, RateSource};
