//! Core fetch and normalization layer for the Alpha Vantage terminal client.
//!
//! - [`client`]: high-level API session (search, quote, time series, indicators)
//! - [`query`]: function descriptors and URL construction
//! - [`fetch`]: concurrent GET with per-URL retry
//! - [`normalize`]: raw payloads reshaped into uniform tables
//! - [`retry`]: attempt budgets and backoff schedules
//! - [`http`]: transport trait plus the reqwest implementation
//! - [`domain`]: validated symbols and indicator parameters

pub mod client;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod http;
pub mod normalize;
pub mod query;
pub mod retry;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{AlphaVantage, ClientConfig, QuoteFields, SymbolMatch};
pub use domain::{IndicatorInterval, SeriesType, Symbol};
pub use error::{ApiError, ValidationError};
pub use fetch::FetchClient;
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use normalize::{clean_keys, DataTable, TIME_SERIES_COLUMNS};
pub use query::{ApiFunction, IndicatorParams, QueryBuilder, DEFAULT_BASE_URL};
pub use retry::{Backoff, RetryPolicy};
