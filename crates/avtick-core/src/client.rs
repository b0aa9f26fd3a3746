//! High-level Alpha Vantage session.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::domain::Symbol;
use crate::error::ApiError;
use crate::fetch::FetchClient;
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::normalize::{self, clean_keys, DataTable};
use crate::query::{ApiFunction, IndicatorParams, QueryBuilder, DEFAULT_BASE_URL};
use crate::retry::RetryPolicy;

/// Configuration for one API session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// One cleaned symbol-search match; field order follows the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatch {
    pub fields: Map<String, Value>,
}

impl SymbolMatch {
    pub fn symbol(&self) -> &str {
        self.text("symbol")
    }

    pub fn name(&self) -> &str {
        self.text("name")
    }

    fn text(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

/// Cleaned GLOBAL_QUOTE fields; field order follows the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteFields {
    pub fields: Map<String, Value>,
}

/// Alpha Vantage API session.
///
/// Holds the query builder and fetch client for one API key; operations
/// borrow the session, so session state is explicit rather than mutated
/// across an interactive loop.
pub struct AlphaVantage {
    queries: QueryBuilder,
    fetch: FetchClient,
}

impl AlphaVantage {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http: Arc<dyn HttpClient>, config: ClientConfig) -> Self {
        Self {
            queries: QueryBuilder::new(config.base_url, config.api_key),
            fetch: FetchClient::with_http_client(http, config.retry, config.timeout),
        }
    }

    /// Symbol search by keyword; numeric key prefixes are stripped from
    /// every match.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SymbolMatch>, ApiError> {
        let url = self.queries.search_url(keyword);
        let raw = self.fetch.fetch_json(&url).await?;

        let matches = raw
            .get("bestMatches")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::Malformed {
                reason: String::from("response has no 'bestMatches' array"),
            })?;

        matches
            .iter()
            .map(|entry| {
                let fields = entry.as_object().ok_or_else(|| ApiError::Malformed {
                    reason: String::from("symbol match is not an object"),
                })?;
                Ok(SymbolMatch {
                    fields: clean_keys(fields),
                })
            })
            .collect()
    }

    /// Current quote for a symbol, keys cleaned and order preserved.
    pub async fn quote(&self, symbol: &Symbol) -> Result<QuoteFields, ApiError> {
        let url = self.queries.quote_url(symbol);
        let raw = self.fetch.fetch_json(&url).await?;

        let fields = raw
            .get("Global Quote")
            .and_then(Value::as_object)
            .ok_or_else(|| ApiError::Malformed {
                reason: String::from("response has no 'Global Quote' object"),
            })?;

        Ok(QuoteFields {
            fields: clean_keys(fields),
        })
    }

    /// Concurrently fetches and normalizes one table per time-series
    /// function. Entries come back in input order; each carries its own
    /// success or failure so one bad payload never hides its siblings.
    pub async fn time_series(
        &self,
        symbol: &Symbol,
        functions: &[ApiFunction],
    ) -> Vec<Result<DataTable, ApiError>> {
        let urls: Vec<String> = functions
            .iter()
            .map(|function| self.queries.time_series_url(*function, symbol))
            .collect();
        self.fetch_tables(functions, &urls).await
    }

    /// Concurrently fetches and normalizes one table per indicator function.
    pub async fn indicators(
        &self,
        symbol: &Symbol,
        functions: &[ApiFunction],
        params: &IndicatorParams,
    ) -> Vec<Result<DataTable, ApiError>> {
        let urls: Vec<String> = functions
            .iter()
            .map(|function| self.queries.indicator_url(*function, symbol, params))
            .collect();
        self.fetch_tables(functions, &urls).await
    }

    async fn fetch_tables(
        &self,
        functions: &[ApiFunction],
        urls: &[String],
    ) -> Vec<Result<DataTable, ApiError>> {
        let payloads = self.fetch.fetch_all(urls).await;
        functions
            .iter()
            .zip(payloads)
            .map(|(function, payload)| {
                payload.and_then(|raw| normalize::normalize(*function, &raw))
            })
            .collect()
    }
}
