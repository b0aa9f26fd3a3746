//! Query descriptors and URL construction for the Alpha Vantage API.

use std::fmt::{Display, Formatter};

use crate::domain::{IndicatorInterval, SeriesType, Symbol};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Interval sent with intraday time-series queries.
const INTRADAY_INTERVAL: &str = "15min";

/// Supported query modes ("functions" in Alpha Vantage terms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFunction {
    SymbolSearch,
    GlobalQuote,
    TimeSeriesIntraday,
    TimeSeriesDaily,
    TimeSeriesWeekly,
    TimeSeriesMonthly,
    Sma,
    Ema,
}

impl ApiFunction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SymbolSearch => "SYMBOL_SEARCH",
            Self::GlobalQuote => "GLOBAL_QUOTE",
            Self::TimeSeriesIntraday => "TIME_SERIES_INTRADAY",
            Self::TimeSeriesDaily => "TIME_SERIES_DAILY",
            Self::TimeSeriesWeekly => "TIME_SERIES_WEEKLY",
            Self::TimeSeriesMonthly => "TIME_SERIES_MONTHLY",
            Self::Sma => "SMA",
            Self::Ema => "EMA",
        }
    }

    /// Top-level response key under which this function returns its data
    /// series. Declared per function so the normalizer can look the series
    /// up explicitly instead of guessing from key position.
    pub const fn series_key(self) -> Option<&'static str> {
        match self {
            Self::SymbolSearch | Self::GlobalQuote => None,
            Self::TimeSeriesIntraday => Some("Time Series (15min)"),
            Self::TimeSeriesDaily => Some("Time Series (Daily)"),
            Self::TimeSeriesWeekly => Some("Weekly Time Series"),
            Self::TimeSeriesMonthly => Some("Monthly Time Series"),
            Self::Sma => Some("Technical Analysis: SMA"),
            Self::Ema => Some("Technical Analysis: EMA"),
        }
    }

    pub const fn is_indicator(self) -> bool {
        matches!(self, Self::Sma | Self::Ema)
    }

    pub const fn is_time_series(self) -> bool {
        matches!(
            self,
            Self::TimeSeriesIntraday
                | Self::TimeSeriesDaily
                | Self::TimeSeriesWeekly
                | Self::TimeSeriesMonthly
        )
    }
}

impl Display for ApiFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra parameters for technical indicator queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorParams {
    /// Interval between consecutive data points.
    pub interval: IndicatorInterval,
    /// Number of data points per moving-average value.
    pub time_period: u32,
    /// Price series the indicator is computed over.
    pub series_type: SeriesType,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            interval: IndicatorInterval::Weekly,
            time_period: 10,
            series_type: SeriesType::Open,
        }
    }
}

/// Builds query URLs against a configurable endpoint.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_url: String,
    api_key: String,
}

impl QueryBuilder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn search_url(&self, keyword: &str) -> String {
        format!(
            "{}?function={}&keywords={}&apikey={}",
            self.base_url,
            ApiFunction::SymbolSearch,
            urlencoding::encode(keyword.trim()),
            self.api_key
        )
    }

    pub fn quote_url(&self, symbol: &Symbol) -> String {
        format!(
            "{}?function={}&symbol={}&apikey={}",
            self.base_url,
            ApiFunction::GlobalQuote,
            symbol,
            self.api_key
        )
    }

    pub fn time_series_url(&self, function: ApiFunction, symbol: &Symbol) -> String {
        match function {
            ApiFunction::TimeSeriesIntraday => format!(
                "{}?function={}&symbol={}&interval={}&apikey={}",
                self.base_url, function, symbol, INTRADAY_INTERVAL, self.api_key
            ),
            _ => format!(
                "{}?function={}&symbol={}&apikey={}",
                self.base_url, function, symbol, self.api_key
            ),
        }
    }

    pub fn indicator_url(
        &self,
        function: ApiFunction,
        symbol: &Symbol,
        params: &IndicatorParams,
    ) -> String {
        format!(
            "{}?function={}&symbol={}&interval={}&time_period={}&series_type={}&apikey={}",
            self.base_url,
            function,
            symbol,
            params.interval,
            params.time_period,
            params.series_type,
            self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(DEFAULT_BASE_URL, "demo")
    }

    #[test]
    fn search_url_encodes_keyword() {
        let url = builder().search_url("intl business");
        assert_eq!(
            url,
            "https://www.alphavantage.co/query?function=SYMBOL_SEARCH&keywords=intl%20business&apikey=demo"
        );
    }

    #[test]
    fn quote_url_carries_symbol_and_key() {
        let symbol = Symbol::parse("IBM").expect("valid symbol");
        let url = builder().quote_url(&symbol);
        assert_eq!(
            url,
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=IBM&apikey=demo"
        );
    }

    #[test]
    fn intraday_url_includes_interval_extra() {
        let symbol = Symbol::parse("IBM").expect("valid symbol");
        let url = builder().time_series_url(ApiFunction::TimeSeriesIntraday, &symbol);
        assert!(url.contains("function=TIME_SERIES_INTRADAY"));
        assert!(url.contains("&interval=15min&"));
    }

    #[test]
    fn weekly_url_has_no_interval() {
        let symbol = Symbol::parse("IBM").expect("valid symbol");
        let url = builder().time_series_url(ApiFunction::TimeSeriesWeekly, &symbol);
        assert!(url.contains("function=TIME_SERIES_WEEKLY"));
        assert!(!url.contains("interval"));
    }

    #[test]
    fn indicator_url_carries_default_params() {
        let symbol = Symbol::parse("IBM").expect("valid symbol");
        let url = builder().indicator_url(ApiFunction::Sma, &symbol, &IndicatorParams::default());
        assert_eq!(
            url,
            "https://www.alphavantage.co/query?function=SMA&symbol=IBM&interval=weekly&time_period=10&series_type=open&apikey=demo"
        );
    }

    #[test]
    fn series_keys_match_function_kind() {
        assert_eq!(ApiFunction::SymbolSearch.series_key(), None);
        assert_eq!(
            ApiFunction::TimeSeriesWeekly.series_key(),
            Some("Weekly Time Series")
        );
        assert_eq!(
            ApiFunction::Sma.series_key(),
            Some("Technical Analysis: SMA")
        );
        assert!(ApiFunction::Ema.is_indicator());
        assert!(ApiFunction::TimeSeriesMonthly.is_time_series());
        assert!(!ApiFunction::GlobalQuote.is_time_series());
    }
}
