//! Reshaping of raw API payloads into uniform tabular results.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::query::ApiFunction;

/// Column headers assigned to every time-series table. The upstream field
/// order ("1. open" through "5. volume") is assumed to match this sequence;
/// the headers are fixed rather than derived from the payload.
pub const TIME_SERIES_COLUMNS: [&str; 6] = ["datetime", "open", "high", "low", "close", "volume"];

/// Uniform tabular result produced from one API payload.
///
/// Rows follow the payload's own key iteration order, which the upstream does
/// not guarantee to be chronological.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reshapes one raw payload into a [`DataTable`] for the given function.
///
/// The data series is looked up under the key the function declares via
/// [`ApiFunction::series_key`]; a missing or misshapen series is a typed
/// error, never a silent omission.
pub fn normalize(function: ApiFunction, raw: &Value) -> Result<DataTable, ApiError> {
    let key = function.series_key().ok_or_else(|| ApiError::Malformed {
        reason: format!("function {function} does not return a data series"),
    })?;

    let series = raw.get(key).ok_or_else(|| ApiError::MissingSeries {
        key: key.to_owned(),
    })?;
    let series = series.as_object().ok_or_else(|| ApiError::Malformed {
        reason: format!("data series '{key}' is not an object"),
    })?;

    let mut rows = Vec::with_capacity(series.len());
    for (timestamp, fields) in series {
        let fields = fields.as_object().ok_or_else(|| ApiError::Malformed {
            reason: format!("entry '{timestamp}' in '{key}' is not an object"),
        })?;

        let mut row = Vec::with_capacity(fields.len() + 1);
        row.push(timestamp.clone());
        row.extend(fields.values().map(value_text));
        rows.push(row);
    }

    let columns = if function.is_indicator() {
        vec![
            String::from("datetime"),
            indicator_label(key).to_owned(),
        ]
    } else {
        TIME_SERIES_COLUMNS.iter().map(|c| String::from(*c)).collect()
    };

    Ok(DataTable {
        title: key.to_owned(),
        columns,
        rows,
    })
}

/// Strips a leading `<digits>. ` prefix from every key and trims whitespace.
///
/// Pure and total: keys without the prefix pass through trimmed, values are
/// untouched and keep their order.
pub fn clean_keys(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (clean_key(key), value.clone()))
        .collect()
}

fn clean_key(key: &str) -> String {
    let rest = key.trim_start_matches(|ch: char| ch.is_ascii_digit());
    if rest.len() < key.len() {
        if let Some(stripped) = rest.strip_prefix('.') {
            return stripped.trim().to_owned();
        }
    }
    key.trim().to_owned()
}

/// Indicator column name: the text after the title's last colon, trimmed.
fn indicator_label(title: &str) -> &str {
    title
        .rsplit(':')
        .next()
        .map(str::trim)
        .unwrap_or(title)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cleans_numeric_prefixed_keys() {
        let fields = json!({
            "1. symbol": "IBM",
            "2. name": "Intl Business Machines"
        });
        let cleaned = clean_keys(fields.as_object().expect("fixture is an object"));

        let keys: Vec<&String> = cleaned.keys().collect();
        assert_eq!(keys, ["symbol", "name"]);
        assert_eq!(cleaned.get("symbol"), Some(&json!("IBM")));
        assert_eq!(cleaned.get("name"), Some(&json!("Intl Business Machines")));
    }

    #[test]
    fn keys_without_prefix_are_only_trimmed() {
        let fields = json!({" latestDay ": "2024-05-03", "52WeekHigh": "199.18"});
        let cleaned = clean_keys(fields.as_object().expect("fixture is an object"));

        let keys: Vec<&String> = cleaned.keys().collect();
        assert_eq!(keys, ["latestDay", "52WeekHigh"]);
    }

    #[test]
    fn normalizes_weekly_time_series() {
        let raw = json!({
            "Meta Data": {"1. Information": "Weekly Prices", "2. Symbol": "IBM"},
            "Weekly Time Series": {
                "2024-05-03": {
                    "1. open": "166.0", "2. high": "168.5", "3. low": "165.1",
                    "4. close": "167.2", "5. volume": "21231199"
                },
                "2024-04-26": {
                    "1. open": "181.1", "2. high": "184.2", "3. low": "165.9",
                    "4. close": "167.1", "5. volume": "40191686"
                }
            }
        });

        let table =
            normalize(ApiFunction::TimeSeriesWeekly, &raw).expect("payload should normalize");

        assert_eq!(table.title, "Weekly Time Series");
        assert_eq!(
            table.columns,
            ["datetime", "open", "high", "low", "close", "volume"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0],
            ["2024-05-03", "166.0", "168.5", "165.1", "167.2", "21231199"]
        );
        assert_eq!(table.rows[0].len(), table.columns.len());
    }

    #[test]
    fn indicator_column_is_text_after_last_colon() {
        let raw = json!({
            "Meta Data": {"1: Symbol": "IBM", "2: Indicator": "Simple Moving Average (SMA)"},
            "Technical Analysis: SMA": {
                "2024-05-03": {"SMA": "172.0164"}
            }
        });

        let table = normalize(ApiFunction::Sma, &raw).expect("payload should normalize");

        assert_eq!(table.title, "Technical Analysis: SMA");
        assert_eq!(table.columns, ["datetime", "SMA"]);
        assert_eq!(table.rows, [["2024-05-03", "172.0164"]]);
    }

    #[test]
    fn missing_series_is_a_typed_error() {
        let raw = json!({"Meta Data": {"1. Information": "Weekly Prices"}});
        let error = normalize(ApiFunction::TimeSeriesWeekly, &raw).expect_err("must fail");
        assert!(
            matches!(error, ApiError::MissingSeries { ref key } if key == "Weekly Time Series")
        );
    }

    #[test]
    fn non_object_series_is_malformed() {
        let raw = json!({"Technical Analysis: EMA": "throttled"});
        let error = normalize(ApiFunction::Ema, &raw).expect_err("must fail");
        assert!(matches!(error, ApiError::Malformed { .. }));
    }

    #[test]
    fn non_object_entry_is_malformed() {
        let raw = json!({"Weekly Time Series": {"2024-05-03": "167.2"}});
        let error = normalize(ApiFunction::TimeSeriesWeekly, &raw).expect_err("must fail");
        assert!(matches!(error, ApiError::Malformed { .. }));
    }

    #[test]
    fn functions_without_series_are_rejected() {
        let raw = json!({"Global Quote": {}});
        let error = normalize(ApiFunction::GlobalQuote, &raw).expect_err("must fail");
        assert!(matches!(error, ApiError::Malformed { .. }));
    }

    #[test]
    fn rows_preserve_payload_key_order() {
        let raw = json!({
            "Monthly Time Series": {
                "2024-03-28": {"1. open": "1", "2. high": "2", "3. low": "3", "4. close": "4", "5. volume": "5"},
                "2023-12-29": {"1. open": "1", "2. high": "2", "3. low": "3", "4. close": "4", "5. volume": "5"},
                "2024-01-31": {"1. open": "1", "2. high": "2", "3. low": "3", "4. close": "4", "5. volume": "5"}
            }
        });

        let table =
            normalize(ApiFunction::TimeSeriesMonthly, &raw).expect("payload should normalize");
        let timestamps: Vec<&str> = table.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(timestamps, ["2024-03-28", "2023-12-29", "2024-01-31"]);
    }
}
