//! CLI argument definitions for avtick.

use avtick_core::RetryPolicy;
use clap::Parser;

/// Interactive Alpha Vantage terminal client.
///
/// Search for symbols, then drill into quotes, historical prices, and
/// technical indicators from a menu-driven session.
#[derive(Debug, Parser)]
#[command(name = "avtick", version, about = "Interactive Alpha Vantage terminal client")]
pub struct Cli {
    /// API key. Falls back to the AVTICK_API_KEY environment variable,
    /// then an interactive prompt.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Request timeout budget in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Attempts per request before giving up.
    #[arg(long, default_value_t = 5)]
    pub max_attempts: u32,

    /// Retry forever with a fixed 2s delay instead of bounded backoff.
    #[arg(long, default_value_t = false)]
    pub legacy_retry: bool,
}

impl Cli {
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.legacy_retry {
            RetryPolicy::legacy()
        } else {
            RetryPolicy::bounded(self.max_attempts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retry_is_bounded() {
        let cli = Cli::parse_from(["avtick"]);
        assert_eq!(cli.retry_policy().max_attempts, Some(5));
    }

    #[test]
    fn legacy_flag_selects_unbounded_retry() {
        let cli = Cli::parse_from(["avtick", "--legacy-retry"]);
        assert_eq!(cli.retry_policy().max_attempts, None);
    }

    #[test]
    fn max_attempts_flag_is_honored() {
        let cli = Cli::parse_from(["avtick", "--max-attempts", "3"]);
        assert_eq!(cli.retry_policy().max_attempts, Some(3));
    }
}
