//! Exchange client configuration.

use std::time::Duration;

/// Endpoints and HTTP settings for the exchange sources.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Binance REST base URL.
    pub binance_url: String,
    /// KuCoin REST base URL.
    pub kucoin_url: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            binance_url: "https://api.binance.com".to_string(),
            kucoin_url: "https://api.kucoin.com".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ExchangeConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.binance_url.is_empty() {
            return Err("Binance URL cannot be empty".to_string());
        }

        if self.kucoin_url.is_empty() {
            return Err("KuCoin URL cannot be empty".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("Exchange request timeout cannot be zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert!(ExchangeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = ExchangeConfig {
            kucoin_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
