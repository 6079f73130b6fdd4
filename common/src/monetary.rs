//! Monetary types for CoinConv.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::identifiers::SourceId;
use crate::time::EpochSeconds;

/// Number of decimal places used when rendering rates and amounts on the wire.
pub const WIRE_DECIMAL_PLACES: u32 = 2;

/// Opaque currency or token code, e.g. `BTC` or `USDT`.
///
/// Codes are compared by exact string equality. No case folding or alias
/// resolution happens here; `btc` and `BTC` are different currencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Whether the code is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An ordered currency pair: how many `to` units one `from` unit buys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being converted.
    pub from: Currency,
    /// Currency being converted into.
    pub to: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(from: impl Into<Currency>, to: impl Into<Currency>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// A rate quoted by one source at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Units of the quote currency per unit of the base currency.
    pub value: Decimal,
    /// Source the rate is attributed to.
    pub source: SourceId,
    /// When the rate was fetched.
    pub timestamp: EpochSeconds,
}

impl Rate {
    /// Create a new rate.
    pub fn new(value: Decimal, source: SourceId, timestamp: EpochSeconds) -> Self {
        Self {
            value,
            source,
            timestamp,
        }
    }

    /// Apply the rate to an amount. Exact, unrounded; `None` on overflow.
    pub fn apply(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.value)
    }
}

/// Render a decimal with exactly two fractional digits.
///
/// Rounds half to even, the same way `Decimal::round_dp` does.
pub fn format_two_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp(WIRE_DECIMAL_PLACES);
    rounded.rescale(WIRE_DECIMAL_PLACES);
    rounded.to_string()
}

/// Serde adapter writing a decimal as a two-decimal string.
pub mod two_decimal {
    use super::*;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_two_decimal(*value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_is_not_normalized() {
        assert_ne!(Currency::new("btc"), Currency::new("BTC"));
        assert_eq!(Currency::new("BTC").code(), "BTC");
    }

    #[test]
    fn test_blank_currency() {
        assert!(Currency::new("  ").is_blank());
        assert!(!Currency::new("ETH").is_blank());
    }

    #[test]
    fn test_pair_display() {
        let pair = CurrencyPair::new("TRX", "ADA");
        assert_eq!(pair.to_string(), "TRX/ADA");
    }

    #[test]
    fn test_format_two_decimal() {
        assert_eq!(format_two_decimal(dec!(3.14159)), "3.14");
        assert_eq!(format_two_decimal(dec!(2.71828)), "2.72");
        assert_eq!(format_two_decimal(dec!(1)), "1.00");
        assert_eq!(format_two_decimal(dec!(10.0)), "10.00");
        assert_eq!(format_two_decimal(dec!(2.46912)), "2.47");
    }

    #[test]
    fn test_format_two_decimal_rounds_half_even() {
        assert_eq!(format_two_decimal(dec!(0.125)), "0.12");
        assert_eq!(format_two_decimal(dec!(0.135)), "0.14");
    }

    #[test]
    fn test_rate_apply() {
        let rate = Rate::new(dec!(1.23456), SourceId::Binance, 0);
        assert_eq!(rate.apply(dec!(2.0)), Some(dec!(2.469120)));
    }

    #[test]
    fn test_rate_apply_overflow() {
        let rate = Rate::new(dec!(2), SourceId::Binance, 0);
        assert_eq!(rate.apply(Decimal::MAX), None);
    }
}
