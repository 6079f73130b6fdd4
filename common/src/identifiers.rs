//! Identifier types for exchange rate sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of an upstream exchange that can quote rates.
///
/// The set is closed: every variant must have a matching `RateSource`
/// registered at startup. The declaration order here is the default
/// fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    /// Binance spot ticker.
    Binance,
    /// KuCoin level-1 order book.
    Kucoin,
}

impl SourceId {
    /// All known sources, in declared order.
    pub const ALL: [SourceId; 2] = [SourceId::Binance, SourceId::Kucoin];

    /// Wire name of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Binance => "binance",
            SourceId::Kucoin => "kucoin",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a source name does not match any known exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported exchange source: {0}")]
pub struct UnknownSourceError(pub String);

impl FromStr for SourceId {
    type Err = UnknownSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSourceError(s.to_string()))
    }
}
