//! Rate source capability and test doubles.

use async_trait::async_trait;
use coinconv_common::Currency;
use rust_decimal::Decimal;

/// A single upstream that can quote a pairwise rate.
///
/// Implementations must not fail loudly: an unknown pair, a malformed
/// payload and a transport error all collapse to `None`, which the
/// resolver reads as "try the next candidate".
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Get the source name, for logs.
    fn name(&self) -> &str;

    /// Fetch how many `to` units one `from` unit buys.
    async fn fetch_rate(&self, from: &Currency, to: &Currency) -> Option<Decimal>;
}

/// Mock rate source for testing.
///
/// Answers from a fixed table and records every call it receives.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateSource {
    name: String,
    rates: dashmap::DashMap<(Currency, Currency), Decimal>,
    calls: parking_lot::Mutex<Vec<(Currency, Currency)>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateSource {
    /// Create a new mock source that knows no rates.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: dashmap::DashMap::new(),
            calls: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Set a rate for a currency pair.
    pub fn set_rate(&self, from: &str, to: &str, value: Decimal) {
        self.rates.insert((Currency::new(from), Currency::new(to)), value);
    }

    /// Builder form of [`set_rate`](Self::set_rate).
    pub fn with_rate(self, from: &str, to: &str, value: Decimal) -> Self {
        self.set_rate(from, to, value);
        self
    }

    /// Pairs requested so far, in call order.
    pub fn calls(&self) -> Vec<(Currency, Currency)> {
        self.calls.lock().clone()
    }

    /// Number of fetches received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateSource for MockRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rate(&self, from: &Currency, to: &Currency) -> Option<Decimal> {
        self.calls.lock().push((from.clone(), to.clone()));
        self.rates
            .get(&(from.clone(), to.clone()))
            .map(|r| *r.value())
    }
}
