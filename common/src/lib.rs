//! CoinConv Common Types
//!
//! Shared value types used across the CoinConv workspace: currency
//! identifiers, exchange source identifiers, rates and time helpers.

pub mod identifiers;
pub mod monetary;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use time::*;
