//! CoinConv Server
//!
//! HTTP front end for the conversion engine: request validation, error
//! mapping, metrics and process wiring.

pub mod api;
pub mod config;
pub mod metrics;
pub mod state;

pub use api::router;
pub use config::ServerConfig;
pub use state::AppState;
