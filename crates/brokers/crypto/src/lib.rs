//! Crypto exchange broker adapter.
//!
//! Signed REST integration with Binance USDT-M Futures: request signing,
//! response normalization and per-type order construction.

pub mod client;
pub mod config;
pub mod error;
pub mod orders;
pub mod params;
pub mod signing;

pub use client::{handle_response, FuturesApi, FuturesClient};
pub use config::{ClientConfig, Credentials, API_KEY_ENV, API_SECRET_ENV, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use orders::{
    order_params, place_limit_order, place_market_order, place_order, place_stop_market_order,
};
pub use params::RequestParams;
pub use signing::sign;
