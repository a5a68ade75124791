//! Current Bitcoin price from the Blockchain.com ticker.
//!
//! [`PriceService`] fetches the ticker once on construction and keeps the
//! quotation for one currency in memory. Call [`PriceService::refresh`] to
//! update it, either from the network or from a payload you supply.

pub mod config;
pub mod duration;
pub mod error;
pub mod market_data;

pub use error::PriceError;
pub use market_data::{CurrencyView, PriceService, Quotation};
