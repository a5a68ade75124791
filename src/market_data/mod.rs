mod models;
pub mod providers;
mod service;
mod source;

pub use models::{normalize_currency, CurrencyView, Quotation, DEFAULT_CURRENCY};
pub use service::PriceService;
pub use source::{StaticTickerSource, TickerSource};
