use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PriceError, Result};

/// Currency consumed when none is configured.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Price of one asset in one currency, as published by the ticker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quotation {
    /// 15 minutes delayed market price.
    #[serde(rename = "15m")]
    pub market: f64,
    /// Most recent trade price.
    pub last: f64,
    pub buy: f64,
    pub sell: f64,
    /// Display symbol for the currency (e.g. "$", "€").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// The quotation for a single currency code taken from a ticker payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyView {
    pub currency: String,
    pub quotation: Quotation,
}

impl CurrencyView {
    /// Decode a ticker payload and keep only the entry for `currency`.
    ///
    /// The payload is an object keyed by currency code. Entries for other
    /// currencies are not validated.
    pub fn from_payload(payload: &[u8], currency: &str) -> Result<Self> {
        let currency = normalize_currency(currency);
        let mut entries: Map<String, Value> = serde_json::from_slice(payload)?;

        let entry = entries
            .remove(&currency)
            .ok_or_else(|| PriceError::MissingCurrency(currency.clone()))?;
        let quotation: Quotation = serde_json::from_value(entry)?;

        Ok(Self {
            currency,
            quotation,
        })
    }
}

/// Currency codes are matched upper-case, the way the ticker publishes them.
pub fn normalize_currency(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TICKER: &str = r#"{
        "USD" : {"15m" : 7154.09, "last" : 7154.10, "buy" : 7154.11, "sell" : 7154.12, "symbol" : "$"},
        "AUD" : {"15m" : 9289.28, "last" : 9289.28, "buy" : 9289.28, "sell" : 9289.28, "symbol" : "$"},
        "EUR" : {"15m" : 5798.39, "last" : 5798.39, "buy" : 5798.39, "sell" : 5798.39, "symbol" : "€"}
    }"#;

    #[test]
    fn parses_requested_currency() {
        let view = CurrencyView::from_payload(SAMPLE_TICKER.as_bytes(), "USD").unwrap();
        assert_eq!(view.currency, "USD");
        assert_eq!(view.quotation.market, 7154.09);
        assert_eq!(view.quotation.last, 7154.10);
        assert_eq!(view.quotation.buy, 7154.11);
        assert_eq!(view.quotation.sell, 7154.12);
        assert_eq!(view.quotation.symbol.as_deref(), Some("$"));
    }

    #[test]
    fn currency_lookup_is_case_insensitive() {
        let view = CurrencyView::from_payload(SAMPLE_TICKER.as_bytes(), " eur ").unwrap();
        assert_eq!(view.currency, "EUR");
        assert_eq!(view.quotation.last, 5798.39);
    }

    #[test]
    fn symbol_is_optional() {
        let payload = br#"{"USD": {"15m": 1.0, "last": 2.0, "buy": 3.0, "sell": 4.0}}"#;
        let view = CurrencyView::from_payload(payload, "USD").unwrap();
        assert_eq!(view.quotation.symbol, None);
        assert_eq!(view.quotation.sell, 4.0);
    }

    #[test]
    fn missing_currency_is_reported() {
        let err = CurrencyView::from_payload(SAMPLE_TICKER.as_bytes(), "JPY").unwrap_err();
        assert!(matches!(err, PriceError::MissingCurrency(code) if code == "JPY"));
    }

    #[test]
    fn missing_price_field_is_a_parse_error() {
        // No partial quotation: every price key must be present.
        let payload = br#"{"USD": {"15m": 1.0, "last": 2.0, "buy": 3.0}}"#;
        let err = CurrencyView::from_payload(payload, "USD").unwrap_err();
        assert!(matches!(err, PriceError::Parse(_)));
    }

    #[test]
    fn malformed_other_currencies_are_ignored() {
        let payload = br#"{
            "USD": {"15m": 1.0, "last": 2.0, "buy": 3.0, "sell": 4.0},
            "GBP": "not a quotation"
        }"#;
        let view = CurrencyView::from_payload(payload, "USD").unwrap();
        assert_eq!(view.quotation.last, 2.0);
    }

    #[test]
    fn non_object_payload_is_a_parse_error() {
        let err = CurrencyView::from_payload(b"[1, 2, 3]", "USD").unwrap_err();
        assert!(matches!(err, PriceError::Parse(_)));
    }

    #[test]
    fn serializes_market_under_ticker_key() {
        let quotation = Quotation {
            market: 1.5,
            last: 2.5,
            buy: 3.5,
            sell: 4.5,
            symbol: None,
        };
        let json = serde_json::to_value(&quotation).unwrap();
        assert_eq!(json["15m"], 1.5);
        assert!(json.get("symbol").is_none());
    }
}
