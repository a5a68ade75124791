use chrono::{DateTime, Utc};
use tracing::debug;

use super::models::normalize_currency;
use super::providers::BlockchainTickerSource;
use super::{CurrencyView, Quotation, TickerSource};
use crate::config::Config;
use crate::error::Result;

/// Holds the last known quotation for one currency and refreshes it on demand.
///
/// Construction performs the first fetch, so a `PriceService` always holds a
/// complete quotation. Every refresh replaces the whole view or, on error,
/// leaves it as it was.
pub struct PriceService {
    source: Box<dyn TickerSource>,
    currency: String,
    view: CurrencyView,
    updated_at: DateTime<Utc>,
}

impl PriceService {
    /// Creates a service backed by the Blockchain.com ticker described by `config`.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_source(BlockchainTickerSource::from_config(config), &config.currency).await
    }

    /// Creates a service backed by any ticker source and fetches the first quotation.
    pub async fn with_source(source: impl TickerSource + 'static, currency: &str) -> Result<Self> {
        let currency = normalize_currency(currency);
        let payload = source.fetch_ticker().await?;
        let view = CurrencyView::from_payload(&payload, &currency)?;
        debug!(
            source = source.name(),
            currency = %currency,
            last = view.quotation.last,
            "price service initialized"
        );

        Ok(Self {
            source: Box::new(source),
            currency,
            view,
            updated_at: Utc::now(),
        })
    }

    /// Replaces the stored quotation.
    ///
    /// A non-empty `payload` is decoded in place of a network fetch; `None` or
    /// an empty slice fetches from the configured source.
    pub async fn refresh(&mut self, payload: Option<&[u8]>) -> Result<()> {
        match payload {
            Some(payload) if !payload.is_empty() => self.refresh_from_payload(payload),
            _ => self.refresh_from_network().await,
        }
    }

    /// Fetches a fresh payload from the ticker source and stores it.
    pub async fn refresh_from_network(&mut self) -> Result<()> {
        let payload = self.source.fetch_ticker().await?;
        self.refresh_from_payload(&payload)
    }

    /// Decodes a caller-supplied payload and stores it.
    pub fn refresh_from_payload(&mut self, payload: &[u8]) -> Result<()> {
        let view = CurrencyView::from_payload(payload, &self.currency)?;
        self.store(view);
        Ok(())
    }

    fn store(&mut self, view: CurrencyView) {
        debug!(
            currency = %view.currency,
            previous_last = self.view.quotation.last,
            last = view.quotation.last,
            "quotation updated"
        );
        self.view = view;
        self.updated_at = Utc::now();
    }

    pub fn view(&self) -> &CurrencyView {
        &self.view
    }

    pub fn quotation(&self) -> &Quotation {
        &self.view.quotation
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// 15 minutes delayed market price.
    pub fn market(&self) -> f64 {
        self.view.quotation.market
    }

    pub fn last(&self) -> f64 {
        self.view.quotation.last
    }

    pub fn buy(&self) -> f64 {
        self.view.quotation.buy
    }

    pub fn sell(&self) -> f64 {
        self.view.quotation.sell
    }

    /// When the stored quotation was last replaced.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}

impl std::fmt::Debug for PriceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceService")
            .field("source", &self.source.name())
            .field("view", &self.view)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
