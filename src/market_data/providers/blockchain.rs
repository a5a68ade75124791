//! Blockchain.com ticker provider.
//!
//! The `/ticker` endpoint returns the current Bitcoin price in every fiat
//! currency it supports, keyed by currency code. No API key is required.
//! Docs: https://www.blockchain.com/explorer/api/exchange_rates_api

use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures::{pin_mut, Stream, TryStreamExt};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::Config;
use crate::error::{PriceError, Result};
use crate::market_data::TickerSource;

pub const BLOCKCHAIN_TICKER_URL: &str = "https://blockchain.info/ticker";

/// Requests slower than this fail instead of blocking the caller.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Header that lets the remote server tell what kind of traffic it is receiving.
pub const DEFAULT_HEADER_NAME: &str = "btcprice";
pub const DEFAULT_HEADER_VALUE: &str = "BTC price";

/// Ceiling on a ticker body. The real payload is a few kilobytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Live ticker source backed by a single HTTP GET.
#[derive(Debug, Clone)]
pub struct BlockchainTickerSource {
    client: Client,
    url: String,
    timeout: Duration,
    header_name: String,
    header_value: String,
}

impl BlockchainTickerSource {
    /// Creates a source for the public Blockchain.com ticker.
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Creates a source with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            url: BLOCKCHAIN_TICKER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            header_name: DEFAULT_HEADER_NAME.to_string(),
            header_value: DEFAULT_HEADER_VALUE.to_string(),
        }
    }

    /// Builds a source from the endpoint, timeout and header in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_base_url(config.endpoint.clone())
            .with_timeout(config.timeout)
            .with_header(config.header.name.clone(), config.header.value.clone())
    }

    /// Points the source at a different ticker URL (mirrors, mock servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the identifying header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_name = name.into();
        self.header_value = value.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues the GET and checks for a 2xx status. Never retries.
    async fn get_response(&self) -> Result<Response> {
        debug!(url = %self.url, timeout = ?self.timeout, "requesting ticker");

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .header(ACCEPT, "application/json")
            .header(self.header_name.as_str(), self.header_value.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PriceError::Status { status, body });
        }

        Ok(response)
    }
}

impl Default for BlockchainTickerSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TickerSource for BlockchainTickerSource {
    async fn fetch_ticker(&self) -> Result<Vec<u8>> {
        let response = self.get_response().await?;
        let chunks = response.bytes_stream().map_err(io::Error::other);
        let body = drain_body(chunks, MAX_BODY_BYTES).await?;
        debug!(bytes = body.len(), "ticker body received");
        Ok(body)
    }

    fn name(&self) -> &str {
        "blockchain"
    }
}

/// Collects a stream of body chunks into one buffer.
///
/// Stops at the first chunk error or once more than `limit` bytes arrive; an
/// empty stream yields an empty buffer.
pub(crate) async fn drain_body<S>(body: S, limit: usize) -> Result<Vec<u8>>
where
    S: Stream<Item = io::Result<Bytes>>,
{
    pin_mut!(body);

    let mut buf = Vec::new();
    while let Some(chunk) = body.try_next().await? {
        if buf.len() + chunk.len() > limit {
            return Err(PriceError::Read(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("response body exceeds {limit} bytes"),
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}
