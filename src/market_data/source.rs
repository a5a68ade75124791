use crate::error::Result;

/// Something that can produce a raw ticker payload.
///
/// The payload is an undecoded JSON document keyed by currency code.
#[async_trait::async_trait]
pub trait TickerSource: Send + Sync {
    async fn fetch_ticker(&self) -> Result<Vec<u8>>;

    fn name(&self) -> &str;
}

/// Serves the same payload on every fetch without touching the network.
#[derive(Debug, Clone)]
pub struct StaticTickerSource {
    payload: Vec<u8>,
}

impl StaticTickerSource {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[async_trait::async_trait]
impl TickerSource for StaticTickerSource {
    async fn fetch_ticker(&self) -> Result<Vec<u8>> {
        Ok(self.payload.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
