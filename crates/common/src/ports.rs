use async_trait::async_trait;

use crate::{OrderConfirmation, OrderOutcome, OrderRequest, PriceSeries, Result};

/// Source of historical closes for a pair.
///
/// `BinanceFuturesClient` implements this against the klines endpoint.
/// Implementations return whatever history exists when the pair is young;
/// only an unreachable or misbehaving source is an error.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch up to `lookback` of the most recent closed candles at `interval`
    /// (e.g. "1m").
    async fn fetch(&self, pair: &str, interval: &str, lookback: usize) -> Result<PriceSeries>;
}

/// Real order placement on the exchange. Only `LiveExecutor` holds one.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, order: &OrderRequest) -> Result<OrderConfirmation>;
}

/// Best-effort delivery of a human-readable alert.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<()>;
}

/// Turns an order request into an outcome.
///
/// `PaperExecutor` simulates and `LiveExecutor` submits. The implementation
/// is chosen once at startup from the operating mode; callers never branch
/// on the mode themselves. Failures are reported in the outcome, never
/// returned as errors.
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    async fn execute(&self, order: &OrderRequest) -> OrderOutcome;
}
