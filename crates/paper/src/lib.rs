use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use common::console::{self, Tone};
use common::{OrderExecutor, OrderOutcome, OrderRequest};

/// Simulated order execution.
///
/// Reports what would have been placed and touches nothing outside the
/// process. No real orders are ever sent to Binance.
#[derive(Debug, Default)]
pub struct PaperExecutor {
    /// Orders simulated since startup, for logging only.
    simulated: AtomicU64,
}

impl PaperExecutor {
    pub fn new() -> Self {
        info!("PaperExecutor initialized: orders are simulated");
        Self::default()
    }

    pub fn simulated_count(&self) -> u64 {
        self.simulated.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl OrderExecutor for PaperExecutor {
    async fn execute(&self, order: &OrderRequest) -> OrderOutcome {
        let n = self.simulated.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            pair = %order.pair,
            side = %order.side,
            qty = order.quantity,
            simulated_total = n,
            "[SIMULATE] order not sent"
        );
        console::say(
            Tone::Warning,
            &format!("[SIMULATE] {} order on {}.", order.side, order.pair),
        );
        OrderOutcome::simulated(format!(
            "would have placed {} on {}",
            order.side, order.pair
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderSide;

    #[tokio::test]
    async fn simulated_buy_reports_intent() {
        let executor = PaperExecutor::new();
        let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, 0.001);
        let outcome = executor.execute(&order).await;

        assert!(outcome.simulated);
        assert!(outcome.success);
        assert_eq!(outcome.detail, "would have placed BUY on BTCUSDT");
    }

    #[tokio::test]
    async fn simulated_sell_reports_intent() {
        let executor = PaperExecutor::new();
        let order = OrderRequest::market("ETHUSDT", OrderSide::Sell, 1.0);
        let outcome = executor.execute(&order).await;

        assert_eq!(outcome, OrderOutcome::simulated("would have placed SELL on ETHUSDT"));
    }

    #[tokio::test]
    async fn counts_simulated_orders() {
        let executor = PaperExecutor::new();
        for _ in 0..3 {
            executor
                .execute(&OrderRequest::market("ETHUSDT", OrderSide::Buy, 1.0))
                .await;
        }
        assert_eq!(executor.simulated_count(), 3);
    }
}
