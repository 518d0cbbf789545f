use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use common::console::{self, Tone};
use common::{OrderExecutor, OrderOutcome, OrderRequest, OrderSubmitter};

/// Submits market orders to the exchange.
///
/// This is the ONLY component that calls `OrderSubmitter::submit`. Every
/// failure is folded into a failed `OrderOutcome` so the scheduler keeps
/// running.
pub struct LiveExecutor {
    submitter: Arc<dyn OrderSubmitter>,
}

impl LiveExecutor {
    pub fn new(submitter: Arc<dyn OrderSubmitter>) -> Self {
        info!("LiveExecutor ready: orders will be sent to the exchange");
        Self { submitter }
    }
}

#[async_trait]
impl OrderExecutor for LiveExecutor {
    async fn execute(&self, order: &OrderRequest) -> OrderOutcome {
        info!(pair = %order.pair, side = %order.side, qty = order.quantity, "Executing order");

        match self.submitter.submit(order).await {
            Ok(confirmation) => {
                info!(
                    pair = %confirmation.pair,
                    order_id = confirmation.order_id,
                    status = %confirmation.status,
                    price = confirmation.avg_price,
                    qty = confirmation.executed_qty,
                    "Order executed"
                );
                let detail = format!(
                    "order {} {} {} {} on {} (avg price {})",
                    confirmation.order_id,
                    confirmation.status,
                    confirmation.side,
                    confirmation.executed_qty,
                    confirmation.pair,
                    confirmation.avg_price
                );
                console::say(Tone::Info, &format!("Order executed: {detail}"));
                OrderOutcome::filled(detail)
            }
            Err(e) => {
                error!(pair = %order.pair, error = %e, "Order submission failed");
                console::say(Tone::Failure, &format!("Error placing order: {e}"));
                OrderOutcome::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{Error, OrderConfirmation, OrderSide, Result};

    struct Accepting;

    #[async_trait]
    impl OrderSubmitter for Accepting {
        async fn submit(&self, order: &OrderRequest) -> Result<OrderConfirmation> {
            Ok(OrderConfirmation {
                order_id: 42,
                client_order_id: order.id.clone(),
                pair: order.pair.clone(),
                side: order.side,
                status: "FILLED".into(),
                executed_qty: order.quantity,
                avg_price: 100.0,
                timestamp: Utc::now(),
            })
        }
    }

    struct Rejecting;

    #[async_trait]
    impl OrderSubmitter for Rejecting {
        async fn submit(&self, _order: &OrderRequest) -> Result<OrderConfirmation> {
            Err(Error::Submission("HTTP 400: Margin is insufficient.".into()))
        }
    }

    #[tokio::test]
    async fn accepted_order_is_success() {
        let executor = LiveExecutor::new(Arc::new(Accepting));
        let outcome = executor
            .execute(&OrderRequest::market("BTCUSDT", OrderSide::Buy, 0.001))
            .await;
        assert!(outcome.success);
        assert!(!outcome.simulated);
        assert!(outcome.detail.contains("order 42 FILLED"));
    }

    #[tokio::test]
    async fn rejected_order_is_reported_not_raised() {
        let executor = LiveExecutor::new(Arc::new(Rejecting));
        let outcome = executor
            .execute(&OrderRequest::market("BTCUSDT", OrderSide::Sell, 0.001))
            .await;
        assert!(!outcome.success);
        assert!(!outcome.simulated);
        assert!(outcome.detail.contains("Margin is insufficient"));
    }
}
