use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use common::console::{self, Tone};
use common::{
    MarketDataSource, Notifier, OrderExecutor, OrderOutcome, OrderRequest, OrderSide, Signal,
};
use strategy::{Evaluation, Strategy, TradingConfig};

/// Where the scheduler is within a cycle. The index refers to the position
/// of the pair in the configured list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Fetching(usize),
    Evaluating(usize),
    Acting(usize),
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerState::Idle => write!(f, "idle"),
            SchedulerState::Fetching(i) => write!(f, "fetching #{i}"),
            SchedulerState::Evaluating(i) => write!(f, "evaluating #{i}"),
            SchedulerState::Acting(i) => write!(f, "acting #{i}"),
        }
    }
}

/// A signal that was acted on during a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub pair: String,
    pub signal: Signal,
    pub outcome: OrderOutcome,
}

/// What happened during one pass over the configured pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Pairs whose fetch succeeded, in evaluation order.
    pub fetched: Vec<String>,
    /// Pairs skipped this pass because the fetch failed.
    pub failed: Vec<String>,
    pub actions: Vec<Action>,
    /// Pairs whose signal repeated the previous cycle's and was not acted on.
    pub suppressed: Vec<String>,
}

/// Drives fetch → evaluate → notify + execute for each pair, forever.
///
/// Pairs are handled strictly in order, one at a time. A fetch failure
/// costs one cool-down pause and skips that pair until the next cycle;
/// notification failures are logged and never block execution.
pub struct PollingScheduler {
    trading: TradingConfig,
    market_data: Arc<dyn MarketDataSource>,
    strategy: Box<dyn Strategy>,
    notifier: Arc<dyn Notifier>,
    executor: Arc<dyn OrderExecutor>,
    state_tx: watch::Sender<SchedulerState>,
    /// Previous classification per pair; only used when repeated signals
    /// are suppressed.
    last_signals: HashMap<String, Signal>,
}

impl PollingScheduler {
    pub fn new(
        trading: TradingConfig,
        market_data: Arc<dyn MarketDataSource>,
        strategy: Box<dyn Strategy>,
        notifier: Arc<dyn Notifier>,
        executor: Arc<dyn OrderExecutor>,
    ) -> Self {
        if trading.lookback < strategy.required_history() {
            warn!(
                lookback = trading.lookback,
                required = strategy.required_history(),
                "Lookback shorter than strategy history; signals will never fire"
            );
        }
        let (state_tx, _) = watch::channel(SchedulerState::Idle);
        Self {
            trading,
            market_data,
            strategy,
            notifier,
            executor,
            state_tx,
            last_signals: HashMap::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state_tx.borrow()
    }

    /// Watch state transitions from another task.
    pub fn subscribe_state(&self) -> watch::Receiver<SchedulerState> {
        self.state_tx.subscribe()
    }

    fn transition(&self, next: SchedulerState) {
        debug!(state = %next, "Scheduler transition");
        self.state_tx.send_replace(next);
    }

    /// Run cycles until the task is dropped. Call from `tokio::spawn` or
    /// race against a shutdown signal.
    pub async fn run(mut self) {
        info!(
            pairs = ?self.trading.pairs,
            strategy = %self.strategy.name(),
            interval = %self.trading.interval,
            cycle_secs = self.trading.cycle_interval_secs,
            "Polling scheduler started"
        );

        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            let report = self.run_cycle().await;
            info!(
                cycle,
                fetched = report.fetched.len(),
                failed = report.failed.len(),
                actions = report.actions.len(),
                suppressed = report.suppressed.len(),
                "Cycle complete"
            );
            tokio::time::sleep(self.trading.cycle_interval()).await;
        }
    }

    /// One pass over every configured pair, without the trailing sleep.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let pairs = self.trading.pairs.clone();

        for (i, pair) in pairs.iter().enumerate() {
            self.transition(SchedulerState::Fetching(i));
            info!(pair = %pair, "Fetching historical data");

            let series = match self
                .market_data
                .fetch(pair, &self.trading.interval, self.trading.lookback)
                .await
            {
                Ok(series) => series,
                Err(e) => {
                    let cooldown = self.trading.fetch_cooldown();
                    error!(pair = %pair, error = %e, cooldown = ?cooldown, "Fetch failed, skipping pair this cycle");
                    console::say(Tone::Failure, &format!("Error fetching data for {pair}: {e}"));
                    report.failed.push(pair.clone());
                    tokio::time::sleep(cooldown).await;
                    continue;
                }
            };
            info!(pair = %pair, points = series.len(), "Fetched data points");
            report.fetched.push(pair.clone());

            self.transition(SchedulerState::Evaluating(i));
            if series.len() < self.strategy.required_history() {
                debug!(
                    pair = %pair,
                    points = series.len(),
                    required = self.strategy.required_history(),
                    "Not enough history for a signal"
                );
            }
            let evaluation = self.strategy.evaluate(&series);
            debug!(pair = %pair, signal = %evaluation.signal, indicators = %evaluation.snapshot, "Evaluated");

            let previous = if self.trading.suppress_repeated_signals {
                self.last_signals.insert(pair.clone(), evaluation.signal)
            } else {
                None
            };

            let Some(side) = evaluation.signal.side() else {
                continue;
            };

            if previous == Some(evaluation.signal) {
                info!(pair = %pair, signal = %evaluation.signal, "Signal unchanged since last cycle, not acting");
                report.suppressed.push(pair.clone());
                continue;
            }

            self.transition(SchedulerState::Acting(i));
            let outcome = self.act(pair, &evaluation, side).await;
            report.actions.push(Action {
                pair: pair.clone(),
                signal: evaluation.signal,
                outcome,
            });
        }

        self.transition(SchedulerState::Idle);
        report
    }

    async fn act(&self, pair: &str, evaluation: &Evaluation, side: OrderSide) -> OrderOutcome {
        let label = evaluation.signal.to_string();
        info!(pair = %pair, signal = %label, indicators = %evaluation.snapshot, "Signal detected");
        let tone = match side {
            OrderSide::Buy => Tone::Success,
            OrderSide::Sell => Tone::Failure,
        };
        console::say(tone, &format!("{label} signal for {pair}."));

        let subject = format!("{label} Signal");
        let body = format!("{label} signal for {pair}.\n{}", evaluation.snapshot);
        if let Err(e) = self.notifier.notify(&subject, &body).await {
            warn!(pair = %pair, error = %e, "Notification failed, executing anyway");
        }

        let order = OrderRequest::market(pair, side, self.trading.quantity);
        let outcome = self.executor.execute(&order).await;
        if outcome.success {
            info!(pair = %pair, simulated = outcome.simulated, detail = %outcome.detail, "Order handled");
        } else {
            warn!(pair = %pair, detail = %outcome.detail, "Order failed");
        }
        outcome
    }
}
