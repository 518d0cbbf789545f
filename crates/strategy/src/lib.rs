pub mod classifier;
pub mod config;
pub mod indicators;
pub mod ma_rsi;
pub mod snapshot;

pub use classifier::SignalClassifier;
pub use config::{BotFileConfig, StrategyParams, TradingConfig, MAX_LOOKBACK};
pub use ma_rsi::MaRsiStrategy;
pub use snapshot::IndicatorEngine;

use common::{IndicatorSnapshot, PriceSeries, Signal};

/// What a strategy concluded about one price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub snapshot: IndicatorSnapshot,
    pub signal: Signal,
}

/// All strategy implementations must satisfy this trait.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// Closes needed before the strategy can emit anything but `Signal::None`.
    fn required_history(&self) -> usize;

    /// Classify the latest state of `series`. Must be pure: no memory of
    /// earlier calls.
    fn evaluate(&self, series: &PriceSeries) -> Evaluation;
}
