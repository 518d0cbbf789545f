use common::{IndicatorSnapshot, PriceSeries};

use crate::config::StrategyParams;
use crate::indicators::{latest, moving_average, rsi};

/// Derives an `IndicatorSnapshot` from a price series. Stateless: the same
/// series always yields the same snapshot.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    short_window: usize,
    long_window: usize,
    rsi_window: usize,
}

impl IndicatorEngine {
    pub fn new(params: &StrategyParams) -> Self {
        Self {
            short_window: params.short_window,
            long_window: params.long_window,
            rsi_window: params.rsi_window,
        }
    }

    /// Number of closes needed before every snapshot field is defined.
    pub fn required_history(&self) -> usize {
        self.short_window
            .max(self.long_window)
            .max(self.rsi_window + 1)
    }

    pub fn snapshot(&self, series: &PriceSeries) -> IndicatorSnapshot {
        let closes = series.closes();
        IndicatorSnapshot {
            short_ma: latest(&moving_average(&closes, self.short_window)),
            long_ma: latest(&moving_average(&closes, self.long_window)),
            rsi: latest(&rsi(&closes, self.rsi_window)),
        }
    }
}
