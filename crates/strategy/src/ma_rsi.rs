use common::PriceSeries;

use crate::{Evaluation, IndicatorEngine, SignalClassifier, Strategy, StrategyParams};

/// Moving-average crossover confirmed by RSI.
pub struct MaRsiStrategy {
    name: String,
    engine: IndicatorEngine,
    classifier: SignalClassifier,
}

impl MaRsiStrategy {
    pub fn new(params: &StrategyParams) -> Self {
        Self {
            name: format!(
                "MA {}/{} + RSI {}",
                params.short_window, params.long_window, params.rsi_window
            ),
            engine: IndicatorEngine::new(params),
            classifier: SignalClassifier::from_params(params),
        }
    }
}

impl Strategy for MaRsiStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_history(&self) -> usize {
        self.engine.required_history()
    }

    fn evaluate(&self, series: &PriceSeries) -> Evaluation {
        let snapshot = self.engine.snapshot(series);
        Evaluation {
            snapshot,
            signal: self.classifier.classify(&snapshot),
        }
    }
}
