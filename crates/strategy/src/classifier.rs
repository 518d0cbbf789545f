use common::{IndicatorSnapshot, Signal};

use crate::config::StrategyParams;

/// Turns a snapshot into a signal using MA ordering plus RSI thresholds.
///
/// - `Buy`: short MA above long MA and RSI below `oversold`
/// - `Sell`: short MA below long MA and RSI above `overbought`
/// - `None`: anything else, including any undefined indicator
///
/// Buy is checked first, so it wins if both ever held.
#[derive(Debug, Clone, Copy)]
pub struct SignalClassifier {
    pub oversold: f64,
    pub overbought: f64,
}

impl SignalClassifier {
    pub fn new(oversold: f64, overbought: f64) -> Self {
        Self { oversold, overbought }
    }

    pub fn from_params(params: &StrategyParams) -> Self {
        Self::new(params.oversold, params.overbought)
    }

    pub fn classify(&self, snapshot: &IndicatorSnapshot) -> Signal {
        let (Some(short), Some(long), Some(rsi)) =
            (snapshot.short_ma, snapshot.long_ma, snapshot.rsi)
        else {
            return Signal::None;
        };

        if short > long && rsi < self.oversold {
            Signal::Buy
        } else if short < long && rsi > self.overbought {
            Signal::Sell
        } else {
            Signal::None
        }
    }
}
