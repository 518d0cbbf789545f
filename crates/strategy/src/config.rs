use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use common::{Error, Result};

/// Kline intervals accepted by the Binance futures API.
pub const BINANCE_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

/// Largest `lookback` the futures klines endpoint can serve. The fetch asks
/// for one extra row and Binance caps `limit` at 1500.
pub const MAX_LOOKBACK: usize = 1499;

/// Bot configuration file (TOML). Every key is optional.
///
/// Example `config/bot.toml`:
/// ```toml
/// [trading]
/// pairs = ["BTCUSDT", "ETHUSDT"]
/// quantity = 0.001
/// interval = "1m"
/// lookback = 100
/// cycle_interval_secs = 60
/// fetch_cooldown_secs = 60
///
/// [strategy]
/// short_window = 5
/// long_window = 20
/// rsi_window = 14
/// overbought = 70.0
/// oversold = 30.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BotFileConfig {
    pub trading: TradingConfig,
    pub strategy: StrategyParams,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Pairs evaluated each cycle, in this order.
    pub pairs: Vec<String>,
    /// Order quantity in base asset units.
    pub quantity: f64,
    /// Kline interval, e.g. "1m".
    pub interval: String,
    /// Number of closed candles requested per fetch.
    pub lookback: usize,
    /// Sleep between cycles.
    pub cycle_interval_secs: u64,
    /// Pause after a failed fetch before moving to the next pair.
    pub fetch_cooldown_secs: u64,
    /// Skip notify/execute when a pair's signal repeats the previous cycle's.
    pub suppress_repeated_signals: bool,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            pairs: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            quantity: 0.001,
            interval: "1m".to_string(),
            lookback: 100,
            cycle_interval_secs: 60,
            fetch_cooldown_secs: 60,
            suppress_repeated_signals: false,
        }
    }
}

impl TradingConfig {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    pub fn fetch_cooldown(&self) -> Duration {
        Duration::from_secs(self.fetch_cooldown_secs)
    }
}

/// Indicator windows and RSI thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StrategyParams {
    pub short_window: usize,
    pub long_window: usize,
    pub rsi_window: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
            rsi_window: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl BotFileConfig {
    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Ok(cfg)
    }

    /// Load `path` if it exists, otherwise fall back to defaults. Used for
    /// the default location, where a missing file is not an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "Bot config file not found, using defaults");
            let cfg = Self::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.trading;
        let s = &self.strategy;

        if t.pairs.is_empty() {
            return Err(Error::Config("trading.pairs must not be empty".into()));
        }
        if t.pairs.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::Config("trading.pairs contains an empty symbol".into()));
        }
        if !(t.quantity > 0.0 && t.quantity.is_finite()) {
            return Err(Error::Config(format!(
                "trading.quantity must be positive, got {}",
                t.quantity
            )));
        }
        if !BINANCE_INTERVALS.contains(&t.interval.as_str()) {
            return Err(Error::Config(format!(
                "trading.interval '{}' is not a Binance kline interval",
                t.interval
            )));
        }
        if t.lookback == 0 || t.lookback > MAX_LOOKBACK {
            return Err(Error::Config(format!(
                "trading.lookback must be between 1 and {MAX_LOOKBACK}, got {}",
                t.lookback
            )));
        }
        if t.cycle_interval_secs == 0 {
            return Err(Error::Config("trading.cycle_interval_secs must be at least 1".into()));
        }
        if s.short_window == 0 || s.long_window == 0 || s.rsi_window == 0 {
            return Err(Error::Config("strategy windows must be at least 1".into()));
        }
        if s.short_window >= s.long_window {
            return Err(Error::Config(format!(
                "strategy.short_window ({}) must be less than long_window ({})",
                s.short_window, s.long_window
            )));
        }
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(s.oversold) || !in_range(s.overbought) || s.oversold >= s.overbought {
            return Err(Error::Config(format!(
                "strategy thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                s.oversold, s.overbought
            )));
        }
        Ok(())
    }
}
