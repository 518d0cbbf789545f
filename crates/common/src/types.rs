use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// One closed candle reduced to what the indicators consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub open_time: DateTime<Utc>,
    pub close: f64,
}

/// Closing prices for one pair, oldest first, no duplicate timestamps.
///
/// Produced fresh by every fetch and owned by the cycle that asked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub pair: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, sorting by `open_time`. When two points share a
    /// timestamp the later one in the input wins.
    pub fn new(pair: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        // Stable sort keeps input order among equal timestamps.
        points.sort_by_key(|p| p.open_time);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.open_time == point.open_time => *last = point,
                _ => deduped.push(point),
            }
        }
        Self {
            pair: pair.into(),
            points: deduped,
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Most recent value of each indicator series. `None` means the series had
/// too little history for that window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn is_complete(&self) -> bool {
        self.short_ma.is_some() && self.long_ma.is_some() && self.rsi.is_some()
    }
}

impl std::fmt::Display for IndicatorSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn value(v: Option<f64>) -> String {
            v.map(|v| format!("{v:.4}")).unwrap_or_else(|| "n/a".to_string())
        }
        write!(
            f,
            "short MA {}, long MA {}, RSI {}",
            value(self.short_ma),
            value(self.long_ma),
            value(self.rsi)
        )
    }
}

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Classification of the current market state for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl Signal {
    pub fn side(&self) -> Option<OrderSide> {
        match self {
            Signal::Buy => Some(OrderSide::Buy),
            Signal::Sell => Some(OrderSide::Sell),
            Signal::None => None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.side().is_some()
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
            Signal::None => write!(f, "None"),
        }
    }
}

/// A market order to be executed. Quantity comes from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Client-side order ID, sent to the exchange as `newClientOrderId`.
    pub id: String,
    pub pair: String,
    pub side: OrderSide,
    pub quantity: f64,
}

impl OrderRequest {
    pub fn market(pair: impl Into<String>, side: OrderSide, quantity: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            pair: pair.into(),
            side,
            quantity,
        }
    }
}

/// Acknowledgement returned by the exchange for a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: i64,
    pub client_order_id: String,
    pub pair: String,
    pub side: OrderSide,
    pub status: String,
    pub executed_qty: f64,
    /// Zero until the exchange reports a fill.
    pub avg_price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Result of attempting an `OrderRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOutcome {
    pub simulated: bool,
    pub success: bool,
    pub detail: String,
}

impl OrderOutcome {
    pub fn simulated(detail: impl Into<String>) -> Self {
        Self {
            simulated: true,
            success: true,
            detail: detail.into(),
        }
    }

    pub fn filled(detail: impl Into<String>) -> Self {
        Self {
            simulated: false,
            success: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            simulated: false,
            success: false,
            detail: detail.into(),
        }
    }
}

/// Whether orders are really submitted or only simulated.
/// Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    Simulate,
    Live,
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatingMode::Simulate => write!(f, "simulate"),
            OperatingMode::Live => write!(f, "live"),
        }
    }
}

impl FromStr for OperatingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simulate" | "paper" | "test" => Ok(OperatingMode::Simulate),
            "live" => Ok(OperatingMode::Live),
            other => Err(Error::Config(format!(
                "TRADING_MODE must be 'simulate' or 'live', got: '{other}'"
            ))),
        }
    }
}
