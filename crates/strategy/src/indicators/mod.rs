pub mod moving_average;
pub mod rsi;

pub use moving_average::moving_average;
pub use rsi::rsi;

/// Most recent value of an index-aligned indicator series.
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}
