/// RSI (Relative Strength Index) over `closes` (oldest first).
///
/// Average gain and loss are plain trailing means of the last `window`
/// close-to-close changes, not Wilder smoothing. The result is aligned to
/// the input: index 0 has no change and is always `None`, and index `i` is
/// defined once `i >= window`.
///
/// When the average loss over the window is zero the RSI is exactly 100,
/// including for a perfectly flat window.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() < window + 1 {
        return out;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // changes[j] is the move into closes[j + 1]
    for (j, w) in changes.windows(window).enumerate() {
        let avg_gain = w.iter().map(|&c| c.max(0.0)).sum::<f64>() / window as f64;
        let avg_loss = w.iter().map(|&c| (-c).max(0.0)).sum::<f64>() / window as f64;
        out[j + window] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
