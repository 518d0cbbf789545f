/// Simple moving average over `closes` (oldest first).
///
/// The result is aligned to the input: index `i` holds the mean of the
/// `window` closes ending at `i`, and indices before `window - 1` are `None`.
/// A zero window yields no defined values.
pub fn moving_average(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return out;
    }

    // Sum each window directly rather than keeping a running total, so a
    // long series cannot accumulate rounding drift.
    for (i, w) in closes.windows(window).enumerate() {
        out[i + window - 1] = Some(w.iter().sum::<f64>() / window as f64);
    }
    out
}
