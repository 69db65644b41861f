use tracing::debug;

use crate::engines::SPAN_SCALE;
use crate::error::EngineError;
use crate::series::PrefixSum;
use crate::types::Tick;
use crate::window::{ensure_ascending, WindowTracker};

const VAR_NUM_EPS: f64 = 1e-12;

/// Windowed lag-autocorrelation matrix: one row per requested lag, one
/// column per input sample.
///
/// For sample `i` with window start `s` and lag `L`, the statistic is the
/// ratio of windowed lagged-covariance to windowed variance over the
/// `n = i - s + 1 - L` samples of the lagged range `s + L ..= i`. With
/// `n <= 1` or `s == 0` there is not enough history and the output is 0 —
/// a cold-start policy, not an error.
pub fn autocorrelations(
    ticks: &[Tick],
    lags: &[usize],
    time_window: i64,
) -> Result<Vec<Vec<f64>>, EngineError> {
    if ticks.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    let timestamps: Vec<i64> = ticks.iter().map(|tick| tick.ts).collect();
    ensure_ascending(&timestamps)?;
    debug!(
        samples = ticks.len(),
        lags = lags.len(),
        time_window,
        "autocorrelation pass"
    );

    let prices: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
    let lag_products: Vec<PrefixSum> = lags
        .iter()
        .map(|&lag| PrefixSum::lagged_products(&prices, lag))
        .collect();
    let squares: Vec<f64> = prices.iter().map(|price| price * price).collect();
    let cum_prices = PrefixSum::new(&prices);
    let cum_squares = PrefixSum::new(&squares);

    let span = time_window * SPAN_SCALE;
    let mut tracker = WindowTracker::new();
    let mut out = vec![vec![0.0_f64; ticks.len()]; lags.len()];
    for i in 0..ticks.len() {
        let start = tracker.advance(&timestamps, i, span);
        for (row, (&lag, products)) in lags.iter().zip(&lag_products).enumerate() {
            let pairs = (i + 1).saturating_sub(start + lag);
            if pairs <= 1 || start == 0 {
                continue;
            }
            let n = pairs as f64;
            // The lag-L product series carries L zero-filled leading
            // entries, so its window starts L entries after `start`.
            let lo = start + lag;
            let sum_xy = products.range(lo, i);
            let sum_x = cum_prices.range(lo, i);
            let sum_x2 = cum_squares.range(lo, i);
            let cov_num = sum_xy - sum_x * sum_x / n;
            let var_num = sum_x2 - sum_x * sum_x / n;
            out[row][i] = if var_num <= VAR_NUM_EPS {
                0.0
            } else {
                cov_num / var_num
            };
        }
    }
    Ok(out)
}
