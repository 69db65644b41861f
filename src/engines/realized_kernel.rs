use tracing::debug;

use crate::engines::SPAN_SCALE;
use crate::error::EngineError;
use crate::progress::ProgressSink;
use crate::series::PrefixSum;
use crate::types::Tick;
use crate::window::{ensure_ascending, WindowTracker};

/// Parzen kernel over normalized lag distance.
///
/// Both branch formulas agree at `x = 0.5` (value 0.25), so the taper is
/// continuous across the break.
#[inline]
pub fn parzen_kernel(x: f64) -> f64 {
    let x = x.abs();
    if x >= 1.0 {
        0.0
    } else if x >= 0.5 {
        2.0 * (1.0 - x).powi(3)
    } else {
        1.0 - 6.0 * x * x * (1.0 - x)
    }
}

/// Parzen weights for lags `1..=h`, evaluated once per pass.
fn kernel_weights(h: usize) -> Vec<f64> {
    (1..=h)
        .map(|k| parzen_kernel(k as f64 / h as f64))
        .collect()
}

/// Kernel-weighted windowed autocovariance sum per sample.
///
/// `h` is the realized-kernel bandwidth; the per-sample lag reach is capped
/// at the window length, so early windows use fewer lags than `h`. Samples
/// whose window still touches index 0 output 0 (cold start). The progress
/// sink is notified once per processed sample, cold starts included.
pub fn realized_kernel(
    ticks: &[Tick],
    h: usize,
    time_window: i64,
    progress: &mut dyn ProgressSink,
) -> Result<Vec<f64>, EngineError> {
    if h == 0 {
        return Err(EngineError::InvalidBandwidth);
    }
    if ticks.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    let timestamps: Vec<i64> = ticks.iter().map(|tick| tick.ts).collect();
    ensure_ascending(&timestamps)?;
    debug!(
        samples = ticks.len(),
        bandwidth = h,
        time_window,
        "realized-kernel pass"
    );

    let prices: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
    let lag_products: Vec<PrefixSum> = (0..=h)
        .map(|lag| PrefixSum::lagged_products(&prices, lag))
        .collect();
    let weights = kernel_weights(h);

    let span = time_window * SPAN_SCALE;
    let mut tracker = WindowTracker::new();
    let mut out = Vec::with_capacity(ticks.len());
    for i in 0..ticks.len() {
        let start = tracker.advance(&timestamps, i, span);
        if start == 0 {
            out.push(0.0);
        } else {
            // The window may still be shorter than the bandwidth.
            let kernel_range = (i + 1 - start).min(h);
            let mut res = lag_products[0].range(start, i);
            for j in 1..=kernel_range {
                // The lag-j product series is offset by j zero-filled
                // entries, hence the shifted range start.
                res += 2.0 * weights[j - 1] * lag_products[j].range(start + j, i);
            }
            out.push(res);
        }
        progress.advance(1);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{parzen_kernel, realized_kernel};
    use crate::error::EngineError;
    use crate::progress::{CountingProgress, NullProgress};
    use crate::types::Tick;

    const TOL: f64 = 1e-12;

    #[test]
    fn parzen_kernel_properties() {
        assert_eq!(parzen_kernel(0.0), 1.0);
        assert_eq!(parzen_kernel(1.0), 0.0);
        assert_eq!(parzen_kernel(-1.5), 0.0);
        // Branch agreement at the 0.5 break.
        let inner = 1.0 - 6.0 * 0.25 * 0.5;
        let outer = 2.0 * 0.5_f64.powi(3);
        assert!((inner - outer).abs() < TOL);
        assert!((parzen_kernel(0.5) - 0.25).abs() < TOL);
        assert!((parzen_kernel(-0.5) - 0.25).abs() < TOL);
    }

    #[test]
    fn zero_bandwidth_is_rejected() {
        let ticks = vec![Tick::new(0, 1.0)];
        let mut sink = NullProgress;
        assert!(matches!(
            realized_kernel(&ticks, 0, 1, &mut sink),
            Err(EngineError::InvalidBandwidth)
        ));
    }

    #[test]
    fn cold_start_outputs_zero_and_still_notifies() {
        // The whole series fits in one window, so start stays 0 throughout.
        let ticks: Vec<Tick> = (0..5).map(|i| Tick::new(i, 100.0)).collect();
        let mut progress = CountingProgress::new();
        let out = realized_kernel(&ticks, 2, 1, &mut progress).expect("valid series");
        assert!(out.iter().all(|v| *v == 0.0));
        assert_eq!(progress.count(), 5);
    }

    #[test]
    fn constant_series_accumulates_squared_price() {
        // span 1_000_000 over 1_000_000-spaced stamps: window = {i-1, i},
        // so from i = 2 on, start = i - 1 > 0.
        let p = 3.0;
        let ticks: Vec<Tick> = (0..6)
            .map(|i| Tick::new(i as i64 * 1_000_000, p))
            .collect();
        let mut sink = NullProgress;
        let out = realized_kernel(&ticks, 1, 1, &mut sink).expect("valid series");

        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.0);
        for &value in &out[2..] {
            // lag-0 term: two p^2 products; lag-1 term: one p^2 product
            // doubled and weighted by parzen(1) = 0.
            assert!((value - 2.0 * p * p).abs() < TOL);
        }
    }

    #[test]
    fn kernel_range_is_capped_by_window_length() {
        // Bandwidth 3 against a two-sample window: the lag reach is capped
        // at 2, and the lag-2 range is empty, so only lag 1 contributes.
        let ticks: Vec<Tick> = (0..4)
            .map(|i| Tick::new(i as i64 * 1_000_000, 2.0))
            .collect();
        let mut sink = NullProgress;
        let out = realized_kernel(&ticks, 3, 1, &mut sink).expect("valid series");
        // Window {i-1, i}: lag0 gives 2 * 4.0; lag1 gives 2 * w1 * 4.0 with
        // w1 = parzen(1/3).
        let w1 = parzen_kernel(1.0 / 3.0);
        let expected = 8.0 + 2.0 * w1 * 4.0;
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.0);
        assert!((out[2] - expected).abs() < TOL);
        assert!((out[3] - expected).abs() < TOL);
    }
}
