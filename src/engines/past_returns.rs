use tracing::debug;

use crate::engines::SPAN_SCALE;
use crate::error::EngineError;
use crate::types::Tick;
use crate::window::{ensure_ascending, WindowTracker};

/// Returns are reported in tenths of a basis point.
const RETURN_SCALE: f64 = 1e5;

/// Trailing return of each sample versus the oldest sample still within
/// `delta` of it.
///
/// A sample that is alone in its window compares against itself and yields
/// exactly 0.
pub fn past_returns(ticks: &[Tick], delta: i64) -> Result<Vec<f64>, EngineError> {
    if ticks.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    let timestamps: Vec<i64> = ticks.iter().map(|tick| tick.ts).collect();
    ensure_ascending(&timestamps)?;
    debug!(samples = ticks.len(), delta, "past-returns pass");

    let span = delta * SPAN_SCALE;
    let mut tracker = WindowTracker::new();
    let mut out = Vec::with_capacity(ticks.len());
    for (i, tick) in ticks.iter().enumerate() {
        let start = tracker.advance(&timestamps, i, span);
        out.push((tick.value / ticks[start].value - 1.0) * RETURN_SCALE);
    }
    Ok(out)
}
