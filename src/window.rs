//! Monotonic two-pointer window tracking under non-decreasing timestamps.

use crate::error::EngineError;

/// Advance-only lower-bound index over a trailing time span.
///
/// One tracker serves exactly one forward pass: the pointer is never reset
/// and only moves forward, so the total advance work across a pass is O(n)
/// and each call is amortized O(1). Every rolling engine in this crate
/// depends on that property.
#[derive(Debug, Clone, Default)]
pub struct WindowTracker {
    start: usize,
}

impl WindowTracker {
    #[inline]
    pub fn new() -> Self {
        Self { start: 0 }
    }

    /// Index of the oldest sample within `span` of `ts[idx]`.
    ///
    /// Caller contract: `idx < ts.len()`, `ts` non-decreasing (see
    /// [`ensure_ascending`]), and `idx` visited in forward order. The
    /// tracker signals no "not enough history" condition itself; that
    /// policy belongs to the engines.
    #[inline]
    pub fn advance(&mut self, ts: &[i64], idx: usize, span: i64) -> usize {
        debug_assert!(idx < ts.len(), "idx out of bounds: {idx} >= {}", ts.len());
        debug_assert!(self.start <= idx, "tracker reused past its pass");
        while ts[idx] - ts[self.start] > span {
            self.start += 1;
        }
        self.start
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }
}

/// Validates the non-decreasing timestamp invariant at engine entry.
pub fn ensure_ascending(ts: &[i64]) -> Result<(), EngineError> {
    for (index, pair) in ts.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(EngineError::NonMonotonicTimestamps {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_ascending, WindowTracker};
    use crate::error::EngineError;

    #[test]
    fn tracker_keeps_window_invariants() {
        let ts = [0_i64, 3, 5, 9, 14, 14, 20];
        let span = 6;
        let mut tracker = WindowTracker::new();
        let mut previous_start = 0;
        for idx in 0..ts.len() {
            let start = tracker.advance(&ts, idx, span);
            assert!(start >= previous_start, "pointer must never retreat");
            assert!(ts[idx] - ts[start] <= span);
            if start > 0 {
                assert!(ts[idx] - ts[start - 1] > span);
            }
            previous_start = start;
        }
    }

    #[test]
    fn tracker_holds_duplicates_in_window() {
        let ts = [10_i64, 10, 10];
        let mut tracker = WindowTracker::new();
        for idx in 0..ts.len() {
            assert_eq!(tracker.advance(&ts, idx, 0), 0);
        }
    }

    #[test]
    fn ascending_check_reports_first_violation() {
        assert!(ensure_ascending(&[1, 2, 2, 3]).is_ok());
        assert!(ensure_ascending(&[]).is_ok());

        let err = ensure_ascending(&[1, 5, 4, 9]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NonMonotonicTimestamps {
                index: 2,
                previous: 5,
                current: 4,
            }
        ));
    }
}
