//! Forward-pass engines over tick series.
//!
//! Each engine validates its preconditions once, builds its prefix-sum
//! tables, then emits one output per input sample from a single monotonic
//! pass of the [`crate::window::WindowTracker`].

mod autocorr;
mod past_returns;
mod realized_kernel;

pub use autocorr::autocorrelations;
pub use past_returns::past_returns;
pub use realized_kernel::{parzen_kernel, realized_kernel};

/// Caller-supplied spans are scaled into the series' native tick
/// resolution by this factor.
pub(crate) const SPAN_SCALE: i64 = 1_000_000;
