use crate::error::EngineError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single timestamped scalar observation (price or price-like value).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tick {
    /// Event time in the series' native integer resolution.
    pub ts: i64,
    pub value: f64,
}

impl Tick {
    #[inline]
    pub const fn new(ts: i64, value: f64) -> Self {
        Self { ts, value }
    }
}

/// Stacked order-book snapshot (top-N levels).
///
/// Ask levels ascend in price from best ask at index 0; bid levels descend
/// from best bid at index 0. Amounts are non-negative.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub ts: i64,
    pub ask_prices: Vec<f64>,
    pub ask_amounts: Vec<f64>,
    pub bid_prices: Vec<f64>,
    pub bid_amounts: Vec<f64>,
}

impl OrderBookSnapshot {
    /// Parses the flat wire row `[ts, ask_price, ask_amount, bid_price,
    /// bid_amount, ...]` — four interleaved values per level after the
    /// timestamp.
    pub fn from_flat_row(row: &[f64]) -> Result<Self, EngineError> {
        if row.len() < 5 || (row.len() - 1) % 4 != 0 {
            return Err(EngineError::MalformedBookRow { len: row.len() });
        }
        let levels = (row.len() - 1) / 4;
        let mut snapshot = Self {
            ts: row[0] as i64,
            ask_prices: Vec::with_capacity(levels),
            ask_amounts: Vec::with_capacity(levels),
            bid_prices: Vec::with_capacity(levels),
            bid_amounts: Vec::with_capacity(levels),
        };
        for level in row[1..].chunks_exact(4) {
            snapshot.ask_prices.push(level[0]);
            snapshot.ask_amounts.push(level[1]);
            snapshot.bid_prices.push(level[2]);
            snapshot.bid_amounts.push(level[3]);
        }
        Ok(snapshot)
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.ask_prices.len()
    }
}

/// Signed imbalance pair produced by the order-book calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Imbalance {
    pub ask: f64,
    pub bid: f64,
}

/// Imbalance tagged with its snapshot timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImbalanceRow {
    pub ts: i64,
    pub ask: f64,
    pub bid: f64,
}
