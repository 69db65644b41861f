//! Stateless order-book imbalance calculator.
//!
//! One snapshot in, one signed imbalance pair out: no loop-carried window
//! state, unlike the engines in [`crate::engines`].

use tracing::debug;

use crate::error::{BookSide, EngineError};
use crate::progress::ProgressSink;
use crate::types::{Imbalance, ImbalanceRow, OrderBookSnapshot};

/// Price band around the best level inside which an amount stays eligible
/// for the reference-size median. Asks are capped from above, bids from
/// below; the asymmetry is intentional.
const ELIGIBLE_BAND: f64 = 0.05;
/// Residual size treated as fully consumed when walking the book.
const SIZE_EPS: f64 = 1e-8;
/// Imbalances are reported in tenths of a basis point.
const IMBALANCE_SCALE: f64 = 1e5;

/// Computes the signed ask/bid imbalance pair for one snapshot.
///
/// The reference trade size is the mean of the discrete medians of the
/// eligible amounts on each side; both books are then walked from the best
/// level until that size is consumed, and the volume-weighted fill price is
/// compared against the best price.
pub fn book_imbalance(snapshot: &OrderBookSnapshot) -> Result<Imbalance, EngineError> {
    if snapshot.ask_prices.is_empty() || snapshot.ask_amounts.is_empty() {
        return Err(EngineError::EmptyBookSide {
            side: BookSide::Ask,
        });
    }
    if snapshot.bid_prices.is_empty() || snapshot.bid_amounts.is_empty() {
        return Err(EngineError::EmptyBookSide {
            side: BookSide::Bid,
        });
    }

    let best_ask = snapshot.ask_prices[0];
    let best_bid = snapshot.bid_prices[0];

    let ask_median = eligible_median(
        &snapshot.ask_prices,
        &snapshot.ask_amounts,
        |price| price < best_ask * (1.0 + ELIGIBLE_BAND),
        BookSide::Ask,
    )?;
    let bid_median = eligible_median(
        &snapshot.bid_prices,
        &snapshot.bid_amounts,
        |price| price > best_bid * (1.0 - ELIGIBLE_BAND),
        BookSide::Bid,
    )?;

    let median = (ask_median + bid_median) / 2.0;
    if median <= 0.0 {
        return Err(EngineError::NonPositiveMedian { median });
    }

    let ask_money = walk_book(&snapshot.ask_prices, &snapshot.ask_amounts, median);
    let bid_money = walk_book(&snapshot.bid_prices, &snapshot.bid_amounts, median);

    let ask = ((ask_money / median) / best_ask - 1.0) * IMBALANCE_SCALE;
    let bid = (best_bid / (bid_money / median) - 1.0) * IMBALANCE_SCALE;
    Ok(Imbalance { ask, bid })
}

/// Per-snapshot sweep over an in-memory dataset, one progress notification
/// per processed row.
pub fn imbalance_series(
    snapshots: &[OrderBookSnapshot],
    progress: &mut dyn ProgressSink,
) -> Result<Vec<ImbalanceRow>, EngineError> {
    debug!(rows = snapshots.len(), "book imbalance sweep");
    let mut rows = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let imbalance = book_imbalance(snapshot)?;
        rows.push(ImbalanceRow {
            ts: snapshot.ts,
            ask: imbalance.ask,
            bid: imbalance.bid,
        });
        progress.advance(1);
    }
    Ok(rows)
}

/// Discrete median of the amounts at eligible price levels: sorted copy,
/// average of the two middle elements for even length, no interpolation.
fn eligible_median(
    prices: &[f64],
    amounts: &[f64],
    eligible: impl Fn(f64) -> bool,
    side: BookSide,
) -> Result<f64, EngineError> {
    let mut picked: Vec<f64> = prices
        .iter()
        .zip(amounts)
        .filter(|(price, _)| eligible(**price))
        .map(|(_, amount)| *amount)
        .collect();
    if picked.is_empty() {
        return Err(EngineError::NoEligibleLevels { side });
    }
    picked.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = picked.len() / 2;
    if picked.len() % 2 == 1 {
        Ok(picked[mid])
    } else {
        Ok((picked[mid] + picked[mid - 1]) / 2.0)
    }
}

/// Consumes `size` from the best level forward, returning the money spent.
///
/// Termination is tolerance-based: floating-point residue below `SIZE_EPS`
/// counts as fully consumed.
fn walk_book(prices: &[f64], amounts: &[f64], size: f64) -> f64 {
    let mut remaining = size;
    let mut money = 0.0_f64;
    for (&price, &amount) in prices.iter().zip(amounts) {
        if remaining.abs() <= SIZE_EPS {
            break;
        }
        if amount < remaining {
            remaining -= amount;
            money += price * amount;
        } else {
            money += price * remaining;
            remaining = 0.0;
        }
    }
    money
}
