use std::fmt;

use thiserror::Error;

/// Order-book side named in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    Ask,
    Bid,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ask => f.write_str("ask"),
            Self::Bid => f.write_str("bid"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("series timestamps must be non-decreasing: index={index}, previous={previous}, current={current}")]
    NonMonotonicTimestamps {
        index: usize,
        previous: i64,
        current: i64,
    },
    #[error("windowed engine requires a non-empty series")]
    EmptySeries,
    #[error("order book has no {side} levels")]
    EmptyBookSide { side: BookSide },
    #[error("no {side} levels within the eligible price band")]
    NoEligibleLevels { side: BookSide },
    #[error("reference trade size must be positive, got {median}")]
    NonPositiveMedian { median: f64 },
    #[error("flat book row length must be 1 + 4 * levels, got {len}")]
    MalformedBookRow { len: usize },
    #[error("realized-kernel bandwidth must be >= 1")]
    InvalidBandwidth,
}
