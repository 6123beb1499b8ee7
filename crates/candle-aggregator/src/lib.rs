//! Tick-to-candle aggregation
//!
//! Buckets an in-order tick stream into fixed-duration OHLCV candles. One
//! aggregator instance serves one (symbol, timeframe) pair; the
//! [`AggregatorBank`] routes ticks across pairs. A candle is completed only
//! by the arrival of a tick in a different bucket — there is no timer-based
//! flush, and the trailing-bucket policy is explicit via [`FlushPolicy`].

pub mod aggregator;
pub mod bank;

pub use aggregator::{CandleAggregator, CompletedCandleFn, FlushPolicy};
pub use bank::AggregatorBank;

pub use chart_studies_shared as shared;
