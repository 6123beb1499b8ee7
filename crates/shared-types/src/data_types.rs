//! Market data types shared across the system

use serde::{Deserialize, Serialize};

/// A single trade tick delivered by the feed collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: String,
    pub price: f64,
    pub volume: f64,
    /// Milliseconds since the epoch.
    pub timestamp: u64,
}

/// One OHLCV bar. `timestamp` is the start of its bucket.
///
/// A candle only ever exists fully initialized: it is constructed from the
/// first tick of its bucket with all four OHLC fields set as a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Start a candle from the first tick of a bucket.
    pub fn from_tick(bucket_start: u64, price: f64, volume: f64) -> Self {
        Self {
            timestamp: bucket_start,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    /// Fold another tick from the same bucket into this candle.
    pub fn apply_tick(&mut self, price: f64, volume: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += volume;
    }
}

/// A chart timeframe with a fixed bucket duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeframe {
    pub duration_ms: u64,
}

impl Timeframe {
    pub const M1: Timeframe = Timeframe::from_minutes(1);
    pub const M5: Timeframe = Timeframe::from_minutes(5);
    pub const M15: Timeframe = Timeframe::from_minutes(15);
    pub const H1: Timeframe = Timeframe::from_minutes(60);

    pub const fn from_millis(duration_ms: u64) -> Self {
        Self { duration_ms }
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self {
            duration_ms: minutes * 60_000,
        }
    }

    /// Start of the bucket containing `timestamp`:
    /// `floor(timestamp / duration) * duration`.
    pub fn bucket_start(&self, timestamp: u64) -> u64 {
        (timestamp / self.duration_ms) * self.duration_ms
    }

    /// Short display label ("1m", "15m", "1h").
    pub fn label(&self) -> String {
        let minutes = self.duration_ms / 60_000;
        if minutes > 0 && minutes % 60 == 0 {
            format!("{}h", minutes / 60)
        } else if minutes > 0 {
            format!("{minutes}m")
        } else {
            format!("{}ms", self.duration_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_from_tick_sets_ohlc_as_group() {
        let candle = Candle::from_tick(60_000, 101.5, 2.0);
        assert_eq!(candle.timestamp, 60_000);
        assert_eq!(candle.open, 101.5);
        assert_eq!(candle.high, 101.5);
        assert_eq!(candle.low, 101.5);
        assert_eq!(candle.close, 101.5);
        assert_eq!(candle.volume, 2.0);
    }

    #[test]
    fn test_candle_apply_tick() {
        let mut candle = Candle::from_tick(0, 100.0, 1.0);
        candle.apply_tick(105.0, 2.0);
        candle.apply_tick(98.0, 0.5);

        assert_eq!(candle.open, 100.0);
        assert_eq!(candle.high, 105.0);
        assert_eq!(candle.low, 98.0);
        assert_eq!(candle.close, 98.0);
        assert_eq!(candle.volume, 3.5);
    }

    #[test]
    fn test_bucket_start() {
        let tf = Timeframe::from_millis(60_000);
        assert_eq!(tf.bucket_start(0), 0);
        assert_eq!(tf.bucket_start(59_999), 0);
        assert_eq!(tf.bucket_start(60_000), 60_000);
        assert_eq!(tf.bucket_start(60_001), 60_000);
    }

    #[test]
    fn test_timeframe_labels() {
        assert_eq!(Timeframe::M1.label(), "1m");
        assert_eq!(Timeframe::M15.label(), "15m");
        assert_eq!(Timeframe::H1.label(), "1h");
        assert_eq!(Timeframe::from_millis(500).label(), "500ms");
    }
}
