//! Single-stream candle aggregation with exact bucket boundary semantics.

use chart_studies_shared::{Candle, ChartStudiesError, ChartStudiesResult, Tick, Timeframe};

/// What `flush` does with a trailing in-progress bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// A candle is only ever completed by a tick in a later bucket;
    /// `flush` keeps the in-progress candle and emits nothing.
    #[default]
    AwaitNextBucket,
    /// `flush` emits the in-progress candle through the callback and
    /// clears it. For ending a session without losing the last bucket.
    OnDemand,
}

/// Callback invoked with each completed candle.
pub type CompletedCandleFn = Box<dyn FnMut(Candle) + Send>;

/// Aggregation state for one (symbol, timeframe) pair.
pub struct CandleAggregator {
    symbol: String,
    timeframe: Timeframe,
    policy: FlushPolicy,
    current: Option<Candle>,
    on_completed: CompletedCandleFn,
}

impl CandleAggregator {
    /// Construction fails fast on a zero-duration timeframe rather than
    /// defaulting silently.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        policy: FlushPolicy,
        on_completed: CompletedCandleFn,
    ) -> ChartStudiesResult<Self> {
        if timeframe.duration_ms == 0 {
            return Err(ChartStudiesError::InvalidTimeframe { duration_ms: 0 });
        }
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            policy,
            current: None,
            on_completed,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Fold one tick into the aggregation state.
    ///
    /// A tick belonging to a different bucket than the current candle
    /// completes the current candle (emitting it through the callback)
    /// before the new one starts; the new candle opens with all OHLC
    /// fields set from the tick as a group.
    pub fn process_tick(&mut self, tick: &Tick) {
        if tick.symbol != self.symbol {
            log::warn!(
                "tick for {} reached aggregator for {}, ignoring",
                tick.symbol,
                self.symbol
            );
            return;
        }
        let bucket_start = self.timeframe.bucket_start(tick.timestamp);
        match self.current.as_mut() {
            Some(candle) if candle.timestamp == bucket_start => {
                candle.apply_tick(tick.price, tick.volume);
            }
            _ => {
                if let Some(completed) = self.current.take() {
                    (self.on_completed)(completed);
                }
                self.current = Some(Candle::from_tick(bucket_start, tick.price, tick.volume));
            }
        }
    }

    /// The in-progress candle. `None` until the bucket has its first tick;
    /// a half-initialized candle is never observable.
    pub fn current_candle(&self) -> Option<&Candle> {
        self.current.as_ref()
    }

    /// Apply the configured trailing-bucket policy. Under
    /// [`FlushPolicy::OnDemand`] the in-progress candle is emitted through
    /// the callback and returned; under [`FlushPolicy::AwaitNextBucket`]
    /// nothing happens.
    pub fn flush(&mut self) -> Option<Candle> {
        match self.policy {
            FlushPolicy::AwaitNextBucket => None,
            FlushPolicy::OnDemand => {
                let completed = self.current.take()?;
                (self.on_completed)(completed);
                Some(completed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn tick(timestamp: u64, price: f64, volume: f64) -> Tick {
        Tick {
            symbol: "BTC-USD".to_string(),
            price,
            volume,
            timestamp,
        }
    }

    fn collector() -> (Arc<Mutex<Vec<Candle>>>, CompletedCandleFn) {
        let completed = Arc::new(Mutex::new(Vec::new()));
        let sink = completed.clone();
        let callback: CompletedCandleFn = Box::new(move |candle| {
            sink.lock().unwrap().push(candle);
        });
        (completed, callback)
    }

    fn aggregator(policy: FlushPolicy) -> (CandleAggregator, Arc<Mutex<Vec<Candle>>>) {
        let (completed, callback) = collector();
        let aggregator = CandleAggregator::new(
            "BTC-USD",
            Timeframe::from_millis(60_000),
            policy,
            callback,
        )
        .unwrap();
        (aggregator, completed)
    }

    #[test]
    fn test_zero_duration_fails_fast() {
        let (_, callback) = collector();
        let result = CandleAggregator::new(
            "BTC-USD",
            Timeframe::from_millis(0),
            FlushPolicy::default(),
            callback,
        );
        assert!(matches!(
            result,
            Err(ChartStudiesError::InvalidTimeframe { duration_ms: 0 })
        ));
    }

    #[test]
    fn test_bucket_completes_only_on_next_bucket_tick() {
        let (mut agg, completed) = aggregator(FlushPolicy::AwaitNextBucket);

        agg.process_tick(&tick(0, 100.0, 1.0));
        agg.process_tick(&tick(30_000, 108.0, 2.0));
        agg.process_tick(&tick(59_999, 95.0, 1.5));
        assert!(completed.lock().unwrap().is_empty());

        // The first tick of the next bucket completes bucket [0, 60000).
        agg.process_tick(&tick(60_001, 97.0, 3.0));
        let done = completed.lock().unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(
            done[0],
            Candle {
                timestamp: 0,
                open: 100.0,
                high: 108.0,
                low: 95.0,
                close: 95.0,
                volume: 4.5,
            }
        );
        drop(done);

        // A fresh in-progress candle begins at bucket 60000.
        let current = agg.current_candle().unwrap();
        assert_eq!(current.timestamp, 60_000);
        assert_eq!(current.open, 97.0);
        assert_eq!(current.volume, 3.0);
    }

    #[test]
    fn test_current_candle_absent_before_first_tick() {
        let (agg, _) = aggregator(FlushPolicy::AwaitNextBucket);
        assert!(agg.current_candle().is_none());
    }

    #[test]
    fn test_await_next_bucket_never_flushes() {
        let (mut agg, completed) = aggregator(FlushPolicy::AwaitNextBucket);
        agg.process_tick(&tick(10_000, 100.0, 1.0));
        assert!(agg.flush().is_none());
        assert!(completed.lock().unwrap().is_empty());
        // The in-progress candle is kept.
        assert!(agg.current_candle().is_some());
    }

    #[test]
    fn test_on_demand_flush_emits_trailing_candle_once() {
        let (mut agg, completed) = aggregator(FlushPolicy::OnDemand);
        agg.process_tick(&tick(10_000, 100.0, 1.0));

        let flushed = agg.flush().unwrap();
        assert_eq!(flushed.timestamp, 0);
        assert_eq!(completed.lock().unwrap().len(), 1);

        assert!(agg.current_candle().is_none());
        assert!(agg.flush().is_none());
        assert_eq!(completed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_foreign_symbol_tick_ignored() {
        let (mut agg, completed) = aggregator(FlushPolicy::AwaitNextBucket);
        agg.process_tick(&Tick {
            symbol: "ETH-USD".to_string(),
            price: 3000.0,
            volume: 1.0,
            timestamp: 0,
        });
        assert!(agg.current_candle().is_none());
        assert!(completed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_out_of_order_bucket_still_rolls_over() {
        // The boundary check is "differs", not "greater": a late tick from
        // an earlier bucket completes the current candle too.
        let (mut agg, completed) = aggregator(FlushPolicy::AwaitNextBucket);
        agg.process_tick(&tick(120_000, 100.0, 1.0));
        agg.process_tick(&tick(30_000, 90.0, 1.0));
        assert_eq!(completed.lock().unwrap().len(), 1);
        assert_eq!(agg.current_candle().unwrap().timestamp, 0);
    }
}
