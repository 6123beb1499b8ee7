//! Registry of aggregators keyed by (symbol, timeframe).

use std::collections::HashMap;

use chart_studies_shared::{Candle, Tick, Timeframe};

use crate::aggregator::CandleAggregator;

/// Owns one [`CandleAggregator`] per (symbol, timeframe) pair and routes
/// incoming ticks by symbol.
#[derive(Default)]
pub struct AggregatorBank {
    aggregators: HashMap<(String, Timeframe), CandleAggregator>,
}

impl AggregatorBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an aggregator under its (symbol, timeframe) key, replacing
    /// any previous one.
    pub fn register(&mut self, aggregator: CandleAggregator) {
        let key = (aggregator.symbol().to_string(), aggregator.timeframe());
        self.aggregators.insert(key, aggregator);
    }

    /// Route a tick to every timeframe registered for its symbol.
    pub fn process_tick(&mut self, tick: &Tick) {
        for ((symbol, _), aggregator) in self.aggregators.iter_mut() {
            if symbol == &tick.symbol {
                aggregator.process_tick(tick);
            }
        }
    }

    pub fn current(&self, symbol: &str, timeframe: Timeframe) -> Option<&Candle> {
        self.aggregators
            .get(&(symbol.to_string(), timeframe))
            .and_then(|a| a.current_candle())
    }

    /// Flush every aggregator, collecting whatever their policies emit.
    pub fn flush_all(&mut self) -> Vec<Candle> {
        self.aggregators
            .values_mut()
            .filter_map(|a| a.flush())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.aggregators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chart_studies_shared::ChartStudiesResult;

    use super::*;
    use crate::aggregator::FlushPolicy;

    fn quiet(symbol: &str, timeframe: Timeframe, policy: FlushPolicy) -> ChartStudiesResult<CandleAggregator> {
        CandleAggregator::new(symbol, timeframe, policy, Box::new(|_| {}))
    }

    fn tick(symbol: &str, timestamp: u64, price: f64) -> Tick {
        Tick {
            symbol: symbol.to_string(),
            price,
            volume: 1.0,
            timestamp,
        }
    }

    #[test]
    fn test_ticks_routed_by_symbol() {
        let mut bank = AggregatorBank::new();
        bank.register(quiet("BTC-USD", Timeframe::M1, FlushPolicy::AwaitNextBucket).unwrap());
        bank.register(quiet("ETH-USD", Timeframe::M1, FlushPolicy::AwaitNextBucket).unwrap());

        bank.process_tick(&tick("BTC-USD", 1_000, 100.0));
        assert!(bank.current("BTC-USD", Timeframe::M1).is_some());
        assert!(bank.current("ETH-USD", Timeframe::M1).is_none());
    }

    #[test]
    fn test_one_symbol_feeds_every_registered_timeframe() {
        let mut bank = AggregatorBank::new();
        bank.register(quiet("BTC-USD", Timeframe::M1, FlushPolicy::AwaitNextBucket).unwrap());
        bank.register(quiet("BTC-USD", Timeframe::M5, FlushPolicy::AwaitNextBucket).unwrap());

        bank.process_tick(&tick("BTC-USD", 61_000, 100.0));
        assert_eq!(bank.current("BTC-USD", Timeframe::M1).unwrap().timestamp, 60_000);
        assert_eq!(bank.current("BTC-USD", Timeframe::M5).unwrap().timestamp, 0);
    }

    #[test]
    fn test_flush_all_respects_policies() {
        let mut bank = AggregatorBank::new();
        bank.register(quiet("BTC-USD", Timeframe::M1, FlushPolicy::OnDemand).unwrap());
        bank.register(quiet("BTC-USD", Timeframe::M5, FlushPolicy::AwaitNextBucket).unwrap());

        bank.process_tick(&tick("BTC-USD", 1_000, 100.0));
        let flushed = bank.flush_all();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].timestamp, 0);
    }
}
