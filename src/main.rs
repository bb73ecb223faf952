//! Rate DAG - demo binary
//!
//! Builds a small graph over an in-memory feed and a stateful rate oracle,
//! evaluates it, and walks the oracle through a throttled update.

use std::sync::Arc;

use rate_dag::clock::{Clock, ManualClock};
use rate_dag::error::SourceFailure;
use rate_dag::logger::init_logger;
use rate_dag::oracles::{AccumulatingRateOracle, Measurement, MeasurementSource, RateOracleFeed};
use rate_dag::processors::combinators::{Passthrough, Reduce, ReduceOp};
use rate_dag::processors::MemoryFeed;
use rate_dag::types::{FeedId, NodeDefinition, ProcessorId};
use rate_dag::{OracleConfig, OracleManager, ProcessorTable};
use rust_decimal::Decimal;

/// Reward accumulator that grows a fixed amount per hour.
struct LinearRewards {
    clock: Arc<ManualClock>,
    per_hour: Decimal,
}

impl MeasurementSource for LinearRewards {
    fn measure(&self) -> Result<Measurement, SourceFailure> {
        let hours = Decimal::from(self.clock.now()) / Decimal::from(3_600u64);
        Ok(Measurement::new(hours * self.per_hour, Decimal::ONE))
    }
}

fn main() -> Result<(), rate_dag::Error> {
    init_logger("rate-dag");

    let config = OracleConfig::from_env();
    let clock = Arc::new(ManualClock::new(0));

    let eth_usd = FeedId::from_label("ETH/USD");
    let yield_index = FeedId::from_label("vault/index");
    let identity = ProcessorId::from_label("identity");
    let product = ProcessorId::from_label("product");

    let rewards = LinearRewards {
        clock: clock.clone(),
        per_hour: Decimal::new(1, 4),
    };
    let oracle = AccumulatingRateOracle::new(rewards, clock.clone(), config.min_state_update_interval)?;
    let oracle_feed = Arc::new(RateOracleFeed::new(oracle, clock.clone()));
    let spot = Arc::new(MemoryFeed::new(Decimal::from(3_000), 0));

    let processors = ProcessorTable::builder()
        .with_feed(eth_usd, spot.clone())
        .with_feed(yield_index, oracle_feed.clone())
        .with_external(identity, Arc::new(Passthrough))
        .with_external(product, Arc::new(Reduce::new(ReduceOp::Product)))
        .build();

    let mut manager = OracleManager::new(processors, clock.clone(), config.clone());

    let price = manager.register(NodeDefinition::chainlink(eth_usd, 3_600)?)?;
    let index = manager.register(NodeDefinition::chainlink(yield_index, 60)?)?;
    let adjusted = manager.register(NodeDefinition::external(product, vec![], vec![price, index])?)?;
    let exposed = manager.register(NodeDefinition::external(identity, vec![], vec![adjusted])?)?;

    tracing::info!(node_id = %exposed, nodes = manager.registry().len(), "graph registered");

    for hour in 0..3u64 {
        clock.set(hour * 3_600);
        spot.set(Decimal::from(3_000 + hour * 10), clock.now());

        match oracle_feed.update_state() {
            Ok(()) => tracing::info!(hour, "oracle state updated"),
            Err(e) => tracing::warn!(hour, error = %e, "oracle state update skipped"),
        }

        let output = manager.process(exposed)?;
        tracing::info!(hour, value = %output.value, timestamp = output.timestamp, "evaluated");
    }

    // Inside the throttle window: rejected, state untouched.
    clock.advance(60);
    if let Err(e) = oracle_feed.update_state() {
        tracing::info!(error = %e, "early update rejected as expected");
    }

    Ok(())
}
