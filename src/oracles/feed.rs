//! Bridge from a rate oracle to a graph leaf.
//!
//! Registering a [`RateOracleFeed`] under a [`FeedId`](crate::types::FeedId)
//! lets a Chainlink-style node read the oracle's current index. The reading
//! is stamped with the current time: the index is a live projection, not a
//! cached answer.

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::error::{SourceFailure, StateError};
use crate::oracles::RateOracle;
use crate::processors::{ExternalPriceFeed, FeedReading};

/// Shares an oracle between the graph (reads) and its owner (updates).
pub struct RateOracleFeed<O> {
    oracle: Arc<RwLock<O>>,
    clock: Arc<dyn Clock>,
}

impl<O: RateOracle> RateOracleFeed<O> {
    pub fn new(oracle: O, clock: Arc<dyn Clock>) -> Self {
        Self {
            oracle: Arc::new(RwLock::new(oracle)),
            clock,
        }
    }

    /// Handle for the owner to drive `update_state`.
    pub fn handle(&self) -> Arc<RwLock<O>> {
        Arc::clone(&self.oracle)
    }

    /// Run `update_state` on the wrapped oracle.
    pub fn update_state(&self) -> Result<(), StateError> {
        self.oracle
            .write()
            .map_err(|_| StateError::SourceUnavailable("oracle lock poisoned".to_string()))?
            .update_state()
    }

    pub fn current_index(&self) -> Result<Decimal, StateError> {
        self.oracle
            .read()
            .map_err(|_| StateError::SourceUnavailable("oracle lock poisoned".to_string()))?
            .get_current_index()
    }
}

impl<O: RateOracle> ExternalPriceFeed for RateOracleFeed<O> {
    fn latest_value(&self) -> Result<FeedReading, SourceFailure> {
        let index = self
            .current_index()
            .map_err(|e| SourceFailure::new(e.to_string()))?;
        Ok(FeedReading::new(index, self.clock.now()))
    }
}
