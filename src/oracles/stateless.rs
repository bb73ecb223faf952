//! Stateless rate oracle.

use rust_decimal::Decimal;

use crate::error::{SourceFailure, StateError};
use crate::oracles::RateOracle;

/// Live index read, e.g. a vault's current exchange rate.
pub trait IndexSource: Send + Sync {
    fn current_index(&self) -> Result<Decimal, SourceFailure>;
}

/// Oracle that recomputes the index on every query and keeps nothing.
#[derive(Debug)]
pub struct StatelessRateOracle<S> {
    source: S,
}

impl<S: IndexSource> StatelessRateOracle<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: IndexSource> RateOracle for StatelessRateOracle<S> {
    fn has_state(&self) -> bool {
        false
    }

    fn earliest_state_update(&self) -> u64 {
        0
    }

    fn min_update_interval(&self) -> u64 {
        0
    }

    fn update_state(&mut self) -> Result<(), StateError> {
        Err(StateError::NoState)
    }

    fn get_current_index(&self) -> Result<Decimal, StateError> {
        self.source
            .current_index()
            .map_err(|e| StateError::SourceUnavailable(e.to_string()))
    }
}
