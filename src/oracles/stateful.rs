//! Stateful rate oracle over a cumulative measurement.
//!
//! ## Measurement
//!
//! A source reports two numbers:
//! - `cumulative`: a non-decreasing per-unit accumulator (e.g. reward per
//!   token since inception)
//! - `conversion`: the price of one accumulator unit in the underlying
//!
//! ## Index Growth
//!
//! Between the cached measurement `m0` and a fresh one `m1`:
//!
//! ```text
//! growth = (m1.cumulative - m0.cumulative) * (m0.conversion + m1.conversion) / 2
//! index1 = index0 * (1 + growth)
//! ```
//!
//! The conversion is averaged over both ends of the interval so a price spike
//! at either end moves the index by half as much.
//!
//! ## State Machine
//!
//! `update_state` succeeds only when `now >= earliest_next_update` and the
//! fresh `cumulative` is not below the cached one. On success the throttle
//! moves to `now + min_update_interval`. Failed updates leave state untouched.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::error::{SourceFailure, StateError};
use crate::oracles::RateOracle;

/// One reading of a cumulative source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub cumulative: Decimal,
    pub conversion: Decimal,
}

impl Measurement {
    pub fn new(cumulative: Decimal, conversion: Decimal) -> Self {
        Self {
            cumulative,
            conversion,
        }
    }
}

/// External source of cumulative measurements.
pub trait MeasurementSource: Send + Sync {
    fn measure(&self) -> Result<Measurement, SourceFailure>;
}

/// Cached oracle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateOracleState {
    pub last_index: Decimal,
    pub last_measurement: Measurement,
    pub earliest_next_update: u64,
}

/// Stateful oracle with a monotonic index and a throttled refresh.
pub struct AccumulatingRateOracle<S> {
    source: S,
    clock: Arc<dyn Clock>,
    min_update_interval: u64,
    state: RateOracleState,
}

impl<S: MeasurementSource> AccumulatingRateOracle<S> {
    /// Create an oracle starting at index 1.
    ///
    /// Reads an initial measurement; the first update is allowed immediately.
    pub fn new(source: S, clock: Arc<dyn Clock>, min_update_interval: u64) -> Result<Self, StateError> {
        Self::with_initial_index(source, clock, min_update_interval, Decimal::ONE)
    }

    pub fn with_initial_index(
        source: S,
        clock: Arc<dyn Clock>,
        min_update_interval: u64,
        initial_index: Decimal,
    ) -> Result<Self, StateError> {
        if initial_index <= Decimal::ZERO {
            return Err(StateError::InvalidMeasurement(format!(
                "initial index {initial_index} is not positive"
            )));
        }

        let last_measurement = read(&source)?;
        let earliest_next_update = clock.now();

        Ok(Self {
            source,
            clock,
            min_update_interval,
            state: RateOracleState {
                last_index: initial_index,
                last_measurement,
                earliest_next_update,
            },
        })
    }

    #[inline]
    pub fn state(&self) -> &RateOracleState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Index implied by `fresh` on top of the cached state.
    fn project(&self, fresh: &Measurement) -> Result<Decimal, StateError> {
        let last = &self.state.last_measurement;

        if fresh.cumulative < last.cumulative {
            return Err(StateError::UnorderedMeasurement {
                previous: last.cumulative.to_string(),
                current: fresh.cumulative.to_string(),
            });
        }

        let delta = fresh.cumulative - last.cumulative;
        let average = last
            .conversion
            .checked_add(fresh.conversion)
            .and_then(|sum| sum.checked_div(Decimal::TWO))
            .ok_or(StateError::Overflow)?;

        delta
            .checked_mul(average)
            .and_then(|growth| growth.checked_add(Decimal::ONE))
            .and_then(|factor| self.state.last_index.checked_mul(factor))
            .ok_or(StateError::Overflow)
    }
}

fn read<S: MeasurementSource>(source: &S) -> Result<Measurement, StateError> {
    let m = source
        .measure()
        .map_err(|e| StateError::SourceUnavailable(e.to_string()))?;

    if m.cumulative.is_sign_negative() || m.conversion.is_sign_negative() {
        return Err(StateError::InvalidMeasurement(format!(
            "negative component in cumulative {} conversion {}",
            m.cumulative, m.conversion
        )));
    }

    Ok(m)
}

impl<S: MeasurementSource> RateOracle for AccumulatingRateOracle<S> {
    fn has_state(&self) -> bool {
        true
    }

    fn earliest_state_update(&self) -> u64 {
        self.state.earliest_next_update
    }

    fn min_update_interval(&self) -> u64 {
        self.min_update_interval
    }

    fn update_state(&mut self) -> Result<(), StateError> {
        let now = self.clock.now();
        if now < self.state.earliest_next_update {
            return Err(StateError::StateUpdateTooEarly {
                now,
                earliest: self.state.earliest_next_update,
            });
        }

        let fresh = read(&self.source)?;
        let index = self.project(&fresh).map_err(|e| {
            tracing::warn!(error = %e, "rejected oracle state update");
            e
        })?;

        self.state = RateOracleState {
            last_index: index,
            last_measurement: fresh,
            earliest_next_update: now.saturating_add(self.min_update_interval),
        };

        tracing::debug!(
            index = %index,
            earliest_next_update = self.state.earliest_next_update,
            "oracle state updated"
        );
        Ok(())
    }

    fn get_current_index(&self) -> Result<Decimal, StateError> {
        let fresh = read(&self.source)?;
        self.project(&fresh)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
