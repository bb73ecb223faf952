//! Rate oracles: leaf data sources exposing a non-decreasing index.
//!
//! ## Two-State Contract
//!
//! | | `has_state()` | `update_state()` | `get_current_index()` |
//! |-|---------------|------------------|-----------------------|
//! | Stateless | `false` | always `NoState` | live read |
//! | Stateful  | `true`  | throttled refresh | pure projection from cached state |
//!
//! ## Components
//!
//! - [`StatelessRateOracle`]: index read live from an [`IndexSource`]
//! - [`AccumulatingRateOracle`]: cached index grown from a cumulative
//!   [`MeasurementSource`]
//! - [`ShareConversionAdapter`]: assets/shares conversion for rebasing tokens
//! - [`ShareRateOracle`]: stateless oracle over a share conversion
//! - [`RateOracleFeed`]: exposes any oracle as a price feed for graph leaves

pub mod feed;
pub mod shares;
pub mod stateful;
pub mod stateless;

use rust_decimal::Decimal;

use crate::error::StateError;

pub use feed::RateOracleFeed;
pub use shares::{ShareConversionAdapter, ShareConversionSource, ShareRateOracle};
pub use stateful::{AccumulatingRateOracle, Measurement, MeasurementSource, RateOracleState};
pub use stateless::{IndexSource, StatelessRateOracle};

/// A time-weighted index source consumed by product logic.
pub trait RateOracle: Send + Sync {
    /// Whether the oracle caches state between updates
    fn has_state(&self) -> bool;

    /// Earliest unix time at which `update_state` may succeed.
    fn earliest_state_update(&self) -> u64;

    /// Throttle window between successful updates, zero for stateless oracles
    fn min_update_interval(&self) -> u64;

    /// Refresh cached state from the external source.
    fn update_state(&mut self) -> Result<(), StateError>;

    /// Current index. Never mutates state.
    fn get_current_index(&self) -> Result<Decimal, StateError>;
}
