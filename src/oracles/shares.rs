//! Share/asset conversion for rebasing assets.
//!
//! ## Conversion
//!
//! ```text
//! shares = assets * total_shares / total_supply
//! assets = shares * total_supply / total_shares
//! ```
//!
//! computed with a `u128` intermediate and a single floor division. When the
//! denominator total is zero the input is returned unchanged (1:1 bootstrap).
//! The two directions are inverses only up to that final rounding.

use rust_decimal::Decimal;

use crate::error::{ConversionError, SourceFailure, StateError};
use crate::oracles::RateOracle;
use crate::types::fixed::{amount_to_decimal, mul_div_floor};

/// Live totals of a rebasing asset.
pub trait ShareConversionSource: Send + Sync {
    /// Total underlying assets
    fn total_supply(&self) -> Result<u64, SourceFailure>;

    /// Total shares outstanding
    fn total_shares(&self) -> Result<u64, SourceFailure>;
}

/// Pure unit conversion over a [`ShareConversionSource`].
#[derive(Debug)]
pub struct ShareConversionAdapter<S> {
    source: S,
}

impl<S: ShareConversionSource> ShareConversionAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Shares worth `assets`, rounded down.
    pub fn convert_to_shares(&self, assets: u64) -> Result<u64, ConversionError> {
        let supply = self.source.total_supply().map_err(unavailable)?;
        if supply == 0 {
            return Ok(assets);
        }

        let shares = self.source.total_shares().map_err(unavailable)?;
        mul_div_floor(assets, shares, supply).ok_or(ConversionError::Overflow)
    }

    /// Assets backing `shares`, rounded down.
    pub fn convert_to_assets(&self, shares: u64) -> Result<u64, ConversionError> {
        let total_shares = self.source.total_shares().map_err(unavailable)?;
        if total_shares == 0 {
            return Ok(shares);
        }

        let supply = self.source.total_supply().map_err(unavailable)?;
        mul_div_floor(shares, supply, total_shares).ok_or(ConversionError::Overflow)
    }
}

fn unavailable(e: SourceFailure) -> ConversionError {
    ConversionError::SourceUnavailable(e.to_string())
}

/// Stateless oracle whose index is the asset value of one whole share.
///
/// `share_unit` is the number of base units in one share, e.g. `10^18`, and
/// must be positive.
#[derive(Debug)]
pub struct ShareRateOracle<S> {
    adapter: ShareConversionAdapter<S>,
    share_unit: u64,
}

impl<S: ShareConversionSource> ShareRateOracle<S> {
    pub fn new(source: S, share_unit: u64) -> Result<Self, ConversionError> {
        if share_unit == 0 {
            return Err(ConversionError::ZeroShareUnit);
        }

        Ok(Self {
            adapter: ShareConversionAdapter::new(source),
            share_unit,
        })
    }

    pub fn adapter(&self) -> &ShareConversionAdapter<S> {
        &self.adapter
    }
}

impl<S: ShareConversionSource> RateOracle for ShareRateOracle<S> {
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
        let assets = self
            .adapter
            .convert_to_assets(self.share_unit)
            .map_err(|e| match &e {
                ConversionError::SourceUnavailable(reason) => StateError::SourceUnavailable(reason.clone()),
                ConversionError::Overflow => StateError::Overflow,
                ConversionError::ZeroShareUnit => StateError::InvalidMeasurement(e.to_string()),
            })?;

        amount_to_decimal(assets)
            .checked_div(amount_to_decimal(self.share_unit))
            .ok_or(StateError::Overflow)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
