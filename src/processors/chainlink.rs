//! Chainlink-style feed nodes.
//!
//! ## Parameters
//!
//! SSZ container, 40 bytes:
//! - `feed`: 32-byte [`FeedId`] (all-zero is null)
//! - `staleness_tolerance`: maximum age of the feed answer in seconds
//!
//! ## Failure Modes
//!
//! - `FeedError`: the read failed, the answer is not positive, or the update
//!   time lies in the future
//! - `StaleData`: `now - updated_at > staleness_tolerance`

use ssz_rs::prelude::*;

use crate::error::{ProcessingError, RegistryError};
use crate::processors::ProcessorTable;
use crate::types::{FeedId, NodeDefinition, NodeId, NodeOutput, NodeType};

/// Encoded length of [`ChainlinkParams`].
pub const CHAINLINK_PARAMS_LEN: usize = 40;

/// Parameters of a Chainlink-style node.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ChainlinkParams {
    /// Feed reference
    pub feed: [u8; 32],

    /// Maximum accepted answer age in seconds
    pub staleness_tolerance: u64,
}

impl ChainlinkParams {
    pub fn new(feed: FeedId, staleness_tolerance: u64) -> Self {
        Self {
            feed: feed.0,
            staleness_tolerance,
        }
    }

    #[inline]
    pub fn feed_id(&self) -> FeedId {
        FeedId(self.feed)
    }

    pub fn encode(&self) -> Result<Vec<u8>, RegistryError> {
        ssz_rs::serialize(self).map_err(|e| RegistryError::Definition {
            node_type: NodeType::Chainlink.to_u8(),
            reason: format!("parameter encoding failed: {e:?}"),
        })
    }

    /// Decode parameters; `None` unless exactly one well-formed container.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != CHAINLINK_PARAMS_LEN {
            return None;
        }
        ssz_rs::deserialize(bytes).ok()
    }
}

impl NodeDefinition {
    /// Chainlink-style leaf reading `feed`, rejecting answers older than
    /// `staleness_tolerance` seconds.
    pub fn chainlink(feed: FeedId, staleness_tolerance: u64) -> Result<Self, RegistryError> {
        let parameters = ChainlinkParams::new(feed, staleness_tolerance).encode()?;
        Ok(NodeDefinition::new(NodeType::Chainlink, parameters, Vec::new()))
    }
}

/// Valid iff the node is a leaf, the parameters decode, and the feed is
/// non-null, known and currently answering.
pub(crate) fn validate(definition: &NodeDefinition, table: &ProcessorTable) -> bool {
    if !definition.is_leaf() {
        return false;
    }

    let Some(params) = ChainlinkParams::decode(definition.parameters()) else {
        return false;
    };

    let feed_id = params.feed_id();
    if feed_id.is_null() {
        return false;
    }

    match table.feed(&feed_id) {
        Some(feed) => feed.latest_value().is_ok(),
        None => false,
    }
}

pub(crate) fn process(
    id: NodeId,
    parameters: &[u8],
    table: &ProcessorTable,
    now: u64,
) -> Result<NodeOutput, ProcessingError> {
    let params = ChainlinkParams::decode(parameters).ok_or_else(|| ProcessingError::ProcessorError {
        id,
        reason: "chainlink parameters do not decode".to_string(),
    })?;

    let feed_id = params.feed_id();
    let feed_error = |reason: String| ProcessingError::FeedError {
        feed: feed_id.to_string(),
        reason,
    };

    let feed = table
        .feed(&feed_id)
        .ok_or_else(|| feed_error("feed is not registered".to_string()))?;

    let reading = feed.latest_value().map_err(|e| feed_error(e.to_string()))?;

    if reading.value.is_sign_negative() || reading.value.is_zero() {
        return Err(feed_error(format!("non-positive answer {}", reading.value)));
    }

    if reading.updated_at > now {
        return Err(feed_error(format!(
            "update time {} is ahead of now {}",
            reading.updated_at, now
        )));
    }

    if now - reading.updated_at > params.staleness_tolerance {
        tracing::warn!(
            node_id = %id,
            feed = %feed_id,
            updated_at = reading.updated_at,
            now,
            "stale feed answer"
        );
        return Err(ProcessingError::StaleData {
            feed: feed_id.to_string(),
            updated_at: reading.updated_at,
            now,
            tolerance: params.staleness_tolerance,
        });
    }

    Ok(NodeOutput::new(reading.value, reading.updated_at))
}

// ============================================================================
// Unit Tests
// ============================================================================
