//! Node processors.
//!
//! ## Dispatch
//!
//! Built-in node kinds form a closed set ([`NodeType`]) dispatched with a
//! `match`. The `External` kind is the open extension point: it names an
//! [`ExternalNodeProcessor`] registered in the [`ProcessorTable`] at startup.
//!
//! | Node type | Parents | Parameters |
//! |-----------|---------|------------|
//! | Constant  | 0       | 16-byte canonical decimal |
//! | Chainlink | 0       | SSZ `{feed: [u8; 32], staleness_tolerance: u64}` |
//! | External  | 0..=64  | SSZ `{processor: [u8; 32], payload: List<u8, 4000>}` |
//!
//! Every processor exposes the same capability: `validate` at registration
//! time and `process` at evaluation time.

pub mod chainlink;
pub mod combinators;
pub mod constant;
pub mod external;
pub mod feed;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::{ProcessingError, SourceFailure};
use crate::types::{FeedId, NodeDefinition, NodeId, NodeOutput, NodeType, ProcessorId};

pub use chainlink::ChainlinkParams;
pub use external::ExternalParams;
pub use feed::MemoryFeed;

// ============================================================================
// External capabilities
// ============================================================================

/// Latest answer of a price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedReading {
    pub value: Decimal,
    /// Unix timestamp (seconds) of the feed's last update
    pub updated_at: u64,
}

impl FeedReading {
    pub fn new(value: Decimal, updated_at: u64) -> Self {
        Self { value, updated_at }
    }
}

/// A price feed backing a Chainlink-style leaf.
pub trait ExternalPriceFeed: Send + Sync {
    fn latest_value(&self) -> Result<FeedReading, SourceFailure>;
}

/// An externally supplied processor for `External` nodes.
///
/// `payload` is the opaque part of the node parameters, after the processor
/// reference. Failures must be reported, never papered over with a default.
pub trait ExternalNodeProcessor: Send + Sync {
    /// Check parent arity and payload shape at registration time.
    fn validate(&self, parents: &[NodeId], payload: &[u8]) -> bool;

    /// Combine parent outputs, given in declaration order.
    fn process(
        &self,
        parent_outputs: &[NodeOutput],
        payload: &[u8],
        now: u64,
    ) -> Result<NodeOutput, SourceFailure>;
}

// ============================================================================
// ProcessorTable
// ============================================================================

/// Feeds and external processors, built once at startup.
#[derive(Clone, Default)]
pub struct ProcessorTable {
    feeds: HashMap<FeedId, Arc<dyn ExternalPriceFeed>>,
    externals: HashMap<ProcessorId, Arc<dyn ExternalNodeProcessor>>,
}

impl fmt::Debug for ProcessorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorTable")
            .field("feeds", &self.feeds.keys().collect::<Vec<_>>())
            .field("externals", &self.externals.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ProcessorTable {
    pub fn builder() -> ProcessorTableBuilder {
        ProcessorTableBuilder::default()
    }

    #[inline]
    pub fn feed(&self, id: &FeedId) -> Option<&Arc<dyn ExternalPriceFeed>> {
        self.feeds.get(id)
    }

    #[inline]
    pub fn external(&self, id: &ProcessorId) -> Option<&Arc<dyn ExternalNodeProcessor>> {
        self.externals.get(id)
    }

    /// Run the owning processor's structural validation.
    ///
    /// Unknown node types are never valid.
    pub fn validate(&self, definition: &NodeDefinition) -> bool {
        match definition.node_type() {
            Some(NodeType::Constant) => constant::validate(definition),
            Some(NodeType::Chainlink) => chainlink::validate(definition, self),
            Some(NodeType::External) => external::validate(definition, self),
            None => false,
        }
    }

    /// Dispatch an evaluated node to its processor.
    ///
    /// `parent_outputs` must be in declaration order.
    pub fn process(
        &self,
        id: NodeId,
        definition: &NodeDefinition,
        parent_outputs: &[NodeOutput],
        now: u64,
    ) -> Result<NodeOutput, ProcessingError> {
        match definition.node_type() {
            Some(NodeType::Constant) => constant::process(id, definition.parameters(), now),
            Some(NodeType::Chainlink) => {
                chainlink::process(id, definition.parameters(), self, now)
            }
            Some(NodeType::External) => {
                external::process(id, definition.parameters(), parent_outputs, self, now)
            }
            None => Err(ProcessingError::UnprocessableNode {
                id,
                node_type: definition.node_type_raw(),
            }),
        }
    }
}

/// Builder for [`ProcessorTable`].
#[derive(Default)]
pub struct ProcessorTableBuilder {
    table: ProcessorTable,
}

impl ProcessorTableBuilder {
    /// Register a price feed. Replaces any feed with the same reference.
    pub fn with_feed(mut self, id: FeedId, feed: Arc<dyn ExternalPriceFeed>) -> Self {
        self.table.feeds.insert(id, feed);
        self
    }

    /// Register an external processor. Replaces any processor with the same reference.
    pub fn with_external(mut self, id: ProcessorId, processor: Arc<dyn ExternalNodeProcessor>) -> Self {
        self.table.externals.insert(id, processor);
        self
    }

    pub fn build(self) -> ProcessorTable {
        self.table
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
