//! # Rate DAG
//!
//! Registry and evaluator for composable price/rate nodes, plus the rate
//! oracles that back its leaves.
//!
//! ## Architecture
//!
//! - **Types**: Node definitions, identifiers, outputs, fixed-point helpers
//! - **Registry**: Content-addressed, append-only node store
//! - **Processors**: Constant, Chainlink-style feed and External node kinds
//! - **Engine**: Depth-bounded recursive evaluation
//! - **Oracles**: Stateless/stateful rate oracles and share conversion
//!
//! ## Design Principles
//!
//! 1. **Determinism**: A node's identifier is a pure function of its content
//! 2. **No Floating Point**: Values are `rust_decimal::Decimal`
//! 3. **Acyclic by Construction**: Parents must be registered first
//! 4. **Always Fresh**: Composite values are recomputed on every call
//! 5. **Monotonic Indices**: Cached oracle indices never decrease
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rate_dag::{OracleConfig, OracleManager, ProcessorTable};
//! use rate_dag::clock::ManualClock;
//! use rate_dag::processors::{combinators::Passthrough, MemoryFeed};
//! use rate_dag::types::{FeedId, NodeDefinition, ProcessorId};
//! use rust_decimal::Decimal;
//!
//! let eth_usd = FeedId::from_label("ETH/USD");
//! let identity = ProcessorId::from_label("identity");
//!
//! let processors = ProcessorTable::builder()
//!     .with_feed(eth_usd, Arc::new(MemoryFeed::new(Decimal::from(3_000), 1_000)))
//!     .with_external(identity, Arc::new(Passthrough))
//!     .build();
//! let clock = Arc::new(ManualClock::new(1_030));
//! let mut manager = OracleManager::new(processors, clock, OracleConfig::default());
//!
//! let feed = manager.register(NodeDefinition::chainlink(eth_usd, 60).unwrap()).unwrap();
//! let node = manager
//!     .register(NodeDefinition::external(identity, vec![], vec![feed]).unwrap())
//!     .unwrap();
//!
//! assert_eq!(manager.process(node).unwrap().value, Decimal::from(3_000));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: NodeDefinition, NodeId, NodeOutput
pub mod types;

/// Node identity and registry
pub mod registry;

/// Per-kind node processors
pub mod processors;

/// Graph evaluation
pub mod engine;

/// Rate oracles and share conversion
pub mod oracles;

pub mod clock;
pub mod config;
pub mod error;
pub mod logger;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::OracleConfig;
pub use engine::{GraphEvaluator, OracleManager};
pub use error::{ConversionError, Error, ProcessingError, RegistryError, Result, SourceFailure, StateError};
pub use processors::{ExternalNodeProcessor, ExternalPriceFeed, FeedReading, ProcessorTable};
pub use registry::{compute_id, NodeRegistry};
pub use types::{NodeDefinition, NodeId, NodeOutput, NodeType};
