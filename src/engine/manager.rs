//! Owning facade over registry, processors, clock and configuration.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rate_dag::{OracleConfig, OracleManager, ProcessorTable};
//! use rate_dag::clock::ManualClock;
//! use rate_dag::types::NodeDefinition;
//! use rust_decimal::Decimal;
//!
//! let mut manager = OracleManager::new(
//!     ProcessorTable::default(),
//!     Arc::new(ManualClock::new(1_700_000_000)),
//!     OracleConfig::default(),
//! );
//!
//! let id = manager.register(NodeDefinition::constant(Decimal::new(15, 1))).unwrap();
//! assert_eq!(manager.process(id).unwrap().value, Decimal::new(15, 1));
//! ```

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::OracleConfig;
use crate::engine::GraphEvaluator;
use crate::error::{ProcessingError, RegistryError};
use crate::processors::ProcessorTable;
use crate::registry::{compute_id, NodeRegistry};
use crate::types::{NodeDefinition, NodeId, NodeOutput, NodeRegistered};

/// Entry point for product logic: register nodes, evaluate them.
///
/// Registration is the only mutating operation and takes `&mut self`;
/// evaluation takes `&self` and never mutates.
pub struct OracleManager {
    registry: NodeRegistry,
    processors: ProcessorTable,
    clock: Arc<dyn Clock>,
    config: OracleConfig,
}

impl OracleManager {
    pub fn new(processors: ProcessorTable, clock: Arc<dyn Clock>, config: OracleConfig) -> Self {
        Self {
            registry: NodeRegistry::new(),
            processors,
            clock,
            config,
        }
    }

    /// Identifier a definition would be registered under.
    pub fn compute_id(&self, definition: &NodeDefinition) -> Result<NodeId, RegistryError> {
        compute_id(definition)
    }

    pub fn register(&mut self, definition: NodeDefinition) -> Result<NodeId, RegistryError> {
        self.registry.register(definition, &self.processors)
    }

    pub fn lookup(&self, id: NodeId) -> Result<&NodeDefinition, RegistryError> {
        self.registry.lookup(id)
    }

    pub fn process(&self, id: NodeId) -> Result<NodeOutput, ProcessingError> {
        self.evaluator().process(id)
    }

    pub fn process_many(&self, ids: &[NodeId]) -> Result<Vec<NodeOutput>, ProcessingError> {
        self.evaluator().process_many(ids)
    }

    pub fn evaluator(&self) -> GraphEvaluator<'_> {
        GraphEvaluator::new(&self.registry, &self.processors, self.clock.as_ref(), &self.config)
    }

    #[inline]
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn drain_events(&mut self) -> Vec<NodeRegistered> {
        self.registry.drain_events()
    }
}
