//! Append-only node registry.
//!
//! ## Architecture
//!
//! - **Slab**: definition storage, one slot per registered node
//! - **HashMap**: `NodeId` to slab key mapping for O(1) lookup
//! - **Event log**: one [`NodeRegistered`] record per `register` call, at most
//!   [`MAX_PENDING_EVENTS`] held until drained (oldest dropped first)
//!
//! ## Acyclicity
//!
//! A definition may only name parents that are already registered, so the
//! registration order is a topological order and no cycle can be built.
//! There is no removal API.

use std::collections::{vec_deque, HashMap, VecDeque};

use slab::Slab;

use crate::error::RegistryError;
use crate::processors::ProcessorTable;
use crate::registry::identity::compute_id;
use crate::types::{NodeDefinition, NodeId, NodeRegistered};

/// Maximum registration records held between drains.
pub const MAX_PENDING_EVENTS: usize = 1_024;

/// Registry of node definitions keyed by content hash.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    /// Definition storage
    nodes: Slab<NodeDefinition>,

    /// NodeId to slab key mapping
    index: HashMap<NodeId, usize>,

    /// Registration records not yet drained
    events: VecDeque<NodeRegistered>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            events: VecDeque::new(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a definition and return its identifier.
    ///
    /// Re-registering an existing definition is a no-op that returns the same
    /// identifier. A registration record is emitted either way.
    ///
    /// # Errors
    ///
    /// * `RegistryError::Definition` - The node type's processor rejects the
    ///   definition (bad parameters, wrong parent arity, unknown type)
    /// * `RegistryError::Dependency` - A parent is not registered
    pub fn register(
        &mut self,
        definition: NodeDefinition,
        processors: &ProcessorTable,
    ) -> Result<NodeId, RegistryError> {
        let id = compute_id(&definition)?;

        if self.index.contains_key(&id) {
            self.record(id, &definition, true);
            return Ok(id);
        }

        if !processors.validate(&definition) {
            let reason = match definition.node_type() {
                Some(node_type) => format!("rejected by the {node_type} processor"),
                None => "unknown node type".to_string(),
            };
            return Err(RegistryError::Definition {
                node_type: definition.node_type_raw(),
                reason,
            });
        }

        if let Some(parent) = definition
            .parents()
            .iter()
            .find(|parent| !self.index.contains_key(*parent))
        {
            return Err(RegistryError::Dependency { id, parent: *parent });
        }

        self.record(id, &definition, false);
        let key = self.nodes.insert(definition);
        self.index.insert(id, key);

        Ok(id)
    }

    fn record(&mut self, id: NodeId, definition: &NodeDefinition, existing: bool) {
        tracing::info!(
            node_id = %id,
            node_type = definition.node_type_raw(),
            parents = definition.parents().len(),
            existing,
            "node registered"
        );
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
            tracing::warn!(
                capacity = MAX_PENDING_EVENTS,
                "registration records not drained, dropping the oldest"
            );
        }
        self.events.push_back(NodeRegistered::new(id, definition));
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Look up a definition by identifier.
    pub fn lookup(&self, id: NodeId) -> Result<&NodeDefinition, RegistryError> {
        self.get(id).ok_or(RegistryError::NotFound(id))
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&NodeDefinition> {
        let key = *self.index.get(&id)?;
        self.nodes.get(key)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get the number of registered nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Registration Records
    // ========================================================================

    /// Registration records emitted since the last drain, oldest first
    pub fn events(&self) -> vec_deque::Iter<'_, NodeRegistered> {
        self.events.iter()
    }

    /// Take all pending registration records
    ///
    /// Callers that consume records should drain regularly: past
    /// [`MAX_PENDING_EVENTS`] the oldest undrained records are discarded.
    pub fn drain_events(&mut self) -> Vec<NodeRegistered> {
        self.events.drain(..).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::combinators::Passthrough;
    use crate::types::{NodeType, ProcessorId};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn passthrough_id() -> ProcessorId {
        ProcessorId::from_label("passthrough")
    }

    fn table() -> ProcessorTable {
        ProcessorTable::builder()
            .with_external(passthrough_id(), Arc::new(Passthrough))
            .build()
    }

    #[test]
    fn test_register_constant() {
        let processors = table();
        let mut registry = NodeRegistry::new();

        let id = registry
            .register(NodeDefinition::constant(Decimal::new(15, 1)), &processors)
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(id));
        assert_eq!(
            registry.lookup(id).unwrap().node_type(),
            Some(NodeType::Constant)
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let processors = table();
        let mut registry = NodeRegistry::with_capacity(8);
        let def = NodeDefinition::constant(Decimal::ONE);

        let id1 = registry.register(def.clone(), &processors).unwrap();
        let id2 = registry.register(def, &processors).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(registry.len(), 1);

        // Both calls emit a record.
        let events = registry.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
        assert_eq!(events[0].id, id1);
        assert_eq!(registry.events().len(), 0);
    }

    #[test]
    fn test_undrained_records_are_bounded() {
        let processors = table();
        let mut registry = NodeRegistry::new();
        let first = registry
            .register(NodeDefinition::constant(Decimal::ONE), &processors)
            .unwrap();

        for _ in 0..MAX_PENDING_EVENTS + 10 {
            registry
                .register(NodeDefinition::constant(Decimal::TWO), &processors)
                .unwrap();
        }

        assert_eq!(registry.events().len(), MAX_PENDING_EVENTS);
        assert!(registry.events().all(|event| event.id != first));
        assert_eq!(registry.len(), 2);

        let drained = registry.drain_events();
        assert_eq!(drained.len(), MAX_PENDING_EVENTS);
        assert_eq!(registry.events().len(), 0);
    }

    #[test]
    fn test_register_rejects_unknown_parent() {
        let processors = table();
        let mut registry = NodeRegistry::new();
        let missing = NodeId([7u8; 32]);

        let def = NodeDefinition::external(passthrough_id(), Vec::new(), vec![missing]).unwrap();
        let err = registry.register(def, &processors).unwrap_err();

        assert!(matches!(err, RegistryError::Dependency { parent, .. } if parent == missing));
        assert!(registry.is_empty());
        assert_eq!(registry.events().len(), 0);
    }

    #[test]
    fn test_register_rejects_invalid_definition() {
        let processors = table();
        let mut registry = NodeRegistry::new();

        // Constant with a parent
        let parent = registry
            .register(NodeDefinition::constant(Decimal::ONE), &processors)
            .unwrap();
        let bad = NodeDefinition::new(NodeType::Constant, Vec::from([0u8; 16]), vec![parent]);
        assert!(matches!(
            registry.register(bad, &processors),
            Err(RegistryError::Definition { node_type: 1, .. })
        ));

        // Unknown node type
        let unknown = NodeDefinition::from_raw(99, vec![], vec![]);
        let err = registry.register(unknown, &processors).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Definition {
                node_type: 99,
                reason: "unknown node type".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_validation_runs_before_dependency_check() {
        let processors = table();
        let mut registry = NodeRegistry::new();

        // Invalid parameters and a missing parent: the definition error wins.
        let bad = NodeDefinition::new(NodeType::Constant, vec![1, 2, 3], vec![NodeId([3u8; 32])]);
        assert!(matches!(
            registry.register(bad, &processors),
            Err(RegistryError::Definition { .. })
        ));
    }

    #[test]
    fn test_lookup_not_found() {
        let registry = NodeRegistry::new();
        let id = NodeId([9u8; 32]);
        assert_eq!(registry.lookup(id), Err(RegistryError::NotFound(id)));
        assert!(registry.get(id).is_none());
    }
}
