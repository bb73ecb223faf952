//! Registration records.

use crate::types::{NodeDefinition, NodeId};

/// Emitted on every `register` call, including idempotent re-registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRegistered {
    pub id: NodeId,
    pub node_type_raw: u8,
    pub parameters: Vec<u8>,
    pub parents: Vec<NodeId>,
}

impl NodeRegistered {
    pub fn new(id: NodeId, definition: &NodeDefinition) -> Self {
        Self {
            id,
            node_type_raw: definition.node_type_raw(),
            parameters: definition.parameters().to_vec(),
            parents: definition.parents().to_vec(),
        }
    }
}
