//! Node definitions, identifiers and outputs.
//!
//! ## Node Types
//!
//! The node type tag is stored raw as `u8` inside a definition:
//! - Constant = 1
//! - Chainlink = 2
//! - External = 3
//!
//! Unknown tags stay representable so the registry can reject them as a
//! definition error and the evaluator as unprocessable.
//!
//! ## Identity
//!
//! A [`NodeId`] is the SHA-256 of the canonical encoding of
//! `(node_type, parameters, parents)`. See [`crate::registry::compute_id`].

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Maximum parameter payload length in bytes.
pub const MAX_PARAMETERS_LEN: usize = 4096;

/// Maximum number of parents a node may reference.
pub const MAX_PARENTS: usize = 64;

// ============================================================================
// NodeType enum
// ============================================================================

/// Built-in node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Fixed literal value, no parents
    Constant,
    /// Price feed read with a staleness tolerance, no parents
    Chainlink,
    /// Delegates to an externally registered processor, any parents
    External,
}

impl NodeType {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            NodeType::Constant => 1,
            NodeType::Chainlink => 2,
            NodeType::External => 3,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Constant),
            2 => Some(NodeType::Chainlink),
            3 => Some(NodeType::External),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Constant => "constant",
            NodeType::Chainlink => "chainlink",
            NodeType::External => "external",
        };
        f.write_str(name)
    }
}

// ============================================================================
// NodeId
// ============================================================================

/// 256-bit content-addressed node identifier.
///
/// Stable across processes and safe to persist.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    pub const ZERO: NodeId = NodeId([0u8; 32]);

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.to_hex())
    }
}

impl FromStr for NodeId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(NodeId(bytes))
    }
}

// ============================================================================
// NodeDefinition
// ============================================================================

/// An immutable node definition.
///
/// Parameters are an opaque payload interpreted by the node type's
/// processor. Parent order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeDefinition {
    node_type_raw: u8,
    parameters: Vec<u8>,
    parents: Vec<NodeId>,
}

impl NodeDefinition {
    /// Create a definition for a built-in node type.
    pub fn new(node_type: NodeType, parameters: Vec<u8>, parents: Vec<NodeId>) -> Self {
        Self::from_raw(node_type.to_u8(), parameters, parents)
    }

    /// Create a definition from a raw type tag, which may be unknown.
    pub fn from_raw(node_type_raw: u8, parameters: Vec<u8>, parents: Vec<NodeId>) -> Self {
        Self {
            node_type_raw,
            parameters,
            parents,
        }
    }

    /// Get the node type, if the tag is recognized
    pub fn node_type(&self) -> Option<NodeType> {
        NodeType::from_u8(self.node_type_raw)
    }

    #[inline]
    pub fn node_type_raw(&self) -> u8 {
        self.node_type_raw
    }

    #[inline]
    pub fn parameters(&self) -> &[u8] {
        &self.parameters
    }

    #[inline]
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Check if this is a leaf (no parents)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.parents.is_empty()
    }
}

// ============================================================================
// NodeOutput
// ============================================================================

/// Result of evaluating a node. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeOutput {
    /// Fixed-point value
    pub value: Decimal,

    /// Unix timestamp (seconds) of the underlying observation
    pub timestamp: u64,
}

impl NodeOutput {
    pub fn new(value: Decimal, timestamp: u64) -> Self {
        Self { value, timestamp }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_conversion() {
        assert_eq!(NodeType::Constant.to_u8(), 1);
        assert_eq!(NodeType::Chainlink.to_u8(), 2);
        assert_eq!(NodeType::External.to_u8(), 3);
        assert_eq!(NodeType::from_u8(2), Some(NodeType::Chainlink));
        assert_eq!(NodeType::from_u8(0), None);
        assert_eq!(NodeType::from_u8(4), None);
    }

    #[test]
    fn test_node_id_hex_roundtrip() {
        let id = NodeId([0xAB; 32]);
        let text = id.to_string();
        assert_eq!(text.len(), 66);
        assert!(text.starts_with("0x"));
        assert_eq!(text.parse::<NodeId>().unwrap(), id);

        // Prefix is optional when parsing.
        assert_eq!(text[2..].parse::<NodeId>().unwrap(), id);
        assert!("0x1234".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_definition_accessors() {
        let parent = NodeId([1u8; 32]);
        let def = NodeDefinition::new(NodeType::External, vec![9, 9], vec![parent]);

        assert_eq!(def.node_type(), Some(NodeType::External));
        assert_eq!(def.node_type_raw(), 3);
        assert_eq!(def.parameters(), &[9, 9]);
        assert_eq!(def.parents(), &[parent]);
        assert!(!def.is_leaf());
    }

    #[test]
    fn test_unknown_node_type_is_representable() {
        let def = NodeDefinition::from_raw(200, vec![], vec![]);
        assert_eq!(def.node_type(), None);
        assert!(def.is_leaf());
    }
}
