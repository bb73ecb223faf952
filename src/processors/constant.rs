//! Constant nodes: a fixed literal, no parents.

use rust_decimal::Decimal;

use crate::error::ProcessingError;
use crate::types::fixed::{decode_decimal, encode_decimal};
use crate::types::{NodeDefinition, NodeId, NodeOutput, NodeType};

impl NodeDefinition {
    /// Constant node definition for `value`.
    ///
    /// The value is normalized first, so numerically equal literals share a
    /// node identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use rate_dag::types::{NodeDefinition, NodeType};
    /// use rust_decimal::Decimal;
    ///
    /// let def = NodeDefinition::constant(Decimal::new(15, 1)); // 1.5
    /// assert_eq!(def.node_type(), Some(NodeType::Constant));
    /// assert_eq!(def.parameters().len(), 16);
    /// ```
    pub fn constant(value: Decimal) -> Self {
        NodeDefinition::new(NodeType::Constant, encode_decimal(value).to_vec(), Vec::new())
    }
}

pub(crate) fn validate(definition: &NodeDefinition) -> bool {
    definition.is_leaf() && decode_decimal(definition.parameters()).is_some()
}

pub(crate) fn process(id: NodeId, parameters: &[u8], now: u64) -> Result<NodeOutput, ProcessingError> {
    let value = decode_decimal(parameters).ok_or_else(|| ProcessingError::ProcessorError {
        id,
        reason: "constant parameters do not decode".to_string(),
    })?;

    Ok(NodeOutput::new(value, now))
}
