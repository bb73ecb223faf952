//! Content-addressed node identity.
//!
//! ## Canonical Form
//!
//! A definition is serialized as the SSZ container
//!
//! ```text
//! CanonicalNode {
//!     node_type:  u8
//!     parameters: List<u8, 4096>
//!     parents:    List<[u8; 32], 64>   (declaration order)
//! }
//! ```
//!
//! and hashed with SHA-256. The identifier depends on nothing but the
//! definition's content: not on registration time, order or caller.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::RegistryError;
use crate::types::{NodeDefinition, NodeId, MAX_PARAMETERS_LEN, MAX_PARENTS};

#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
struct CanonicalNode {
    node_type: u8,
    parameters: List<u8, MAX_PARAMETERS_LEN>,
    parents: List<[u8; 32], MAX_PARENTS>,
}

/// Check the size limits every definition must respect.
pub(crate) fn check_limits(definition: &NodeDefinition) -> Result<(), RegistryError> {
    if definition.parameters().len() > MAX_PARAMETERS_LEN {
        return Err(definition_error(
            definition,
            format!(
                "parameters are {} bytes, limit is {}",
                definition.parameters().len(),
                MAX_PARAMETERS_LEN
            ),
        ));
    }

    if definition.parents().len() > MAX_PARENTS {
        return Err(definition_error(
            definition,
            format!(
                "{} parents, limit is {}",
                definition.parents().len(),
                MAX_PARENTS
            ),
        ));
    }

    Ok(())
}

/// Compute the identifier of a definition.
///
/// Pure: identical definitions always produce identical identifiers.
///
/// # Errors
///
/// `RegistryError::Definition` if the definition exceeds the size limits and
/// therefore has no canonical form.
///
/// # Example
///
/// ```
/// use rate_dag::registry::compute_id;
/// use rate_dag::types::{NodeDefinition, NodeType};
///
/// let a = NodeDefinition::new(NodeType::Constant, vec![1, 2, 3], vec![]);
/// let b = a.clone();
/// assert_eq!(compute_id(&a).unwrap(), compute_id(&b).unwrap());
/// ```
pub fn compute_id(definition: &NodeDefinition) -> Result<NodeId, RegistryError> {
    check_limits(definition)?;

    let parameters = List::<u8, MAX_PARAMETERS_LEN>::try_from(definition.parameters().to_vec())
        .map_err(|_| definition_error(definition, "parameters exceed canonical list bound"))?;

    let parent_bytes: Vec<[u8; 32]> = definition.parents().iter().map(|p| p.0).collect();
    let parents = List::<[u8; 32], MAX_PARENTS>::try_from(parent_bytes)
        .map_err(|_| definition_error(definition, "parents exceed canonical list bound"))?;

    let canonical = CanonicalNode {
        node_type: definition.node_type_raw(),
        parameters,
        parents,
    };

    let encoded = ssz_rs::serialize(&canonical)
        .map_err(|e| definition_error(definition, format!("canonical encoding failed: {e:?}")))?;

    Ok(NodeId(hash(&encoded)))
}

fn hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

fn definition_error(definition: &NodeDefinition, reason: impl Into<String>) -> RegistryError {
    RegistryError::Definition {
        node_type: definition.node_type_raw(),
        reason: reason.into(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
