//! Error taxonomy.
//!
//! Every error terminates the call that raised it. Nothing in this crate
//! retries or substitutes a default value; retry policy belongs to the caller.

use thiserror::Error;

use crate::types::NodeId;

/// Failure reported by a collaborator outside the graph: a price feed, an
/// external processor, or a rate/share source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SourceFailure(pub String);

impl SourceFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Registration and lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed parameters, wrong parent arity or unknown node type.
    #[error("invalid definition for node type {node_type}: {reason}")]
    Definition { node_type: u8, reason: String },

    /// A parent is not registered yet. Register in dependency order.
    #[error("unknown parent {parent} referenced by node {id}")]
    Dependency { id: NodeId, parent: NodeId },

    #[error("node {0} not found")]
    NotFound(NodeId),
}

/// Failures raised while evaluating a node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("node {0} not found")]
    NotFound(NodeId),

    #[error("node {id} has unprocessable node type {node_type}")]
    UnprocessableNode { id: NodeId, node_type: u8 },

    #[error("evaluation reached node {id} beyond the maximum graph depth {max_depth}")]
    GraphTooDeep { id: NodeId, max_depth: usize },

    #[error("evaluation exceeded the budget of {max_visits} node visits")]
    EvaluationBudgetExceeded { max_visits: usize },

    #[error("feed {feed} is stale: updated at {updated_at}, now {now}, tolerance {tolerance}s")]
    StaleData {
        feed: String,
        updated_at: u64,
        now: u64,
        tolerance: u64,
    },

    #[error("feed {feed} read failed: {reason}")]
    FeedError { feed: String, reason: String },

    #[error("processor failed for node {id}: {reason}")]
    ProcessorError { id: NodeId, reason: String },
}

/// Failures guarding cached rate-oracle state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state update too early: now {now}, earliest {earliest}")]
    StateUpdateTooEarly { now: u64, earliest: u64 },

    #[error("measurement went backwards: previous {previous}, current {current}")]
    UnorderedMeasurement { previous: String, current: String },

    #[error("oracle keeps no state")]
    NoState,

    #[error("rate source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    #[error("index arithmetic overflowed")]
    Overflow,
}

/// Failures of share/asset unit conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("share source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("conversion result does not fit in u64")]
    Overflow,

    #[error("share unit must be positive")]
    ZeroShareUnit,
}

/// Crate-level error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_convert_into_crate_error() {
        let err: Error = StateError::NoState.into();
        assert!(matches!(err, Error::State(StateError::NoState)));

        let err: Error = RegistryError::NotFound(NodeId::ZERO).into();
        assert_eq!(err.to_string(), format!("node {} not found", NodeId::ZERO));
    }

    #[test]
    fn test_state_error_message() {
        let err = StateError::StateUpdateTooEarly { now: 10, earliest: 70 };
        assert_eq!(err.to_string(), "state update too early: now 10, earliest 70");
    }
}
