//! Recursive, read-only graph evaluation.
//!
//! ## Algorithm
//!
//! 1. Load the definition (`NotFound` if absent)
//! 2. Evaluate every parent, in declaration order
//! 3. Dispatch parent outputs and parameters to the node type's processor
//!
//! Nothing is cached between calls: every `process` recomputes the whole
//! subtree. A single `now` is read from the clock per call, so every node in
//! one evaluation sees the same time.
//!
//! ## Bounds
//!
//! Recursion carries an explicit depth counter and fails with
//! `GraphTooDeep` past `max_graph_depth`, itself clamped to
//! `MAX_GRAPH_DEPTH_CEILING` whatever the configuration says. A visit
//! counter bounds the total work of a call (shared ancestors are recomputed
//! once per path) and fails with `EvaluationBudgetExceeded`.

use crate::clock::Clock;
use crate::config::{OracleConfig, MAX_GRAPH_DEPTH_CEILING};
use crate::error::ProcessingError;
use crate::processors::ProcessorTable;
use crate::registry::NodeRegistry;
use crate::types::{NodeId, NodeOutput};

/// Borrowing evaluator over a registry and a processor table.
pub struct GraphEvaluator<'a> {
    registry: &'a NodeRegistry,
    processors: &'a ProcessorTable,
    clock: &'a dyn Clock,
    max_depth: usize,
    max_visits: usize,
}

/// Per-call evaluation state.
struct Walk {
    now: u64,
    visits: usize,
}

impl<'a> GraphEvaluator<'a> {
    pub fn new(
        registry: &'a NodeRegistry,
        processors: &'a ProcessorTable,
        clock: &'a dyn Clock,
        config: &OracleConfig,
    ) -> Self {
        Self {
            registry,
            processors,
            clock,
            max_depth: config.max_graph_depth.min(MAX_GRAPH_DEPTH_CEILING),
            max_visits: config.max_node_visits,
        }
    }

    /// Evaluate a node.
    pub fn process(&self, id: NodeId) -> Result<NodeOutput, ProcessingError> {
        let mut walk = Walk {
            now: self.clock.now(),
            visits: 0,
        };
        self.evaluate(id, 0, &mut walk)
    }

    /// Evaluate several nodes at one clock reading, failing on the first error.
    pub fn process_many(&self, ids: &[NodeId]) -> Result<Vec<NodeOutput>, ProcessingError> {
        let now = self.clock.now();
        ids.iter()
            .map(|id| self.evaluate(*id, 0, &mut Walk { now, visits: 0 }))
            .collect()
    }

    fn evaluate(&self, id: NodeId, depth: usize, walk: &mut Walk) -> Result<NodeOutput, ProcessingError> {
        if depth > self.max_depth {
            return Err(ProcessingError::GraphTooDeep {
                id,
                max_depth: self.max_depth,
            });
        }

        walk.visits += 1;
        if walk.visits > self.max_visits {
            return Err(ProcessingError::EvaluationBudgetExceeded {
                max_visits: self.max_visits,
            });
        }

        let definition = self
            .registry
            .get(id)
            .ok_or(ProcessingError::NotFound(id))?;

        let mut parent_outputs = Vec::with_capacity(definition.parents().len());
        for parent in definition.parents() {
            parent_outputs.push(self.evaluate(*parent, depth + 1, walk)?);
        }

        tracing::debug!(
            node_id = %id,
            node_type = definition.node_type_raw(),
            depth,
            "dispatching node"
        );

        self.processors
            .process(id, definition, &parent_outputs, walk.now)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
