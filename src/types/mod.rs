//! Core data types for the rate graph
//!
//! ## Types
//!
//! - [`NodeDefinition`]: Immutable node description (type, parameters, parents)
//! - [`NodeId`]: 256-bit content-addressed identifier
//! - [`NodeType`]: Built-in node kinds
//! - [`NodeOutput`]: Evaluated value plus observation time
//! - [`NodeRegistered`]: Registration record
//! - [`FeedId`], [`ProcessorId`]: References to external collaborators
//!
//! ## Fixed-Point Arithmetic
//!
//! Values are `rust_decimal::Decimal`; amounts are `u64`. See [`fixed`].

mod event;
mod node;
mod reference;
pub mod fixed;

// Re-export all types at module level
pub use event::NodeRegistered;
pub use node::{NodeDefinition, NodeId, NodeOutput, NodeType, MAX_PARAMETERS_LEN, MAX_PARENTS};
pub use reference::{FeedId, ProcessorId};
