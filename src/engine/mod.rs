//! Graph evaluation.
//!
//! ## Design Principles
//!
//! 1. **Read-only**: evaluation never mutates the registry or any leaf state
//! 2. **Always fresh**: no cross-call caching of composite values
//! 3. **Bounded**: explicit depth and visit limits, never a native stack overflow
//! 4. **Ordered**: parent outputs reach processors in declaration order
//!
//! ## Components
//!
//! - [`GraphEvaluator`]: borrowing recursive evaluator
//! - [`OracleManager`]: owning facade for registration and evaluation

pub mod evaluator;
pub mod manager;

pub use evaluator::GraphEvaluator;
pub use manager::OracleManager;
