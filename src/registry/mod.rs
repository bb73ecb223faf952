//! Node identity and the append-only registry.
//!
//! - [`compute_id`]: SHA-256 over the SSZ canonical form of a definition
//! - [`NodeRegistry`]: slab-backed store enforcing "parents must exist"

pub mod identity;
pub mod store;

pub use identity::compute_id;
pub use store::{NodeRegistry, MAX_PENDING_EVENTS};
