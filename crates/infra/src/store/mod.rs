//! In-memory store implementations.
//!
//! Intended for tests, benches, and the demo runner. Not optimized for
//! performance.

mod cost_objects;
mod parts;

pub use cost_objects::InMemoryCostObjects;
pub use parts::InMemoryParts;
