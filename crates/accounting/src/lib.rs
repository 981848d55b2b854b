//! `kontor-accounting` — cost accounting records.
//!
//! Holds the cost object (cost center) master record and the store contract
//! row policies allocate against. The in-memory store implementation lives in
//! `kontor-infra`.

pub mod cost_object;

pub use cost_object::{CostObject, CostObjectId, CostObjectStore};
