//! `kontor-automation` — row automation over sales documents.
//!
//! The cost-allocation policy classifies every row by document kind and part
//! kind, then reuses an existing cost object, creates one on demand, or
//! leaves the row alone. Quotation and sales-order rows only ever receive
//! informational messages; invoice and packing-slip rows are the mutation
//! path. A screen-validation hook applies any per-row automation to a
//! document unless the editor action is read-only.

pub mod draw;
pub mod hook;
pub mod policy;

#[cfg(test)]
pub(crate) mod testing;

pub use draw::{AllocationDraw, FixedDraw, RandomDraw, SeededDraw};
pub use hook::{EditorAction, RowAutomation, RowReport, ValidationReport, run_screen_validation};
pub use policy::{CostAllocationPolicy, PolicyCodes, RowOutcome, RunContext};
