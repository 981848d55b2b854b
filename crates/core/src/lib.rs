//! `kontor-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and the diagnostics sink
//! automation passes write their human-readable decision trail into.

pub mod diag;
pub mod error;
pub mod id;

pub use diag::Diagnostics;
pub use error::{DomainError, DomainResult};
pub use id::{RecordId, SessionId};
