//! Sales documents and their line items.
//!
//! The four document kinds (quotation, sales order, invoice, packing slip)
//! share one row layout. Rows are mutated through [`SalesRowMut`], a view
//! tagged with the owning document's kind, so that operations which are only
//! legal on certain kinds can enforce that at the seam.

pub mod document;
pub mod row;
pub mod schema;

pub use document::{DocumentId, DocumentKind, DocumentState, ItemRow, SalesDocument};
pub use row::SalesRowMut;
