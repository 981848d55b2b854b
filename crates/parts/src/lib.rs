//! `kontor-parts` — part master data.
//!
//! Sales-document rows reference parts. A part is a product (with a
//! procurement mode), a supplementary item, or something else; row policies
//! dispatch on that distinction. The store contract lives here, the in-memory
//! implementation in `kontor-infra`.

pub mod part;
pub mod selection;

pub use part::{
    NewProduct, OtherPart, Part, PartId, PartStore, ProcurementMode, Product, ProductListRow,
    SupplementaryItem,
};
pub use selection::{CodeTerm, SelectionCriteria};
