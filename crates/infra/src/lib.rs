//! `kontor-infra` — infrastructure adapters.
//!
//! In-memory implementations of the store contracts, the XML product
//! importer, and test-data builders. Everything here stands in for the host
//! system that the domain crates otherwise only know through traits.

pub mod import;
pub mod store;
pub mod testdata;

pub use import::{
    ImportError, ImportOutcome, ImportReport, import_products, import_products_from_path,
    parse_price_cents,
};
pub use store::{InMemoryCostObjects, InMemoryParts};
