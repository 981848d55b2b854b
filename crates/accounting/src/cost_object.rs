use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kontor_core::{DomainResult, RecordId};

/// Cost object identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostObjectId(pub RecordId);

impl CostObjectId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CostObjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Cost object (cost center) master record.
///
/// Looked up by code (`idno`); created on demand when a row policy decides a
/// row needs an allocation that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostObject {
    pub id: CostObjectId,
    /// Search word, e.g. "PROD3".
    pub swd: String,
    /// Code, e.g. "100003".
    pub idno: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl CostObject {
    /// Build a fresh record with a new id and the current timestamp.
    pub fn fresh(swd: impl Into<String>, idno: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CostObjectId::new(RecordId::new()),
            swd: swd.into(),
            idno: idno.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// Store contract for cost objects: lookup by code, create on demand.
///
/// An absent code is not an error; callers check first and branch into
/// creation. Creating a taken code is a conflict.
pub trait CostObjectStore {
    /// The cost object with the given code, if any.
    fn find_by_idno(&self, idno: &str) -> DomainResult<Option<CostObject>>;

    /// Persist a new cost object and return it.
    fn create(&self, swd: &str, idno: &str, description: &str) -> DomainResult<CostObject>;
}
