use std::collections::HashMap;
use std::sync::RwLock;

use kontor_accounting::{CostObject, CostObjectStore};
use kontor_core::{DomainError, DomainResult};

/// In-memory cost-object master, keyed by code.
#[derive(Debug, Default)]
pub struct InMemoryCostObjects {
    by_idno: RwLock<HashMap<String, CostObject>>,
}

impl InMemoryCostObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register pre-built records, replacing any with the same code.
    pub fn seed(&self, objects: impl IntoIterator<Item = CostObject>) -> DomainResult<()> {
        let mut map = self
            .by_idno
            .write()
            .map_err(|_| DomainError::conflict("lock poisoned"))?;
        for object in objects {
            map.insert(object.idno.clone(), object);
        }
        Ok(())
    }

    pub fn count(&self) -> DomainResult<usize> {
        Ok(self
            .by_idno
            .read()
            .map_err(|_| DomainError::conflict("lock poisoned"))?
            .len())
    }
}

impl CostObjectStore for InMemoryCostObjects {
    fn find_by_idno(&self, idno: &str) -> DomainResult<Option<CostObject>> {
        let map = self
            .by_idno
            .read()
            .map_err(|_| DomainError::conflict("lock poisoned"))?;
        Ok(map.get(idno).cloned())
    }

    fn create(&self, swd: &str, idno: &str, description: &str) -> DomainResult<CostObject> {
        let mut map = self
            .by_idno
            .write()
            .map_err(|_| DomainError::conflict("lock poisoned"))?;
        if map.contains_key(idno) {
            return Err(DomainError::conflict(format!(
                "cost object {idno} already exists"
            )));
        }
        let created = CostObject::fresh(swd, idno, description);
        map.insert(idno.to_string(), created.clone());
        tracing::debug!(idno, swd, "cost object created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_find_round_trips() {
        let store = InMemoryCostObjects::new();
        assert!(store.find_by_idno("100003").unwrap().is_none());

        let created = store
            .create("PROD3", "100003", "Production cost object")
            .unwrap();
        let found = store.find_by_idno("100003").unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn creating_a_taken_code_is_a_conflict() {
        let store = InMemoryCostObjects::new();
        store.create("PROD3", "100003", "first").unwrap();
        let err = store.create("OTHER", "100003", "second").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn seed_replaces_records_with_the_same_code() {
        let store = InMemoryCostObjects::new();
        store
            .seed([
                CostObject::fresh("A", "100001", "first"),
                CostObject::fresh("B", "100001", "second"),
            ])
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.find_by_idno("100001").unwrap().unwrap().swd, "B");
    }
}
