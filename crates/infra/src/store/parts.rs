use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use kontor_core::{DomainError, DomainResult, RecordId};
use kontor_parts::{NewProduct, Part, PartId, PartStore, Product, SelectionCriteria};

/// In-memory part master.
///
/// Assigns product codes from a counter, keeps a search-word index, and
/// answers selections in code order.
#[derive(Debug)]
pub struct InMemoryParts {
    inner: RwLock<PartsInner>,
}

#[derive(Debug)]
struct PartsInner {
    parts: HashMap<PartId, Part>,
    by_swd: HashMap<String, PartId>,
    next_idno: u32,
}

impl Default for InMemoryParts {
    fn default() -> Self {
        Self {
            inner: RwLock::new(PartsInner {
                parts: HashMap::new(),
                by_swd: HashMap::new(),
                next_idno: 10001,
            }),
        }
    }
}

impl InMemoryParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully built part (non-product kinds included). Search
    /// words are unique across all part kinds.
    pub fn insert(&self, part: Part) -> DomainResult<()> {
        let mut inner = self.write()?;
        if inner.by_swd.contains_key(part.swd()) {
            return Err(DomainError::conflict(format!(
                "part '{}' already exists",
                part.swd()
            )));
        }
        inner.by_swd.insert(part.swd().to_string(), part.id());
        inner.parts.insert(part.id(), part);
        Ok(())
    }

    pub fn count(&self) -> DomainResult<usize> {
        Ok(self.read()?.parts.len())
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, PartsInner>> {
        self.inner
            .read()
            .map_err(|_| DomainError::conflict("lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, PartsInner>> {
        self.inner
            .write()
            .map_err(|_| DomainError::conflict("lock poisoned"))
    }
}

impl PartStore for InMemoryParts {
    fn part(&self, id: PartId) -> DomainResult<Option<Part>> {
        Ok(self.read()?.parts.get(&id).cloned())
    }

    fn find_product_by_swd(&self, swd: &str) -> DomainResult<Option<Product>> {
        let inner = self.read()?;
        Ok(inner
            .by_swd
            .get(swd)
            .and_then(|id| inner.parts.get(id))
            .and_then(|part| part.as_product())
            .cloned())
    }

    fn create_product(&self, draft: NewProduct) -> DomainResult<Product> {
        let mut inner = self.write()?;
        if inner.by_swd.contains_key(&draft.swd) {
            return Err(DomainError::conflict(format!(
                "part '{}' already exists",
                draft.swd
            )));
        }
        let idno = inner.next_idno;
        let mut product = Product::new(
            PartId::new(RecordId::new()),
            draft.swd,
            idno.to_string(),
            draft.description,
            draft.procurement,
        )?
        .with_product_list(draft.product_list);
        if let Some(price) = draft.sales_price {
            product = product.with_sales_price(price);
        }
        inner.next_idno += 1;
        inner.by_swd.insert(product.swd().to_string(), product.id());
        inner
            .parts
            .insert(product.id(), Part::Product(product.clone()));
        tracing::debug!(swd = product.swd(), idno = product.idno(), "product created");
        Ok(product)
    }

    fn select_products(&self, criteria: &SelectionCriteria) -> DomainResult<Vec<Product>> {
        let inner = self.read()?;
        let mut hits: Vec<Product> = inner
            .parts
            .values()
            .filter_map(Part::as_product)
            .filter(|product| criteria.matches(product))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.idno().cmp(b.idno()));
        Ok(hits)
    }
}
