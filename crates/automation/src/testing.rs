//! In-crate store doubles for unit tests. The production in-memory stores
//! live in `kontor-infra`, which depends on this crate.

use std::collections::HashMap;
use std::sync::RwLock;

use kontor_accounting::{CostObject, CostObjectStore};
use kontor_core::{DomainError, DomainResult, RecordId};
use kontor_parts::{
    NewProduct, OtherPart, Part, PartId, PartStore, ProcurementMode, Product, SelectionCriteria,
    SupplementaryItem,
};

#[derive(Default)]
pub(crate) struct StubParts {
    parts: RwLock<HashMap<PartId, Part>>,
}

impl StubParts {
    pub(crate) fn with(parts: impl IntoIterator<Item = Part>) -> Self {
        let map = parts.into_iter().map(|p| (p.id(), p)).collect();
        Self {
            parts: RwLock::new(map),
        }
    }
}

impl PartStore for StubParts {
    fn part(&self, id: PartId) -> DomainResult<Option<Part>> {
        Ok(self.parts.read().unwrap().get(&id).cloned())
    }

    fn find_product_by_swd(&self, swd: &str) -> DomainResult<Option<Product>> {
        Ok(self
            .parts
            .read()
            .unwrap()
            .values()
            .find_map(|p| p.as_product().filter(|prod| prod.swd() == swd).cloned()))
    }

    fn create_product(&self, draft: NewProduct) -> DomainResult<Product> {
        let mut parts = self.parts.write().unwrap();
        let idno = format!("9{:04}", parts.len() + 1);
        let mut product = Product::new(
            PartId::new(RecordId::new()),
            draft.swd,
            idno,
            draft.description,
            draft.procurement,
        )?
        .with_product_list(draft.product_list);
        if let Some(price) = draft.sales_price {
            product = product.with_sales_price(price);
        }
        parts.insert(product.id(), Part::Product(product.clone()));
        Ok(product)
    }

    fn select_products(&self, criteria: &SelectionCriteria) -> DomainResult<Vec<Product>> {
        Ok(self
            .parts
            .read()
            .unwrap()
            .values()
            .filter_map(Part::as_product)
            .filter(|p| criteria.matches(p))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct StubCostObjects {
    objects: RwLock<HashMap<String, CostObject>>,
}

impl StubCostObjects {
    pub(crate) fn with(objects: impl IntoIterator<Item = CostObject>) -> Self {
        let map = objects
            .into_iter()
            .map(|co| (co.idno.clone(), co))
            .collect();
        Self {
            objects: RwLock::new(map),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    pub(crate) fn get(&self, idno: &str) -> Option<CostObject> {
        self.objects.read().unwrap().get(idno).cloned()
    }
}

impl CostObjectStore for StubCostObjects {
    fn find_by_idno(&self, idno: &str) -> DomainResult<Option<CostObject>> {
        Ok(self.objects.read().unwrap().get(idno).cloned())
    }

    fn create(&self, swd: &str, idno: &str, description: &str) -> DomainResult<CostObject> {
        let mut objects = self.objects.write().unwrap();
        if objects.contains_key(idno) {
            return Err(DomainError::conflict(format!(
                "cost object {idno} already exists"
            )));
        }
        let created = CostObject::fresh(swd, idno, description);
        objects.insert(idno.to_string(), created.clone());
        Ok(created)
    }
}

pub(crate) fn product(swd: &str, procurement: ProcurementMode) -> Product {
    Product::new(
        PartId::new(RecordId::new()),
        swd,
        "400100",
        "test product",
        procurement,
    )
    .unwrap()
}

pub(crate) fn supplementary(swd: &str) -> SupplementaryItem {
    SupplementaryItem::new(PartId::new(RecordId::new()), swd, "supplementary item")
}

pub(crate) fn other_part(swd: &str) -> OtherPart {
    OtherPart::new(PartId::new(RecordId::new()), swd, "other part")
}

pub(crate) fn seeded_cost_object(idno: &str) -> CostObject {
    CostObject::fresh("CC", idno, "seeded cost object")
}
