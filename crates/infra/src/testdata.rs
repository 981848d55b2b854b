//! Builders seeding the in-memory stores for demos, tests, and benches.

use kontor_accounting::{CostObject, CostObjectStore};
use kontor_core::{DomainError, DomainResult};
use kontor_parts::{NewProduct, PartStore, Product};
use kontor_sales::{DocumentKind, SalesDocument};

/// Cost objects a fresh installation carries. The allocation policy expects
/// code 100001 to exist; 100003 is deliberately absent so the policy's
/// create-on-demand branch stays reachable.
pub fn seed_standard_cost_objects(store: &dyn CostObjectStore) -> DomainResult<Vec<CostObject>> {
    let mut seeded = Vec::new();
    for (swd, idno, description) in [
        ("ADMIN", "100001", "General administration"),
        ("SALES", "100002", "Sales overhead"),
    ] {
        if store.find_by_idno(idno)?.is_none() {
            seeded.push(store.create(swd, idno, description)?);
        }
    }
    Ok(seeded)
}

/// Create `count` numbered performance-test products (AJOPERF1, AJOPERF2,
/// ...), all made in house so every allocation branch applies.
pub fn create_perf_products(store: &dyn PartStore, count: usize) -> DomainResult<Vec<Product>> {
    let mut created = Vec::with_capacity(count);
    for i in 1..=count {
        created.push(store.create_product(NewProduct::named(
            format!("AJOPERF{i}"),
            format!("performance test product {i}"),
        ))?);
    }
    Ok(created)
}

/// A quotation released into a sales order and invoiced, as the demo and
/// the benches use it. Quotation and order are committed; the invoice is
/// still open so row automation can run on it.
#[derive(Debug, Clone)]
pub struct DemoChain {
    pub quotation: SalesDocument,
    pub order: SalesDocument,
    pub invoice: SalesDocument,
}

/// Build a demo chain whose documents carry `rows` rows cycling through
/// `products`.
pub fn demo_chain(products: &[Product], rows: usize) -> DomainResult<DemoChain> {
    if products.is_empty() {
        return Err(DomainError::validation(
            "demo chain needs at least one product",
        ));
    }

    let mut quotation = SalesDocument::open(DocumentKind::Quotation);
    quotation.set_address("Warehouse gate 3, Hallstadt")?;
    for i in 0..rows {
        let product = &products[i % products.len()];
        let price = product.sales_price().unwrap_or(2500);
        quotation.append_row(product.id(), (i as i64 % 5) + 1, price)?;
    }
    quotation.commit()?;

    let mut order = quotation.release()?;
    if let Some(first) = order.rows_mut()?.first_mut() {
        first.set_quantity(12)?;
    }
    order.commit()?;

    let invoice = order.invoice()?;
    Ok(DemoChain {
        quotation,
        order,
        invoice,
    })
}
