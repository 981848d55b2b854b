use kontor_accounting::CostObjectId;
use kontor_core::{DomainError, DomainResult};
use kontor_parts::PartId;

use crate::document::{DocumentKind, ItemRow};

/// Mutable view of one row, tagged with the owning document's kind.
///
/// Callers that receive a `SalesRowMut` can read any variant, but writing a
/// cost object is only legal on invoice and packing-slip rows. Handing an
/// informational-kind row to the mutation path is a caller bug and fails
/// fast as a contract violation instead of silently writing.
#[derive(Debug)]
pub enum SalesRowMut<'a> {
    Quotation(&'a mut ItemRow),
    SalesOrder(&'a mut ItemRow),
    Invoice(&'a mut ItemRow),
    PackingSlip(&'a mut ItemRow),
}

impl<'a> SalesRowMut<'a> {
    pub fn new(kind: DocumentKind, row: &'a mut ItemRow) -> Self {
        match kind {
            DocumentKind::Quotation => SalesRowMut::Quotation(row),
            DocumentKind::SalesOrder => SalesRowMut::SalesOrder(row),
            DocumentKind::Invoice => SalesRowMut::Invoice(row),
            DocumentKind::PackingSlip => SalesRowMut::PackingSlip(row),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            SalesRowMut::Quotation(_) => DocumentKind::Quotation,
            SalesRowMut::SalesOrder(_) => DocumentKind::SalesOrder,
            SalesRowMut::Invoice(_) => DocumentKind::Invoice,
            SalesRowMut::PackingSlip(_) => DocumentKind::PackingSlip,
        }
    }

    pub fn row(&self) -> &ItemRow {
        match self {
            SalesRowMut::Quotation(row)
            | SalesRowMut::SalesOrder(row)
            | SalesRowMut::Invoice(row)
            | SalesRowMut::PackingSlip(row) => row,
        }
    }

    pub fn row_no(&self) -> u32 {
        self.row().row_no()
    }

    pub fn part(&self) -> PartId {
        self.row().part()
    }

    pub fn cost_object(&self) -> Option<CostObjectId> {
        self.row().cost_object()
    }

    /// Write the cost object. Only invoice and packing-slip rows accept this.
    pub fn assign_cost_object(&mut self, cost_object: CostObjectId) -> DomainResult<()> {
        match self {
            SalesRowMut::Invoice(row) | SalesRowMut::PackingSlip(row) => {
                row.set_cost_object(Some(cost_object));
                Ok(())
            }
            informational => Err(DomainError::contract(format!(
                "cost objects are assigned on invoice and packing slip rows, not on a {} row",
                informational.kind()
            ))),
        }
    }
}
