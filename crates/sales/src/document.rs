use chrono::{DateTime, Utc};
use kontor_core::{DomainError, DomainResult, RecordId};
use kontor_accounting::CostObjectId;
use kontor_parts::PartId;
use serde::{Deserialize, Serialize};

use crate::row::SalesRowMut;

/// Typed identifier for a sales document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub RecordId);

impl DocumentId {
    pub fn new() -> Self {
        Self(RecordId::new())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four sales document kinds sharing the common row layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quotation,
    SalesOrder,
    Invoice,
    PackingSlip,
}

impl DocumentKind {
    /// Kinds whose rows accept cost-object assignment. Quotation and
    /// sales-order rows only ever receive informational messages.
    pub fn allows_allocation(self) -> bool {
        matches!(self, DocumentKind::Invoice | DocumentKind::PackingSlip)
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "quotation",
            DocumentKind::SalesOrder => "sales order",
            DocumentKind::Invoice => "invoice",
            DocumentKind::PackingSlip => "packing slip",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Edit state of a document. Rows are mutable only while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    Open,
    Committed,
}

/// One line item of a sales document. Row numbers are 1-based, matching
/// how operators and log lines refer to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    row_no: u32,
    part: PartId,
    quantity: i64,
    /// Unit price in the smallest currency unit.
    unit_price: u64,
    cost_object: Option<CostObjectId>,
}

impl ItemRow {
    fn new(row_no: u32, part: PartId, quantity: i64, unit_price: u64) -> Self {
        Self {
            row_no,
            part,
            quantity,
            unit_price,
            cost_object: None,
        }
    }

    pub fn row_no(&self) -> u32 {
        self.row_no
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn cost_object(&self) -> Option<CostObjectId> {
        self.cost_object
    }

    pub fn set_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("row quantity must be positive"));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Operator-entered allocation. Row automation writes through
    /// [`crate::row::SalesRowMut::assign_cost_object`] instead, which
    /// enforces the document-kind rules.
    pub fn set_cost_object(&mut self, cost_object: Option<CostObjectId>) {
        self.cost_object = cost_object;
    }
}

/// A sales document: a kind, an edit state, and the rows it carries.
///
/// Chain progression (`release`, `invoice`, `deliver`) produces a fresh open
/// successor that copies the rows and remembers its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesDocument {
    id: DocumentId,
    kind: DocumentKind,
    state: DocumentState,
    address: Option<String>,
    predecessor: Option<DocumentId>,
    rows: Vec<ItemRow>,
    created_at: DateTime<Utc>,
}

impl SalesDocument {
    /// Open a new, empty document of the given kind.
    pub fn open(kind: DocumentKind) -> Self {
        Self {
            id: DocumentId::new(),
            kind,
            state: DocumentState::Open,
            address: None,
            predecessor: None,
            rows: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn successor_of(&self, kind: DocumentKind) -> Self {
        Self {
            id: DocumentId::new(),
            kind,
            state: DocumentState::Open,
            address: self.address.clone(),
            predecessor: Some(self.id),
            rows: self.rows.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn predecessor(&self) -> Option<DocumentId> {
        self.predecessor
    }

    pub fn rows(&self) -> &[ItemRow] {
        &self.rows
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_open(&self) -> bool {
        self.state == DocumentState::Open
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if !self.is_open() {
            return Err(DomainError::invariant(format!(
                "rows of a committed {} are frozen",
                self.kind
            )));
        }
        Ok(())
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> DomainResult<()> {
        self.ensure_open()?;
        self.address = Some(address.into());
        Ok(())
    }

    /// Append a row and return its 1-based row number.
    pub fn append_row(&mut self, part: PartId, quantity: i64, unit_price: u64) -> DomainResult<u32> {
        self.ensure_open()?;
        if quantity <= 0 {
            return Err(DomainError::validation("row quantity must be positive"));
        }
        let row_no = self.rows.len() as u32 + 1;
        self.rows.push(ItemRow::new(row_no, part, quantity, unit_price));
        Ok(row_no)
    }

    pub fn rows_mut(&mut self) -> DomainResult<&mut [ItemRow]> {
        self.ensure_open()?;
        Ok(&mut self.rows)
    }

    /// Kind-tagged mutable views over the rows, in row order. This is the
    /// surface row automation runs against.
    pub fn automation_rows(&mut self) -> DomainResult<impl Iterator<Item = SalesRowMut<'_>>> {
        self.ensure_open()?;
        let kind = self.kind;
        Ok(self.rows.iter_mut().map(move |row| SalesRowMut::new(kind, row)))
    }

    /// Freeze the document. Rows and header stay readable but reject edits.
    pub fn commit(&mut self) -> DomainResult<()> {
        if self.state == DocumentState::Committed {
            return Err(DomainError::invariant(format!(
                "{} is already committed",
                self.kind
            )));
        }
        self.state = DocumentState::Committed;
        Ok(())
    }

    fn ensure_advances_from(&self, expected: DocumentKind) -> DomainResult<()> {
        if self.kind != expected {
            return Err(DomainError::invariant(format!(
                "only a {} advances this way (got {})",
                expected, self.kind
            )));
        }
        if self.state != DocumentState::Committed {
            return Err(DomainError::invariant(format!(
                "only committed documents advance the sales chain ({} is still open)",
                self.kind
            )));
        }
        Ok(())
    }

    /// Release a committed quotation into an open sales order.
    pub fn release(&self) -> DomainResult<SalesDocument> {
        self.ensure_advances_from(DocumentKind::Quotation)?;
        Ok(self.successor_of(DocumentKind::SalesOrder))
    }

    /// Raise an open invoice from a committed sales order.
    pub fn invoice(&self) -> DomainResult<SalesDocument> {
        self.ensure_advances_from(DocumentKind::SalesOrder)?;
        Ok(self.successor_of(DocumentKind::Invoice))
    }

    /// Raise an open packing slip from a committed sales order.
    pub fn deliver(&self) -> DomainResult<SalesDocument> {
        self.ensure_advances_from(DocumentKind::SalesOrder)?;
        Ok(self.successor_of(DocumentKind::PackingSlip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part() -> PartId {
        PartId(RecordId::new())
    }

    #[test]
    fn appended_rows_are_numbered_from_one() {
        let mut quotation = SalesDocument::open(DocumentKind::Quotation);
        let first = quotation.append_row(part(), 5, 1999).unwrap();
        let second = quotation.append_row(part(), 1, 450).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(quotation.rows().len(), 2);
        assert_eq!(quotation.rows()[1].row_no(), 2);
    }

    #[test]
    fn append_rejects_non_positive_quantity() {
        let mut order = SalesDocument::open(DocumentKind::SalesOrder);
        let err = order.append_row(part(), 0, 100).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn committed_document_rejects_row_edits() {
        let mut invoice = SalesDocument::open(DocumentKind::Invoice);
        invoice.append_row(part(), 2, 300).unwrap();
        invoice.commit().unwrap();
        assert!(invoice.append_row(part(), 1, 100).is_err());
        assert!(invoice.rows_mut().is_err());
        assert!(invoice.set_address("Pier 4").is_err());
    }

    #[test]
    fn commit_is_not_repeatable() {
        let mut quotation = SalesDocument::open(DocumentKind::Quotation);
        quotation.commit().unwrap();
        assert!(quotation.commit().is_err());
    }

    #[test]
    fn release_carries_rows_and_lineage() {
        let mut quotation = SalesDocument::open(DocumentKind::Quotation);
        quotation.set_address("Dockside 12").unwrap();
        quotation.append_row(part(), 12, 2500).unwrap();
        quotation.commit().unwrap();

        let order = quotation.release().unwrap();
        assert_eq!(order.kind(), DocumentKind::SalesOrder);
        assert!(order.is_open());
        assert_eq!(order.predecessor(), Some(quotation.id()));
        assert_eq!(order.address(), Some("Dockside 12"));
        assert_eq!(order.rows(), quotation.rows());
        assert_ne!(order.id(), quotation.id());
    }

    #[test]
    fn open_quotation_cannot_be_released() {
        let quotation = SalesDocument::open(DocumentKind::Quotation);
        assert!(quotation.release().is_err());
    }

    #[test]
    fn only_a_sales_order_raises_invoices_and_packing_slips() {
        let mut quotation = SalesDocument::open(DocumentKind::Quotation);
        quotation.commit().unwrap();
        assert!(quotation.invoice().is_err());
        assert!(quotation.deliver().is_err());

        let mut order = quotation.release().unwrap();
        order.commit().unwrap();
        assert_eq!(order.invoice().unwrap().kind(), DocumentKind::Invoice);
        assert_eq!(order.deliver().unwrap().kind(), DocumentKind::PackingSlip);
    }

    #[test]
    fn quantity_edits_go_through_open_rows() {
        let mut order = SalesDocument::open(DocumentKind::SalesOrder);
        order.append_row(part(), 1, 700).unwrap();
        order.rows_mut().unwrap()[0].set_quantity(12).unwrap();
        assert_eq!(order.rows()[0].quantity(), 12);
        assert!(order.rows_mut().unwrap()[0].set_quantity(-3).is_err());
    }

    #[test]
    fn allocation_is_reserved_for_invoice_and_packing_slip() {
        assert!(!DocumentKind::Quotation.allows_allocation());
        assert!(!DocumentKind::SalesOrder.allows_allocation());
        assert!(DocumentKind::Invoice.allows_allocation());
        assert!(DocumentKind::PackingSlip.allows_allocation());
    }
}
