//! Row schema descriptors and the cross-kind alignment check.
//!
//! Each document kind carries its own generated row schema. The allocation
//! policy writes one logical field on all four, so the descriptor tables
//! below must declare that field identically. `ensure_aligned` verifies this
//! once per process and fails fast on drift.

use std::sync::OnceLock;

use kontor_core::{DomainError, DomainResult};

use crate::document::DocumentKind;

/// Field type tags as the generated schemas declare them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFieldType {
    PartRef,
    AccountRef,
    Quantity,
    Price,
    Date,
    Text,
}

/// One field descriptor of a row schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowField {
    pub name: &'static str,
    pub ty: RowFieldType,
}

/// Name of the cost-object field shared by all four row schemas.
pub const COST_OBJECT_FIELD: &str = "costObject";

const QUOTATION_ROW: &[RowField] = &[
    RowField { name: "part", ty: RowFieldType::PartRef },
    RowField { name: "quantity", ty: RowFieldType::Quantity },
    RowField { name: "unitPrice", ty: RowFieldType::Price },
    RowField { name: "validUntil", ty: RowFieldType::Date },
    RowField { name: "costObject", ty: RowFieldType::AccountRef },
];

const SALES_ORDER_ROW: &[RowField] = &[
    RowField { name: "part", ty: RowFieldType::PartRef },
    RowField { name: "quantity", ty: RowFieldType::Quantity },
    RowField { name: "unitPrice", ty: RowFieldType::Price },
    RowField { name: "deadlineWeek", ty: RowFieldType::Date },
    RowField { name: "costObject", ty: RowFieldType::AccountRef },
];

const INVOICE_ROW: &[RowField] = &[
    RowField { name: "part", ty: RowFieldType::PartRef },
    RowField { name: "quantity", ty: RowFieldType::Quantity },
    RowField { name: "unitPrice", ty: RowFieldType::Price },
    RowField { name: "taxCode", ty: RowFieldType::Text },
    RowField { name: "costObject", ty: RowFieldType::AccountRef },
];

const PACKING_SLIP_ROW: &[RowField] = &[
    RowField { name: "part", ty: RowFieldType::PartRef },
    RowField { name: "quantity", ty: RowFieldType::Quantity },
    RowField { name: "deliveryDate", ty: RowFieldType::Date },
    RowField { name: "costObject", ty: RowFieldType::AccountRef },
];

/// Row schema of the given document kind.
pub fn row_schema(kind: DocumentKind) -> &'static [RowField] {
    match kind {
        DocumentKind::Quotation => QUOTATION_ROW,
        DocumentKind::SalesOrder => SALES_ORDER_ROW,
        DocumentKind::Invoice => INVOICE_ROW,
        DocumentKind::PackingSlip => PACKING_SLIP_ROW,
    }
}

fn cost_object_field(label: &str, table: &[RowField]) -> DomainResult<RowField> {
    table
        .iter()
        .copied()
        .find(|field| field.name == COST_OBJECT_FIELD)
        .ok_or_else(|| {
            DomainError::invariant(format!(
                "{label} row schema has no '{COST_OBJECT_FIELD}' field"
            ))
        })
}

fn alignment_of(tables: &[(&str, &[RowField])]) -> DomainResult<()> {
    let mut reference: Option<(&str, RowField)> = None;
    for &(label, table) in tables {
        let field = cost_object_field(label, table)?;
        match reference {
            None => reference = Some((label, field)),
            Some((ref_label, ref_field)) => {
                if field != ref_field {
                    return Err(DomainError::invariant(format!(
                        "cost-object field drifted: {ref_label} declares {ref_field:?}, {label} declares {field:?}"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn check_alignment() -> DomainResult<()> {
    alignment_of(&[
        ("quotation", QUOTATION_ROW),
        ("sales order", SALES_ORDER_ROW),
        ("invoice", INVOICE_ROW),
        ("packing slip", PACKING_SLIP_ROW),
    ])
}

/// Verify that all four row schemas declare the cost-object field with the
/// same name and type. The result is computed once and cached; callers that
/// mutate rows should run this before their first write.
pub fn ensure_aligned() -> DomainResult<()> {
    static ALIGNED: OnceLock<DomainResult<()>> = OnceLock::new();
    ALIGNED.get_or_init(check_alignment).clone()
}
