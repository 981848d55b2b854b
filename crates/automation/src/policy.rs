//! The row cost-allocation policy.

use kontor_accounting::CostObjectStore;
use kontor_core::{Diagnostics, DomainError, DomainResult};
use kontor_parts::{Part, PartStore, ProcurementMode, Product};
use kontor_sales::{SalesDocument, SalesRowMut, schema};
use serde::Serialize;

use crate::draw::AllocationDraw;

/// The draw selects among three branches: reuse, create, skip.
const ALLOCATION_BRANCHES: u32 = 3;

/// Collaborators one policy run works against.
///
/// Bundles the stores, the draw source, and the diagnostics sink so call
/// sites hand over one context instead of four loose references.
pub struct RunContext<'a> {
    pub parts: &'a dyn PartStore,
    pub cost_objects: &'a dyn CostObjectStore,
    pub draw: &'a mut dyn AllocationDraw,
    pub diagnostics: &'a mut Diagnostics,
}

impl<'a> RunContext<'a> {
    pub fn new(
        parts: &'a dyn PartStore,
        cost_objects: &'a dyn CostObjectStore,
        draw: &'a mut dyn AllocationDraw,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            parts,
            cost_objects,
            draw,
            diagnostics,
        }
    }
}

/// Codes and texts the policy binds at run time.
///
/// The defaults are the standard installation values; tests and special
/// installations override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyCodes {
    /// Code of the cost object assigned directly on draw 0.
    pub existing_idno: String,
    /// Code of the cost object looked up, and created when absent, on draw 1.
    pub production_idno: String,
    /// Search word given to a draw-1 creation.
    pub production_swd: String,
    /// Description given to a draw-1 creation.
    pub production_description: String,
}

impl Default for PolicyCodes {
    fn default() -> Self {
        Self {
            existing_idno: "100001".into(),
            production_idno: "100003".into(),
            production_swd: "PROD3".into(),
            production_description: "Production cost object".into(),
        }
    }
}

/// What the policy decided for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RowOutcome {
    /// The row already carried an allocation and was left as is.
    AlreadyAllocated,
    /// Draw 0: the pre-existing cost object was assigned.
    AssignedExisting { idno: String },
    /// Draw 1: the production cost object was assigned. `created` says
    /// whether the lookup had to create it first.
    AssignedProduction { idno: String, created: bool },
    /// Draw 2: deliberately left without an allocation.
    LeftUnallocated,
    /// Message emitted, row untouched: informational document kinds,
    /// non-product parts, and procurement modes outside the draw rules.
    Advisory,
    /// Draw 0, but the configured pre-existing code is not on file.
    MissingExisting { idno: String },
    /// The row's part reference did not resolve.
    UnknownPart,
}

/// Classifies sales-document rows and allocates cost objects.
///
/// Quotation and sales-order rows are the informational path: the policy
/// tells the operator what would happen but never writes. Invoice and
/// packing-slip rows are the mutation path: products made in house get one
/// uniform draw deciding between reusing the standard cost object, creating
/// or reusing the production cost object, and assigning nothing.
#[derive(Debug, Clone)]
pub struct CostAllocationPolicy {
    codes: PolicyCodes,
}

impl CostAllocationPolicy {
    /// Policy with the standard codes. Verifies once that the four row
    /// schemas agree on the cost-object field before any write can happen.
    pub fn new() -> DomainResult<Self> {
        Self::with_codes(PolicyCodes::default())
    }

    pub fn with_codes(codes: PolicyCodes) -> DomainResult<Self> {
        schema::ensure_aligned()?;
        Ok(Self { codes })
    }

    pub fn codes(&self) -> &PolicyCodes {
        &self.codes
    }

    /// Apply the policy to every row of `document`, in row order.
    pub fn allocate_document(
        &self,
        document: &mut SalesDocument,
        ctx: &mut RunContext<'_>,
    ) -> DomainResult<Vec<RowOutcome>> {
        let mut outcomes = Vec::with_capacity(document.rows().len());
        for mut row in document.automation_rows()? {
            outcomes.push(self.allocate_row(&mut row, ctx)?);
        }
        Ok(outcomes)
    }

    /// Apply the policy to one row.
    pub fn allocate_row(
        &self,
        row: &mut SalesRowMut<'_>,
        ctx: &mut RunContext<'_>,
    ) -> DomainResult<RowOutcome> {
        let row_no = row.row_no();
        let Some(part) = ctx.parts.part(row.part())? else {
            ctx.diagnostics
                .line(format!("row {row_no}: part not on file, skipped"));
            return Ok(RowOutcome::UnknownPart);
        };

        match &part {
            Part::Product(product) => self.allocate_product_row(row, product, ctx),
            Part::SupplementaryItem(item) => {
                if row.cost_object().is_some() {
                    ctx.diagnostics.line(format!(
                        "row {row_no} ({}): use existing cost center",
                        item.swd()
                    ));
                    Ok(RowOutcome::AlreadyAllocated)
                } else {
                    ctx.diagnostics.line(format!(
                        "row {row_no} ({}): create and use new cost center",
                        item.swd()
                    ));
                    Ok(RowOutcome::Advisory)
                }
            }
            Part::Other(other) => {
                ctx.diagnostics.line(format!(
                    "row {row_no} ({}): other cost center",
                    other.swd()
                ));
                Ok(RowOutcome::Advisory)
            }
        }
    }

    fn allocate_product_row(
        &self,
        row: &mut SalesRowMut<'_>,
        product: &Product,
        ctx: &mut RunContext<'_>,
    ) -> DomainResult<RowOutcome> {
        let row_no = row.row_no();
        let swd = product.swd();
        let mutation_path = row.kind().allows_allocation();

        if row.cost_object().is_some() {
            if !mutation_path {
                ctx.diagnostics
                    .line(format!("row {row_no} ({swd}): use existing cost center"));
            }
            return Ok(RowOutcome::AlreadyAllocated);
        }

        match (mutation_path, product.procurement()) {
            (true, ProcurementMode::InhouseProduction) => self.draw_allocation(row, swd, ctx),
            (false, ProcurementMode::InhouseProduction) => {
                ctx.diagnostics
                    .line(format!("row {row_no} ({swd}): create and use new cost center"));
                Ok(RowOutcome::Advisory)
            }
            (_, ProcurementMode::ExternalProcurement | ProcurementMode::Other) => {
                ctx.diagnostics
                    .line(format!("row {row_no} ({swd}): other cost center"));
                Ok(RowOutcome::Advisory)
            }
        }
    }

    fn draw_allocation(
        &self,
        row: &mut SalesRowMut<'_>,
        swd: &str,
        ctx: &mut RunContext<'_>,
    ) -> DomainResult<RowOutcome> {
        let row_no = row.row_no();
        match ctx.draw.draw(ALLOCATION_BRANCHES) {
            0 => match ctx.cost_objects.find_by_idno(&self.codes.existing_idno)? {
                Some(existing) => {
                    row.assign_cost_object(existing.id)?;
                    ctx.diagnostics
                        .line(format!("row {row_no} ({swd}): use existing cost center"));
                    tracing::debug!(row = row_no, idno = %existing.idno, "assigned existing cost object");
                    Ok(RowOutcome::AssignedExisting {
                        idno: existing.idno,
                    })
                }
                None => {
                    ctx.diagnostics.line(format!(
                        "row {row_no} ({swd}): cost center {} not on file, row left untouched",
                        self.codes.existing_idno
                    ));
                    Ok(RowOutcome::MissingExisting {
                        idno: self.codes.existing_idno.clone(),
                    })
                }
            },
            1 => {
                ctx.diagnostics
                    .line(format!("row {row_no} ({swd}): create and use new cost center"));
                let (target, created) =
                    match ctx.cost_objects.find_by_idno(&self.codes.production_idno)? {
                        Some(existing) => (existing, false),
                        None => {
                            let fresh = ctx.cost_objects.create(
                                &self.codes.production_swd,
                                &self.codes.production_idno,
                                &self.codes.production_description,
                            )?;
                            tracing::debug!(idno = %fresh.idno, "created production cost object");
                            (fresh, true)
                        }
                    };
                row.assign_cost_object(target.id)?;
                Ok(RowOutcome::AssignedProduction {
                    idno: target.idno,
                    created,
                })
            }
            2 => {
                ctx.diagnostics
                    .line(format!("row {row_no} ({swd}): no cost center assigned"));
                Ok(RowOutcome::LeftUnallocated)
            }
            out_of_range => Err(DomainError::contract(format!(
                "allocation draw out of range: {out_of_range}"
            ))),
        }
    }
}
