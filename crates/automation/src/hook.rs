//! Screen-validation hook: applies a per-row automation when a document
//! edit view is validated, skipping read-only editor actions.

use kontor_core::{DomainResult, SessionId};
use kontor_sales::{DocumentId, DocumentKind, SalesDocument, SalesRowMut};
use serde::{Deserialize, Serialize};

use crate::policy::{CostAllocationPolicy, RowOutcome, RunContext};

/// Editor actions as the host reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorAction {
    New,
    Edit,
    View,
    Delete,
}

impl EditorAction {
    /// Validation runs only for actions that can change the document.
    pub fn triggers_validation(self) -> bool {
        !matches!(self, EditorAction::View | EditorAction::Delete)
    }
}

/// Per-row automation applied by the screen-validation runner.
pub trait RowAutomation {
    fn apply(&self, row: &mut SalesRowMut<'_>, ctx: &mut RunContext<'_>)
    -> DomainResult<RowOutcome>;
}

impl RowAutomation for CostAllocationPolicy {
    fn apply(
        &self,
        row: &mut SalesRowMut<'_>,
        ctx: &mut RunContext<'_>,
    ) -> DomainResult<RowOutcome> {
        self.allocate_row(row, ctx)
    }
}

/// Decision taken for one row during a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub row_no: u32,
    pub outcome: RowOutcome,
}

/// Outcome of one screen-validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Correlates the report with the pass's log lines.
    pub session: SessionId,
    pub action: EditorAction,
    pub document: DocumentId,
    pub kind: DocumentKind,
    pub rows: Vec<RowReport>,
}

impl ValidationReport {
    /// True when the action was read-only and no row was visited.
    pub fn skipped(&self) -> bool {
        !self.action.triggers_validation()
    }
}

/// Walk the document's rows with `automation` unless `action` is read-only.
pub fn run_screen_validation(
    automation: &dyn RowAutomation,
    document: &mut SalesDocument,
    action: EditorAction,
    ctx: &mut RunContext<'_>,
) -> DomainResult<ValidationReport> {
    let mut report = ValidationReport {
        session: SessionId::new(),
        action,
        document: document.id(),
        kind: document.kind(),
        rows: Vec::new(),
    };
    if !action.triggers_validation() {
        tracing::debug!(
            session = %report.session,
            ?action,
            document = %report.document,
            "screen validation skipped"
        );
        return Ok(report);
    }
    for mut row in document.automation_rows()? {
        let row_no = row.row_no();
        let outcome = automation.apply(&mut row, ctx)?;
        report.rows.push(RowReport { row_no, outcome });
    }
    tracing::debug!(
        session = %report.session,
        document = %report.document,
        rows = report.rows.len(),
        "screen validation finished"
    );
    Ok(report)
}
