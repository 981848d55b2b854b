//! Demo runner: seeds the in-memory stores, optionally imports a product
//! catalog from an XML file given as the first argument, builds a sales
//! chain, runs the row automation over the invoice, and prints the
//! diagnostic lines, the validation report, and a selection listing.

use std::io::Write;
use std::path::Path;

use kontor_automation::{
    AllocationDraw, CostAllocationPolicy, EditorAction, RandomDraw, RunContext, SeededDraw,
    run_screen_validation,
};
use kontor_core::{Diagnostics, RecordId};
use kontor_infra::store::{InMemoryCostObjects, InMemoryParts};
use kontor_infra::{import_products_from_path, testdata};
use kontor_parts::{
    NewProduct, Part, PartId, PartStore, ProcurementMode, SelectionCriteria, SupplementaryItem,
};

fn main() -> anyhow::Result<()> {
    kontor_observability::init();

    let parts = InMemoryParts::new();
    let cost_objects = InMemoryCostObjects::new();
    let seeded = testdata::seed_standard_cost_objects(&cost_objects)?;
    tracing::info!(count = seeded.len(), "seeded standard cost objects");

    if let Some(path) = std::env::args().nth(1) {
        let report = import_products_from_path(Path::new(&path), &parts)?;
        let mut stdout = std::io::stdout().lock();
        report.write_log_to(&mut stdout)?;
        writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    }

    let mut products = testdata::create_perf_products(&parts, 3)?;
    let mut valve = NewProduct::named("VALVE", "externally procured valve");
    valve.procurement = ProcurementMode::ExternalProcurement;
    valve.sales_price = Some(12500);
    products.push(parts.create_product(valve)?);

    let freight = Part::SupplementaryItem(SupplementaryItem::new(
        PartId::new(RecordId::new()),
        "FREIGHT",
        "freight surcharge",
    ));
    parts.insert(freight.clone())?;

    let chain = testdata::demo_chain(&products, 6)?;
    let mut invoice = chain.invoice;
    invoice.append_row(freight.id(), 1, 900)?;
    tracing::info!(
        quotation = %chain.quotation.id(),
        order = %chain.order.id(),
        invoice = %invoice.id(),
        "sales chain ready"
    );

    let mut random = RandomDraw;
    let mut seeded_draw;
    let draw: &mut dyn AllocationDraw = match std::env::var("KONTOR_SEED").ok() {
        Some(raw) => {
            let seed = raw.parse().unwrap_or_else(|_| {
                tracing::warn!("KONTOR_SEED is not a number; using 0");
                0
            });
            seeded_draw = SeededDraw::new(seed);
            &mut seeded_draw
        }
        None => &mut random,
    };

    let policy = CostAllocationPolicy::new()?;
    let mut diagnostics = Diagnostics::new();
    let mut ctx = RunContext::new(&parts, &cost_objects, draw, &mut diagnostics);
    let report = run_screen_validation(&policy, &mut invoice, EditorAction::Edit, &mut ctx)?;

    let mut stdout = std::io::stdout().lock();
    diagnostics.write_to(&mut stdout)?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;

    let criteria_raw = std::env::var("KONTOR_SELECTION")
        .unwrap_or_else(|_| "nummer=10001!10003;@autostart=(Yes)".to_string());
    let criteria = SelectionCriteria::parse(&criteria_raw)?;
    for product in parts.select_products(&criteria)? {
        writeln!(
            stdout,
            "{}  {}  {}",
            product.idno(),
            product.swd(),
            product.description()
        )?;
    }

    Ok(())
}
