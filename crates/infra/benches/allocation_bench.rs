use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use kontor_automation::{CostAllocationPolicy, RunContext, SeededDraw};
use kontor_core::Diagnostics;
use kontor_infra::store::{InMemoryCostObjects, InMemoryParts};
use kontor_infra::testdata;
use kontor_sales::SalesDocument;

fn setup(rows: usize) -> (InMemoryParts, InMemoryCostObjects, SalesDocument) {
    let parts = InMemoryParts::new();
    let cost_objects = InMemoryCostObjects::new();
    testdata::seed_standard_cost_objects(&cost_objects).unwrap();
    let products = testdata::create_perf_products(&parts, 10).unwrap();
    let chain = testdata::demo_chain(&products, rows).unwrap();
    (parts, cost_objects, chain.invoice)
}

fn bench_allocation_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_pass");

    for rows in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("invoice_rows", rows), &rows, |b, &rows| {
            let (parts, cost_objects, invoice) = setup(rows);
            let policy = CostAllocationPolicy::new().unwrap();

            b.iter(|| {
                let mut invoice = invoice.clone();
                let mut draw = SeededDraw::new(99);
                let mut diagnostics = Diagnostics::new();
                let mut ctx =
                    RunContext::new(&parts, &cost_objects, &mut draw, &mut diagnostics);
                black_box(policy.allocate_document(&mut invoice, &mut ctx).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_row_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_walk");

    for rows in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("tagged_views", rows), &rows, |b, &rows| {
            let (_, _, invoice) = setup(rows);

            b.iter(|| {
                let mut invoice = invoice.clone();
                let mut sum = 0u64;
                for view in invoice.automation_rows().unwrap() {
                    sum += u64::from(view.row_no());
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_allocation_pass, bench_row_walk);
criterion_main!(benches);
