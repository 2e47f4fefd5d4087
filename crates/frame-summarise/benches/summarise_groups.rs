use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use frame_columnar::{GroupedTable, Table, Vector};
use frame_summarise::{summarise, Across, ColumnSelector, Entry, Expr, SummariseOptions};
use std::time::Duration;

fn bench_rows() -> usize {
    std::env::var("FRAME_SUMMARISE_BENCH_ROWS")
        .ok()
        .and_then(|v| v.replace('_', "").parse::<usize>().ok())
        .filter(|&v| (10_000..=5_000_000).contains(&v))
        .unwrap_or(200_000)
}

fn build_table(rows: usize, groups: usize) -> GroupedTable {
    let keys: Vec<i64> = (0..rows).map(|i| (i % groups) as i64).collect();
    let amount: Vec<f64> = (0..rows).map(|i| (i % 100) as f64).collect();
    let quantity: Vec<i64> = (0..rows).map(|i| (i % 7) as i64).collect();
    let table = Table::from_columns([
        ("key", Vector::from(keys)),
        ("amount", Vector::from(amount)),
        ("quantity", Vector::from(quantity)),
    ])
    .unwrap();
    GroupedTable::group_by(table, &["key"]).unwrap()
}

fn bench_summarise_groups(c: &mut Criterion) {
    let rows = bench_rows();
    let entries = vec![
        Entry::named("rows", Expr::call("n", Vec::<Expr>::new())),
        Entry::across(
            Across::new(ColumnSelector::Names(vec![
                "amount".into(),
                "quantity".into(),
            ]))
            .function("sum")
            .function("mean"),
        ),
    ];

    let mut group = c.benchmark_group("summarise_groups");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(rows as u64));

    for groups in [10usize, 1_000, 50_000] {
        let data = build_table(rows, groups);

        group.bench_with_input(BenchmarkId::new("sequential", groups), &groups, |b, _| {
            let options = SummariseOptions::default().sequential().quiet();
            b.iter(|| black_box(summarise(&data, &entries, &options).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("parallel", groups), &groups, |b, _| {
            let options = SummariseOptions::default().quiet();
            b.iter(|| black_box(summarise(&data, &entries, &options).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarise_groups);
criterion_main!(benches);
