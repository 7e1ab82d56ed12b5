//! FILENAME: core/aggregation-tree/benches/tree_queries.rs
//! Query latency with and without memoized aggregates.

use aggregation_tree::{AggregationTree, LabelOrdering, Row};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const NATIONS: [&str; 8] = [
    "france", "germany", "italy", "spain", "portugal", "austria", "greece", "poland",
];
const EYES: [&str; 4] = ["blue", "brown", "dark", "green"];
const HAIR: [&str; 5] = ["black", "blonde", "brown", "red", "grey"];

fn build_tree(rows: usize) -> AggregationTree<i64, i64> {
    let mut tree = AggregationTree::new(
        |values: &[i64]| values.iter().sum::<i64>(),
        LabelOrdering::new(["nation", "eyes", "hair"]).unwrap(),
    );
    let data: Vec<Row<i64>> = (0..rows)
        .map(|i| {
            Row::with_value(i as i64)
                .with_label("nation", NATIONS[i % NATIONS.len()])
                .with_label("eyes", EYES[(i / 3) % EYES.len()])
                .with_label("hair", HAIR[(i / 7) % HAIR.len()])
        })
        .collect();
    tree.load(data).unwrap();
    tree
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for rows in [1_000usize, 50_000] {
        let mut cold = build_tree(rows);
        group.bench_with_input(BenchmarkId::new("uncached_total", rows), &rows, |b, _| {
            b.iter(|| black_box(cold.get::<&str>(&[]).unwrap()))
        });

        let mut warm = build_tree(rows);
        warm.set_caching(true);
        group.bench_with_input(BenchmarkId::new("cached_total", rows), &rows, |b, _| {
            b.iter(|| black_box(warm.get::<&str>(&[]).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("cached_nation", rows), &rows, |b, _| {
            b.iter(|| black_box(warm.get(&["germany"]).unwrap()))
        });
    }

    group.finish();
}

fn bench_insert_then_query(c: &mut Criterion) {
    let mut tree = build_tree(10_000);
    tree.set_caching(true);
    let mut i = 0i64;

    c.bench_function("insert_then_cached_total", |b| {
        b.iter(|| {
            i += 1;
            tree.insert(
                Row::with_value(i)
                    .with_label("nation", "france")
                    .with_label("eyes", "blue")
                    .with_label("hair", "black"),
            )
            .unwrap();
            black_box(tree.get::<&str>(&[]).unwrap())
        })
    });
}

criterion_group!(benches, bench_queries, bench_insert_then_query);
criterion_main!(benches);
