//! Performance benchmarks for minimal cut set analysis.
//!
//! Run with: `cargo bench --bench analysis`
//!
//! The interesting axes are tree width (K-of-N enumeration) and depth
//! (alternating AND/OR layers), plus the cache hit path an interactive
//! host leans on between edits.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cutset_kernel::{
    AnalysisCache, AnalysisLimits, CancellationFlag, CutSetAnalyzer, FaultTree,
};

/// K-of-N gate over `n` component leaves.
fn voting_tree(k: usize, n: usize) -> FaultTree {
    let mut builder = FaultTree::builder();
    for i in 0..n {
        builder.component(format!("C{i}"));
    }
    let children: Vec<String> = (0..n).map(|i| format!("C{i}")).collect();
    builder.voting_gate("Vote", k, children).top_event("TOP", "Vote");
    builder.build().unwrap()
}

/// Alternating AND/OR layers, binary fan-out, leaves at the bottom.
fn layered_tree(depth: usize) -> FaultTree {
    let mut builder = FaultTree::builder();

    // Level `depth` holds the leaves; every upper level pairs the nodes of
    // the level below under alternating gate kinds.
    let leaf_count = 1usize << depth;
    for i in 0..leaf_count {
        builder.component(format!("L{i}"));
    }
    let mut below: Vec<String> = (0..leaf_count).map(|i| format!("L{i}")).collect();

    for level in (0..depth).rev() {
        let mut current = Vec::with_capacity(below.len() / 2);
        for (i, pair) in below.chunks(2).enumerate() {
            let name = format!("G{level}_{i}");
            if level % 2 == 0 {
                builder.and_gate(&name, pair.to_vec());
            } else {
                builder.or_gate(&name, pair.to_vec());
            }
            current.push(name);
        }
        below = current;
    }

    builder.top_event("TOP", below[0].clone());
    builder.build().unwrap()
}

fn bench_voting_width(c: &mut Criterion) {
    let analyzer = CutSetAnalyzer::new(AnalysisLimits::new(10_000_000, 10_000_000));
    let mut group = c.benchmark_group("voting_width");

    for n in [6, 9, 12] {
        let tree = voting_tree(n / 2, n);
        group.bench_with_input(BenchmarkId::new("n", n), &tree, |b, tree| {
            b.iter(|| {
                let report = analyzer.determine_minimal_cut_sets(black_box(tree), None);
                assert!(report.status.is_complete());
                report
            })
        });
    }

    group.finish();
}

fn bench_layered_depth(c: &mut Criterion) {
    let analyzer = CutSetAnalyzer::default();
    let mut group = c.benchmark_group("layered_depth");

    for depth in [4, 5, 6] {
        let tree = layered_tree(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &tree, |b, tree| {
            b.iter(|| {
                let report = analyzer.determine_minimal_cut_sets(black_box(tree), None);
                assert!(report.status.is_complete());
                report
            })
        });
    }

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let analyzer = CutSetAnalyzer::default();
    let cache = AnalysisCache::default();
    let cancel = CancellationFlag::new();
    let tree = voting_tree(3, 9);

    // Warm the cache.
    cache.analyze(&analyzer, &tree, None, &cancel);

    c.bench_function("cache_hit", |b| {
        b.iter(|| cache.analyze(&analyzer, black_box(&tree), None, &cancel))
    });
}

criterion_group!(benches, bench_voting_width, bench_layered_depth, bench_cache_hit);
criterion_main!(benches);
