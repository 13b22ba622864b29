use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ftth_map_editor::app::tools::classify;
use ftth_map_editor::{AnchorIndex, Feature, NetworkType, PlannerOptions};
use glam::DVec2;
use std::hint::black_box;

fn build_synthetic_features(count: usize) -> Vec<Feature> {
    let types = [
        NetworkType::Fat,
        NetworkType::Odc,
        NetworkType::TerminalClosure,
        NetworkType::HandHole,
    ];
    let sources = ["fat-layer", "odc-layer", "tc-layer", "hh-layer"];

    (0..count)
        .map(|index| {
            let column = (index % 100) as f64;
            let row = (index / 100) as f64;
            let position = DVec2::new(
                106.75 + column * 0.0005 + row * 0.0000013,
                -6.25 + row * 0.0005 + column * 0.0000017,
            );
            Feature::point(
                index as u64 + 1,
                sources[index % sources.len()],
                types[index % types.len()],
                position,
            )
        })
        .collect()
}

fn query_ring() -> Vec<DVec2> {
    vec![
        DVec2::new(106.76, -6.24),
        DVec2::new(106.78, -6.24),
        DVec2::new(106.78, -6.22),
        DVec2::new(106.76, -6.22),
    ]
}

fn bench_polygon_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_classify");
    let options = PlannerOptions::default();
    let ring = query_ring();

    for &count in &[1_000usize, 10_000usize, 50_000usize] {
        let features = build_synthetic_features(count);

        group.bench_with_input(
            BenchmarkId::new("classify", count),
            &features,
            |b, features| {
                b.iter(|| {
                    let selection = classify(black_box(&ring), black_box(features), &options);
                    black_box(selection.total_count())
                })
            },
        );
    }

    group.finish();
}

fn bench_anchor_snapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor_snapping");

    for &count in &[10_000usize, 50_000usize] {
        let features = build_synthetic_features(count);
        let index: AnchorIndex = AnchorIndex::from_features(features.iter());
        let queries: Vec<DVec2> = (0..1024)
            .map(|i| {
                DVec2::new(
                    106.75 + ((i * 13) % 100) as f64 * 0.0005 + 0.00003,
                    -6.25 + ((i * 7) % 100) as f64 * 0.0005 + 0.00004,
                )
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("nearest_within_batch", count),
            &index,
            |b, index| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for query in &queries {
                        if index.nearest_within(black_box(*query), 11.0).is_some() {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_polygon_classify, bench_anchor_snapping);
criterion_main!(benches);
