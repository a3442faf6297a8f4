use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_draw_editor::core::{simplify_polygon, SimplifyOptions};
use geo_draw_editor::{
    EditorSession, Feature, FeatureCollection, FeatureProperties, Geometry, ModeKind, RenderType,
};
use glam::DVec2;
use std::hint::black_box;

/// Geschlossener, leicht verrauschter Kreis-Ring wie aus einer Freihand-Geste.
fn build_noisy_ring(vertex_count: usize) -> Vec<DVec2> {
    let mut ring: Vec<DVec2> = (0..vertex_count)
        .map(|i| {
            let angle = i as f64 / vertex_count as f64 * std::f64::consts::TAU;
            let radius = 0.01 + ((i * 7) % 5) as f64 * 1e-6;
            DVec2::new(8.5 + radius * angle.cos(), 47.3 + radius * angle.sin())
        })
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

fn build_squares(count: usize) -> FeatureCollection {
    FeatureCollection::from_features((0..count).map(|i| {
        let origin = DVec2::new(8.0 + (i % 100) as f64 * 0.02, 47.0 + (i / 100) as f64 * 0.02);
        Feature::new(
            Geometry::polygon(vec![
                origin,
                origin + DVec2::new(0.0, 0.01),
                origin + DVec2::new(0.01, 0.01),
                origin + DVec2::new(0.01, 0.0),
                origin,
            ]),
            FeatureProperties::with_render_type(RenderType::Polygon),
        )
    }))
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify_polygon");
    let options = SimplifyOptions::default();

    for &vertex_count in &[500usize, 5_000usize] {
        let ring = build_noisy_ring(vertex_count);
        group.bench_with_input(
            BenchmarkId::new("noisy_ring", vertex_count),
            &ring,
            |b, ring| {
                b.iter(|| {
                    let reduced = simplify_polygon(black_box(ring), 14.0, 100, &options);
                    black_box(reduced.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_translate_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_drag");

    for &feature_count in &[100usize, 1_000usize] {
        let data = build_squares(feature_count);
        group.bench_with_input(
            BenchmarkId::new("select_all", feature_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut session = EditorSession::default();
                    session.set_mode(ModeKind::Translate, serde_json::Value::Null);
                    session.set_data(data.clone());
                    session.select(0..data.len());
                    let from = DVec2::new(8.005, 47.005);
                    session.pointer_move_to(from);
                    session.pointer_down(from);
                    session.pointer_move_to(DVec2::new(8.01, 47.01));
                    session.pointer_up(DVec2::new(8.02, 47.02));
                    black_box(session.action_log().len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(core_benches, bench_simplify, bench_translate_drag);
criterion_main!(core_benches);
