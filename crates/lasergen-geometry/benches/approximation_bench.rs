use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lasergen_core::Vector;
use lasergen_geometry::{
    line_segment_approximation, ApproximationSettings, CubicBezier, EllipticalArc,
};
use std::f64::consts::TAU;

fn bench_cubic(c: &mut Criterion) {
    let curve = CubicBezier::new(
        Vector::new(0.0, 0.0),
        Vector::new(20.0, 80.0),
        Vector::new(80.0, -40.0),
        Vector::new(100.0, 30.0),
    );
    let settings = ApproximationSettings::default();
    c.bench_function("approximate_cubic", |b| {
        b.iter(|| line_segment_approximation(black_box(&curve), &settings))
    });
}

fn bench_full_ellipse(c: &mut Criterion) {
    let arc = EllipticalArc::new(Vector::new(50.0, 50.0), Vector::new(40.0, 20.0), 0.3, 0.0, TAU);
    let settings = ApproximationSettings::default();
    c.bench_function("approximate_full_ellipse", |b| {
        b.iter(|| line_segment_approximation(black_box(&arc), &settings))
    });
}

criterion_group!(benches, bench_cubic, bench_full_ellipse);
criterion_main!(benches);
