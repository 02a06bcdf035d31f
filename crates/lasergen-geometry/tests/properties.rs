//! Property tests for arc conversion, chain continuity and approximation.

use lasergen_core::math::wrap;
use lasergen_core::{Vector, TOLERANCES};
use lasergen_geometry::{
    center_to_endpoint, endpoint_to_center, line_segment_approximation, ApproximationSettings,
    ArcConversion, CenterArc, CubicBezier, Curve, Line, LineSegmentChain,
};
use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

fn vector_in(range: std::ops::Range<f64>) -> impl Strategy<Value = Vector> {
    (range.clone(), range).prop_map(|(x, y)| Vector::new(x, y))
}

fn sweep_strategy() -> impl Strategy<Value = f64> {
    (0.05f64..TAU - 0.05, any::<bool>())
        .prop_filter("sweep too close to a half turn", |(s, _)| (s - PI).abs() > 0.05)
        .prop_map(|(s, positive)| if positive { s } else { -s })
}

fn center_arc_strategy() -> impl Strategy<Value = CenterArc> {
    (
        vector_in(-100.0..100.0),
        vector_in(1.0..100.0),
        -PI..PI,
        -PI + 0.05..PI - 0.05,
        sweep_strategy(),
    )
        .prop_map(|(center, radii, rotation, start_angle, sweep_angle)| CenterArc {
            center,
            radii,
            rotation,
            start_angle,
            sweep_angle,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn arc_parameterization_round_trip(arc in center_arc_strategy()) {
        let endpoint = center_to_endpoint(&arc);
        let back = match endpoint_to_center(&endpoint).unwrap() {
            ArcConversion::Arc(back) => back,
            ArcConversion::Line => panic!("arc collapsed to a line"),
        };

        let scale = 1.0 + arc.radii.x.max(arc.radii.y);
        let tol = TOLERANCES.operation * scale;
        prop_assert!(back.center.distance_to(arc.center) < tol, "center {} vs {}", back.center, arc.center);
        prop_assert!((back.radii - arc.radii).magnitude() < tol);
        prop_assert!(wrap(back.start_angle - arc.start_angle, -PI, PI).abs() < 1e-6);
        prop_assert!((back.sweep_angle - arc.sweep_angle).abs() < 1e-6);
    }

    #[test]
    fn chain_append_keeps_continuity(
        points in prop::collection::vec(vector_in(-100.0..100.0), 2..30),
        jitter in vector_in(-3e-4..3e-4),
    ) {
        let mut chain = LineSegmentChain::new();
        for pair in points.windows(2) {
            chain.append(Line::new(pair[0] + jitter, pair[1])).unwrap();
        }
        let segments = chain.as_slice();
        for pair in segments.windows(2) {
            prop_assert!(pair[0].end.distance_to(pair[1].start) < TOLERANCES.input);
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn approximation_respects_error_cap(
        p0 in vector_in(-50.0..50.0),
        p1 in vector_in(-50.0..50.0),
        p2 in vector_in(-50.0..50.0),
        p3 in vector_in(-50.0..50.0),
        cap in 0.01f64..1.0,
    ) {
        let curve = CubicBezier::new(p0, p1, p2, p3);
        let settings = ApproximationSettings::default().with_error_cap(cap);
        let chain = line_segment_approximation(&curve, &settings).unwrap();

        prop_assert!(chain.get(0).unwrap().start.distance_to(curve.start()) < 1e-9);
        prop_assert!(chain.as_slice().last().unwrap().end.distance_to(curve.end()) < 1e-9);

        for i in 0..=400 {
            let p = curve.point(i as f64 / 400.0);
            let nearest = chain
                .iter()
                .map(|segment| segment.distance_to_point(p))
                .fold(f64::INFINITY, f64::min);
            prop_assert!(nearest <= 2.0 * cap, "deviation {} over cap {}", nearest, cap);
        }
    }
}
