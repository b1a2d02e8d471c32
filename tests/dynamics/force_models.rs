extern crate pretty_env_logger as pel;

use crate::test_data;
use geoforce::dynamics::AtmosphereContext;
use geoforce::io::{Configurable, SpaceWeather};
use geoforce::linalg::{Matrix3, Vector3};
use geoforce::{DynamicsError, EvalPoint, ForceModels};
use rstest::*;

#[fixture]
fn suite() -> ForceModels {
    let _ = pel::try_init();
    ForceModels::from_yaml(test_data("force_models.yaml")).unwrap()
}

/// A LEO spacecraft on a circular orbit of 400 km, at `angle_deg` along the equator
fn leo_point(angle_deg: f64) -> EvalPoint {
    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    let r = 6_778.0;
    let v = 7.6686;
    EvalPoint::builder()
        .position(Vector3::new(r * cos_a, r * sin_a, 0.0))
        .velocity(Vector3::new(-v * sin_a, v * cos_a, 0.0))
        .sun(Vector3::new(1.4e8, 4.0e7, 1.7e7))
        .moon(Vector3::new(-2.1e5, 3.0e5, 1.2e5))
        .atmosphere(AtmosphereContext {
            sat_ra_deg: angle_deg,
            sun_ra_deg: 16.0,
            sun_dec_deg: 6.5,
            latitude_deg: 0.0,
            altitude_km: 400.0,
            jd: 2_460_000.5,
        })
        .space_weather(SpaceWeather::new(150.0, 140.0, 3.0).unwrap())
        .build()
}

#[rstest]
fn full_suite(suite: ForceModels) {
    let pert = suite.evaluate(&leo_point(30.0)).unwrap();
    println!("{pert}");

    assert_eq!(pert.total, pert.gravity + pert.drag + pert.third_body + pert.srp);
    // Ordering of the perturbations in LEO
    assert!(pert.gravity.norm() > pert.drag.norm());
    assert!(pert.drag.norm() > pert.third_body.norm());
    assert!(pert.third_body.norm() > pert.srp.norm());
    assert!(pert.srp.norm() > 0.0);

    // Drag opposes the motion
    let point = leo_point(30.0);
    assert!(pert.drag.dot(&point.velocity.unwrap()) < 0.0);
}

#[rstest]
fn total_in_a_rotated_frame(suite: ForceModels) {
    let point = leo_point(30.0);
    let pert = suite.evaluate(&point).unwrap();

    // Same geometry, expressed in a frame rotated by 40 degrees about the pole from the Earth fixed frame
    let (sin_t, cos_t) = 40.0_f64.to_radians().sin_cos();
    let dcm = Matrix3::new(cos_t, -sin_t, 0.0, sin_t, cos_t, 0.0, 0.0, 0.0, 1.0);
    let rotated = EvalPoint {
        position: dcm * point.position,
        velocity: point.velocity.map(|v| dcm * v),
        sun: point.sun.map(|r| dcm * r),
        moon: point.moon.map(|r| dcm * r),
        body_fixed_dcm: Some(dcm),
        ..point
    };
    let rotated_pert = suite.evaluate(&rotated).unwrap();

    for (name, actual, expected) in [
        ("gravity", rotated_pert.gravity, dcm * pert.gravity),
        ("drag", rotated_pert.drag, dcm * pert.drag),
        ("third body", rotated_pert.third_body, dcm * pert.third_body),
        ("srp", rotated_pert.srp, dcm * pert.srp),
        ("total", rotated_pert.total, dcm * pert.total),
    ] {
        assert!(
            (actual - expected).norm() < 1e-9 * expected.norm(),
            "{name}: {actual} vs {expected}"
        );
    }
}

#[rstest]
fn many_points_in_order(suite: ForceModels) {
    let points: Vec<EvalPoint> = (0..360).map(|deg| leo_point(deg as f64)).collect();
    let results = suite.evaluate_many(&points);
    assert_eq!(results.len(), points.len());
    for (point, result) in points.iter().zip(results) {
        assert_eq!(result.unwrap(), suite.evaluate(point).unwrap());
    }
}

#[rstest]
fn failures_stay_with_their_point(suite: ForceModels) {
    let mut points: Vec<EvalPoint> = (0..10).map(|deg| leo_point(10.0 * deg as f64)).collect();
    points[3].velocity = None;
    points[7].atmosphere = Some(AtmosphereContext {
        altitude_km: 3_000.0,
        ..points[7].atmosphere.unwrap()
    });

    let results = suite.evaluate_many(&points);
    for (i, result) in results.iter().enumerate() {
        match i {
            3 => assert!(matches!(
                result,
                Err(DynamicsError::InvalidParameter {
                    param: "velocity",
                    ..
                })
            )),
            7 => assert!(matches!(result, Err(DynamicsError::TableLookup { .. }))),
            _ => assert!(result.is_ok()),
        }
    }
}

#[rstest]
fn disabled_models_contribute_nothing(suite: ForceModels) {
    let gravity_only = ForceModels {
        gravity: suite.gravity.clone(),
        ..Default::default()
    };
    // Gravity needs none of the optional inputs
    let point = EvalPoint::builder()
        .position(Vector3::new(6_778.0, 0.0, 100.0))
        .build();
    let pert = gravity_only.evaluate(&point).unwrap();
    assert_eq!(pert.total, pert.gravity);
    assert_eq!(pert.drag, Vector3::zeros());
    assert_eq!(pert.third_body, Vector3::zeros());
    assert_eq!(pert.srp, Vector3::zeros());

    // But the full suite needs all of them
    assert!(suite.evaluate(&point).is_err());
}
