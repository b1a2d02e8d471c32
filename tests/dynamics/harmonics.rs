extern crate pretty_env_logger as pel;

use approx::assert_relative_eq;
use geoforce::cosmic::{EGM96_GM, EGM96_RADIUS_KM};
use geoforce::dynamics::{AccelModel, Harmonics};
use geoforce::io::HarmonicCoefficientTable;
use geoforce::linalg::{Matrix3, Vector3};
use geoforce::{DynamicsError, EvalPoint};
use rstest::*;
use std::sync::Arc;
use std::thread;

const C20: f64 = -1.082_626_683_55e-3;

#[fixture]
fn egm96() -> Arc<HarmonicCoefficientTable> {
    let _ = pel::try_init();
    Arc::new(HarmonicCoefficientTable::egm96_subset())
}

#[rstest]
fn j2_on_the_equator() {
    let _ = pel::try_init();
    let j2 = Harmonics::earth(Arc::new(HarmonicCoefficientTable::j2_only(C20)), 2, 0).unwrap();
    let r: f64 = 7000.0;
    let accel = j2.acceleration(&Vector3::new(r, 0.0, 0.0)).unwrap();

    // On the equator, the J2 perturbation is purely radial
    assert_relative_eq!(
        accel.x,
        1.5 * EGM96_GM * EGM96_RADIUS_KM.powi(2) * C20 / r.powi(4),
        max_relative = 1e-9
    );
    assert!(accel.x < 0.0, "oblateness pulls toward the Earth on the equator");
    assert!(accel.y.abs() < 1e-18);
    assert!(accel.z.abs() < 1e-18);

    // The perturbation is symmetric about the equator
    let north = j2.acceleration(&Vector3::new(5000.0, 1000.0, 3000.0)).unwrap();
    let south = j2.acceleration(&Vector3::new(5000.0, 1000.0, -3000.0)).unwrap();
    assert_relative_eq!(north.x, south.x, max_relative = 1e-12);
    assert_relative_eq!(north.y, south.y, max_relative = 1e-12);
    assert_relative_eq!(north.z, -south.z, max_relative = 1e-12);
}

#[rstest]
fn decays_toward_two_body(egm96: Arc<HarmonicCoefficientTable>) {
    let field = Harmonics::earth(egm96, 24, 5).unwrap();
    let u_hat = Vector3::new(0.6, 0.48, 0.64);

    let mut prev_pert = f64::INFINITY;
    let mut prev_ratio = f64::INFINITY;
    for r in [6_778.0_f64, 7_000.0, 10_000.0, 20_000.0, 42_164.0, 384_400.0] {
        let r_bf = r * u_hat;
        let pert = field.acceleration(&r_bf).unwrap().norm();
        let two_body = EGM96_GM / (r * r);
        let ratio = pert / two_body;
        println!("|r| = {r} km: |a_pert| = {pert:.6e} km/s^2 ({ratio:.3e} of two body)");
        assert!(pert < prev_pert);
        assert!(ratio < prev_ratio);
        prev_pert = pert;
        prev_ratio = ratio;
    }
    // At lunar distances, the Earth is a point mass to within a part in a million
    assert!(prev_ratio < 1e-6);
}

#[rstest]
fn truncation_converges(egm96: Arc<HarmonicCoefficientTable>) {
    let r_bf = Vector3::new(-2_975.3, 5_215.8, 3_844.6);
    let j2 = Harmonics::earth(egm96.clone(), 2, 0)
        .unwrap()
        .acceleration(&r_bf)
        .unwrap();
    let full = Harmonics::earth(egm96.clone(), 24, 5)
        .unwrap()
        .acceleration(&r_bf)
        .unwrap();
    let mid = Harmonics::earth(egm96, 8, 4)
        .unwrap()
        .acceleration(&r_bf)
        .unwrap();

    // J2 dominates: higher order terms change the perturbation by about one part in a thousand
    let high_order = (full - j2).norm();
    assert!(high_order > 0.0);
    assert!(high_order < 1e-2 * j2.norm());
    // Terms past degree 8 are smaller still
    assert!((full - mid).norm() < high_order);
}

#[rstest]
fn total_includes_central_body(egm96: Arc<HarmonicCoefficientTable>) {
    let field = Harmonics::earth(egm96, 10, 5).unwrap();
    let r_bf = Vector3::new(4_000.0, -3_000.0, 5_000.0);
    let total = field.total_acceleration(&r_bf).unwrap();
    let pert = field.acceleration(&r_bf).unwrap();
    let central = -EGM96_GM / r_bf.norm().powi(3) * r_bf;
    assert_relative_eq!((total - pert - central).norm(), 0.0, epsilon = 1e-15);
}

#[rstest]
fn rotated_into_the_body_fixed_frame(egm96: Arc<HarmonicCoefficientTable>) {
    let field = Harmonics::earth(egm96, 6, 5).unwrap();
    let r_inertial = Vector3::new(7_000.0, 0.0, 1_000.0);
    // Earth fixed frame rotated by 30 degrees about the pole
    let (sin_t, cos_t) = 30.0_f64.to_radians().sin_cos();
    let dcm = Matrix3::new(cos_t, -sin_t, 0.0, sin_t, cos_t, 0.0, 0.0, 0.0, 1.0);
    let r_bf = Vector3::new(7_000.0 * cos_t, -7_000.0 * sin_t, 1_000.0);

    let point = EvalPoint::builder()
        .position(r_inertial)
        .body_fixed_dcm(dcm)
        .build();
    assert!((point.body_fixed_position().unwrap() - r_bf).norm() < 1e-9);

    let accel = field.eom(&point).unwrap();
    let accel_bf = field.acceleration(&r_bf).unwrap();
    assert!((accel - dcm * accel_bf).norm() < 1e-12 * accel_bf.norm());
    assert_relative_eq!(accel.norm(), accel_bf.norm(), max_relative = 1e-12);
    // Returned in the frame of the position, not the Earth fixed one
    assert!((accel - accel_bf).norm() > 1e-3 * accel_bf.norm());

    let no_dcm = EvalPoint::builder().position(r_inertial).build();
    assert_eq!(
        field.eom(&no_dcm).unwrap(),
        field.acceleration(&r_inertial).unwrap()
    );

    let skewed = EvalPoint::builder()
        .position(r_inertial)
        .body_fixed_dcm(dcm * 1.01)
        .build();
    assert!(matches!(
        field.eom(&skewed),
        Err(DynamicsError::InvalidParameter {
            param: "body_fixed_dcm",
            ..
        })
    ));
}

#[rstest]
fn polar_axis(egm96: Arc<HarmonicCoefficientTable>) {
    let field = Harmonics::earth(egm96, 4, 4).unwrap();
    assert!(matches!(
        field.acceleration(&Vector3::new(0.0, 0.0, 7_000.0)),
        Err(DynamicsError::DegenerateGeometry { .. })
    ));
    // Slightly off axis is fine
    assert!(field
        .acceleration(&Vector3::new(1e-3, 0.0, 7_000.0))
        .unwrap()
        .iter()
        .all(|a| a.is_finite()));
}

#[rstest]
fn shared_between_threads(egm96: Arc<HarmonicCoefficientTable>) {
    let field = Arc::new(Harmonics::earth(egm96, 20, 5).unwrap());
    let r_bf = Vector3::new(6_900.0, 300.0, -400.0);
    let expected = field.acceleration(&r_bf).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let field = field.clone();
            thread::spawn(move || field.acceleration(&r_bf).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
