extern crate pretty_env_logger as pel;

use approx::assert_relative_eq;
use geoforce::cosmic::{Bodies, AU};
use geoforce::dynamics::third_body::third_body_acceleration;
use geoforce::dynamics::{AccelModel, ThirdBody};
use geoforce::linalg::Vector3;
use geoforce::{DynamicsError, EvalPoint};
use rstest::*;

#[fixture]
fn sun_and_moon() -> ThirdBody {
    let _ = pel::try_init();
    ThirdBody::sun_and_moon()
}

#[rstest]
fn tidal_magnitudes(sun_and_moon: ThirdBody) {
    // LEO, with the Sun and the Moon along the x axis
    let r_sat = Vector3::new(7_000.0, 0.0, 0.0);
    let r_sun = Vector3::new(AU, 0.0, 0.0);
    let r_moon = Vector3::new(384_400.0, 0.0, 0.0);

    let sun = third_body_acceleration(&r_sat, &r_sun, Bodies::Sun.gm()).unwrap();
    let moon = third_body_acceleration(&r_sat, &r_moon, Bodies::Moon.gm()).unwrap();
    println!("Sun {sun:e}\nMoon {moon:e}");

    // Tidal approximation: 2 GM r / d^3 along the line to the body
    assert_relative_eq!(
        sun.x,
        2.0 * Bodies::Sun.gm() * 7_000.0 / AU.powi(3),
        max_relative = 1e-3
    );
    assert_relative_eq!(
        moon.x,
        2.0 * Bodies::Moon.gm() * 7_000.0 / 384_400.0_f64.powi(3),
        max_relative = 5e-2
    );
    // The Moon pulls about twice as hard as the Sun
    assert!(moon.norm() > 2.0 * sun.norm());
    assert!(sun.norm() > 4e-10 && sun.norm() < 6e-10);
    assert!(moon.norm() > 1e-9 && moon.norm() < 1.5e-9);

    let total = sun_and_moon.acceleration(&r_sat, &r_sun, &r_moon).unwrap();
    assert_eq!(total, sun + moon);
}

#[rstest]
fn compressed_across_the_line(sun_and_moon: ThirdBody) {
    // Perpendicular to the Moon direction, the tide pulls toward the Earth
    let r_sat = Vector3::new(0.0, 7_000.0, 0.0);
    let r_moon = Vector3::new(384_400.0, 0.0, 0.0);
    let moon_only = ThirdBody::new(&[Bodies::Moon]).unwrap();
    let accel = moon_only
        .acceleration(&r_sat, &Vector3::new(AU, 0.0, 0.0), &r_moon)
        .unwrap();
    assert!(accel.y < 0.0);
    assert_relative_eq!(
        accel.y,
        -Bodies::Moon.gm() * 7_000.0 / 384_400.0_f64.powi(3),
        max_relative = 1e-3
    );
    // Both bodies are included in the default perturbation
    assert_eq!(sun_and_moon.bodies(), &[Bodies::Sun, Bodies::Moon]);
}

#[rstest]
fn from_the_evaluation_point(sun_and_moon: ThirdBody) {
    let r_sat = Vector3::new(-4_512.3, 3_904.8, 3_125.2);
    let r_sun = Vector3::new(1.3e8, -6.1e7, -2.6e7);
    let r_moon = Vector3::new(-320_000.0, 180_000.0, 95_000.0);
    let point = EvalPoint::builder()
        .position(r_sat)
        .sun(r_sun)
        .moon(r_moon)
        .build();
    assert_eq!(
        sun_and_moon.eom(&point).unwrap(),
        sun_and_moon.acceleration(&r_sat, &r_sun, &r_moon).unwrap()
    );

    let no_sun = EvalPoint::builder().position(r_sat).moon(r_moon).build();
    assert!(matches!(
        sun_and_moon.eom(&no_sun),
        Err(DynamicsError::InvalidParameter { param: "sun", .. })
    ));
    // Only the Moon is needed for the lunar perturbation
    let moon_only = ThirdBody::new(&[Bodies::Moon, Bodies::Moon]).unwrap();
    assert_eq!(moon_only.bodies(), &[Bodies::Moon]);
    assert!(moon_only.eom(&no_sun).is_ok());
}
