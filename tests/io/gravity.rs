extern crate pretty_env_logger as pel;

use crate::test_data;
use flate2::write::GzEncoder;
use flate2::Compression;
use geoforce::dynamics::Harmonics;
use geoforce::io::{ConfigError, HarmonicCoefficientTable};
use geoforce::linalg::Vector3;
use rstest::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[fixture]
fn cof_path() -> PathBuf {
    let _ = pel::try_init();
    test_data("egm96_5x5_unnormalized.cof")
}

#[rstest]
fn text_file_matches_builtin(cof_path: PathBuf) {
    let from_file = HarmonicCoefficientTable::from_file(&cof_path, 5, 5, false, false).unwrap();
    assert_eq!(from_file.max_degree(), 5);
    assert_eq!(from_file.max_order(), 5);

    let builtin = HarmonicCoefficientTable::egm96_subset();
    for l in 2..=5 {
        assert_eq!(from_file.zonal(l), builtin.zonal(l), "C{l}0");
        for m in 1..=l {
            assert_eq!(from_file.cs_lm(l, m), builtin.cs_lm(l, m), "(C, S){l}{m}");
        }
    }

    let r_bf = Vector3::new(-2_975.3, 5_215.8, 3_844.6);
    let a_file = Harmonics::earth(Arc::new(from_file), 5, 5)
        .unwrap()
        .acceleration(&r_bf)
        .unwrap();
    let a_builtin = Harmonics::earth(Arc::new(builtin), 5, 5)
        .unwrap()
        .acceleration(&r_bf)
        .unwrap();
    assert_eq!(a_file, a_builtin);
}

#[rstest]
fn gzipped_file(cof_path: PathBuf) {
    let contents = fs::read(&cof_path).unwrap();
    let gz_path = std::env::temp_dir().join(format!(
        "geoforce-egm96-5x5-{}.cof.gz",
        std::process::id()
    ));
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path).unwrap(), Compression::default());
    encoder.write_all(&contents).unwrap();
    encoder.finish().unwrap();

    let gunzipped = HarmonicCoefficientTable::from_file(&gz_path, 5, 3, true, false).unwrap();
    let plain = HarmonicCoefficientTable::from_file(&cof_path, 5, 3, false, false).unwrap();
    assert_eq!(gunzipped, plain);
    assert_eq!(gunzipped.max_order(), 3);

    // A plain text file is not a gzip stream
    assert!(matches!(
        HarmonicCoefficientTable::from_file(&cof_path, 5, 3, true, false),
        Err(ConfigError::Gzip { .. })
    ));

    fs::remove_file(&gz_path).unwrap();
}

#[rstest]
fn truncation_and_coverage(cof_path: PathBuf) {
    let j2 = HarmonicCoefficientTable::from_file(&cof_path, 2, 0, false, false).unwrap();
    assert_eq!(j2.max_degree(), 2);
    assert_eq!(j2.max_order(), 0);
    assert_eq!(j2.zonal(2), -1.082_626_683_55e-3);

    // The file stops at degree 5
    assert!(matches!(
        HarmonicCoefficientTable::from_file(&cof_path, 6, 5, false, false),
        Err(ConfigError::InvalidConfig { .. })
    ));
}

#[rstest]
fn normalized_coefficients(cof_path: PathBuf) {
    let raw = HarmonicCoefficientTable::from_file(&cof_path, 3, 3, false, false).unwrap();
    let denormalized = HarmonicCoefficientTable::from_file(&cof_path, 3, 3, false, true).unwrap();
    assert!(denormalized.zonal(2) / raw.zonal(2) > 2.0);
    assert_ne!(raw, denormalized);
}

#[rstest]
fn missing_file() {
    let _ = pel::try_init();
    assert!(matches!(
        HarmonicCoefficientTable::from_file(test_data("JGM3.cof"), 2, 0, false, false),
        Err(ConfigError::ReadError { .. })
    ));
}
