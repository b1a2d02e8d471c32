extern crate pretty_env_logger as pel;

use crate::test_data;
use geoforce::cosmic::Bodies;
use geoforce::io::{
    ConfigError, ConfigRepr, Configurable, DensityCoefficientTable, DensityTableRepr,
    ForceModelsConfig, HeliumTable, SpaceWeather, TableSource,
};
use geoforce::ForceModels;
use rstest::*;

#[rstest]
fn force_models_from_yaml() {
    let _ = pel::try_init();
    let cfg = ForceModelsConfig::load(test_data("force_models.yaml")).unwrap();
    assert_eq!(cfg.harmonics.as_ref().unwrap().degree, 5);
    assert!(!cfg.harmonics.as_ref().unwrap().normalized);
    assert_eq!(
        cfg.drag.as_ref().unwrap().density,
        TableSource::File("tests/data/jacchia71_gill_standard.yaml".to_string())
    );

    let models = ForceModels::from_yaml(test_data("force_models.yaml")).unwrap();
    println!("{models}");
    assert_eq!(models.models().len(), 4);
    assert_eq!(models.gravity.as_ref().unwrap().order(), 5);
    assert_eq!(models.drag.as_ref().unwrap().config().mass_kg, 250.0);
    assert_eq!(
        models.third_body.as_ref().unwrap().bodies(),
        &[Bodies::Sun, Bodies::Moon]
    );
    assert_eq!(models.srp.as_ref().unwrap().params().reflectivity, 0.3);

    // The gravity field was loaded from a file, whose path is not kept
    assert!(models.to_config().is_err());
}

#[rstest]
fn density_table_round_trip() {
    let _ = pel::try_init();
    let repr = DensityTableRepr::load(test_data("jacchia71_gill_standard.yaml")).unwrap();
    assert_eq!(repr.bands.len(), 8);
    let table = DensityCoefficientTable::from_config(repr.clone()).unwrap();
    assert_eq!(table.to_config().unwrap(), repr);

    let helium = HeliumTable::gill1996();
    let helium_repr = helium.to_config().unwrap();
    assert_eq!(helium_repr.bands.len(), 3);
    assert_eq!(HeliumTable::from_config(helium_repr).unwrap(), helium);
}

#[rstest]
fn invalid_density_tables() {
    let _ = pel::try_init();
    let row = "[0.0, 0.0, 0.0, 0.0, 0.0]";
    let matrix = format!("[{row}, {row}, {row}, {row}, {row}, {row}]");

    let overlapping = format!(
        "bands:\n  - altitude_km: [90.0, 500.0]\n    coefficients: {matrix}\n  - altitude_km: [400.0, 1000.0]\n    coefficients: {matrix}\n"
    );
    assert!(matches!(
        DensityCoefficientTable::from_config(DensityTableRepr::loads(&overlapping).unwrap()),
        Err(ConfigError::InvalidConfig { .. })
    ));

    let short = format!("bands:\n  - altitude_km: [90.0, 500.0]\n    coefficients: [{row}, {row}]\n");
    assert!(matches!(
        DensityCoefficientTable::from_config(DensityTableRepr::loads(&short).unwrap()),
        Err(ConfigError::InvalidConfig { .. })
    ));

    let empty_interval =
        format!("bands:\n  - altitude_km: [500.0, 90.0]\n    coefficients: {matrix}\n");
    assert!(DensityCoefficientTable::from_config(DensityTableRepr::loads(&empty_interval).unwrap())
        .is_err());

    // Helium is only selected by altitude
    let with_temperature = format!(
        "bands:\n  - altitude_km: [90.0, 500.0]\n    temperature_k: [0.0, 850.0]\n    coefficients: {matrix}\n"
    );
    assert!(HeliumTable::from_config(DensityTableRepr::loads(&with_temperature).unwrap()).is_err());

    assert!(matches!(
        DensityTableRepr::loads("bands: 12"),
        Err(ConfigError::ParseError { .. })
    ));
}

#[rstest]
fn named_space_weather() {
    let _ = pel::try_init();
    let named = SpaceWeather::load_named(test_data("space_weather.yaml")).unwrap();
    assert_eq!(named.len(), 3);
    for (name, sw) in &named {
        assert!(sw.validate().is_ok(), "{name} is invalid");
    }
    assert_eq!(named["storm"].kp, 8.0);
}
