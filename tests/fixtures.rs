#![cfg(feature = "serde")]

use approx::assert_relative_eq;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use stokes_disc::{error::Error, metadata::INCLINATION_KEY, prelude::*};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_json<T: serde::de::DeserializeOwned, P: AsRef<Path>>(path: P) -> T {
    let file = File::open(path).unwrap();
    serde_json::from_reader(BufReader::new(file)).unwrap()
}

fn grid() -> EnergyGrid {
    EnergyGrid::from_edges(vec![1.0, 2.0, 4.0, 8.0]).unwrap()
}

#[test]
fn evaluate_from_json() {
    let params: ModelParams = read_json(fixture_path("params.json"));
    let tables: MemoryTables = read_json(fixture_path("tables.json"));
    assert_eq!(params.zshift, 0.0);

    let mut metadata = MetadataStore::new();
    let evaluation = Model::try_from(params)
        .unwrap()
        .evaluate(
            &grid(),
            &tables,
            &TableConfig::resolve(Some("/nonexistent/")),
            &mut metadata,
        )
        .unwrap();

    assert_eq!(evaluation.mode(), OutputMode::Degree);
    let derived = evaluation.derived().unwrap();
    for ((output, degree), width) in evaluation
        .output()
        .iter()
        .zip(derived.degree())
        .zip(grid().widths())
    {
        assert_relative_eq!(*output, degree * width, max_relative = 1e-12);
        assert!((0.0..=1.0).contains(degree));
    }

    assert_eq!(
        metadata.string(INCLINATION_KEY).as_deref(),
        Some("   60.000000")
    );
}

#[test]
fn out_of_domain_parameter_is_fatal() {
    let params = ModelParams {
        photon_index: 3.5,
        ..read_json(fixture_path("params.json"))
    };
    let tables: MemoryTables = read_json(fixture_path("tables.json"));

    let result = Model::try_from(params).unwrap().evaluate(
        &grid(),
        &tables,
        &TableConfig::default(),
        &mut MetadataStore::new(),
    );
    assert!(matches!(
        result,
        Err(Error::ParameterOutOfRange {
            name: "photon_index",
            ..
        })
    ));
}

#[test]
fn default_params_serialize() {
    let json = serde_json::to_value(ModelParams::default()).unwrap();
    assert_eq!(json["stokes"], 1);
    assert_eq!(json["cos_incl"], 0.775);

    let params: ModelParams = serde_json::from_value(json).unwrap();
    assert_eq!(params, ModelParams::default());
}
