//! Fixtures for tests

use crate::city::{BuildingInventory, BuildingStock, City, CityMap};
use crate::model::{Model, ModelParameters};
use crate::units::{Area, Dimensionless, Energy};
use indexmap::indexmap;
use rstest::fixture;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Create a [`BuildingStock`] from plain numbers
fn stock(average_area: f64, count: u32, roof_coverage: f64) -> BuildingStock {
    BuildingStock {
        average_area: Area(average_area),
        count,
        roof_coverage: Dimensionless(roof_coverage),
    }
}

#[fixture]
pub fn dallas_buildings() -> BuildingInventory {
    indexmap! {
        "Residential".into() => stock(600.0, 250_000, 0.60),
        "Commercial".into() => stock(2200.0, 45_000, 0.65),
        "Gas Stations".into() => stock(280.0, 15_000, 0.80),
        "Parking Garages".into() => stock(950.0, 7_500, 0.88),
    }
}

#[fixture]
pub fn dallas(dallas_buildings: BuildingInventory) -> City {
    City {
        id: "Dallas".into(),
        latitude: 32.78,
        daily_consumption: Energy(44_000_000_000.0),
        buildings: dallas_buildings,
    }
}

/// A city south of the default latitude threshold
#[fixture]
pub fn miami() -> City {
    City {
        id: "Miami".into(),
        latitude: 25.76,
        daily_consumption: Energy(10_000_000_000.0),
        buildings: indexmap! {
            "Residential".into() => stock(400.0, 100_000, 0.5),
        },
    }
}

#[fixture]
pub fn cities(dallas: City, miami: City) -> CityMap {
    [dallas, miami]
        .into_iter()
        .map(|city| (city.id.clone(), city))
        .collect()
}

#[fixture]
pub fn model(cities: CityMap) -> Model {
    Model {
        model_path: PathBuf::from("model"),
        parameters: ModelParameters::default(),
        cities,
    }
}
