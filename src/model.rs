//! The model: global parameters plus the reference data for every city.
use crate::city::{City, CityMap, get_city};
use anyhow::Result;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Path to the model directory
    pub model_path: PathBuf,
    /// Global constants shared by all cities
    pub parameters: ModelParameters,
    /// Cities to simulate, in the order they appear in the input file
    pub cities: CityMap,
}

impl Model {
    /// Iterate over the model's cities
    pub fn iter_cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    /// Look up a city by ID
    pub fn get_city(&self, id: &str) -> Result<&City> {
        get_city(&self.cities, id)
    }
}
