//! Cities are the unit of analysis: each has a known electricity demand and a stock of buildings
//! whose roofs could carry solar panels.
use crate::id::define_id_type;
use crate::units::{Area, Dimensionless, Energy};
use anyhow::{Context, Result};
use indexmap::IndexMap;

define_id_type! {CityID}
define_id_type! {BuildingTypeID}

/// A map of [`City`]s, keyed by city ID
pub type CityMap = IndexMap<CityID, City>;

/// The building stock of a city, keyed by building type (e.g. "Residential").
///
/// Insertion order is the order in which building types appear in the input file, which fixes the
/// order in which contributions are summed.
pub type BuildingInventory = IndexMap<BuildingTypeID, BuildingStock>;

/// A city together with the reference data needed to estimate its rooftop solar potential.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    /// A unique identifier for the city (e.g. "Dallas")
    pub id: CityID,
    /// Reference latitude in degrees, used to pick the number of sun-hours
    pub latitude: f64,
    /// Average electricity demand per day (Wh)
    pub daily_consumption: Energy,
    /// The buildings whose roofs are available for panels
    pub buildings: BuildingInventory,
}

/// The buildings of one type within a city.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingStock {
    /// Average roof footprint of a single building (m²)
    pub average_area: Area,
    /// Number of buildings of this type
    pub count: u32,
    /// Fraction of the footprint covered by roof suitable for panels, in (0, 1]
    pub roof_coverage: Dimensionless,
}

impl BuildingStock {
    /// Total roof area of this building type available for panels, before the global suitability
    /// fraction is applied.
    pub fn usable_area(&self) -> Area {
        self.average_area * Dimensionless(f64::from(self.count)) * self.roof_coverage
    }
}

/// Look up a city by its ID, failing if it is not present.
pub fn get_city<'a>(cities: &'a CityMap, id: &str) -> Result<&'a City> {
    cities
        .get(id)
        .with_context(|| format!("Unknown city: {id}"))
}
