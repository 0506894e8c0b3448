//! Aggregating the solar energy that a city's rooftops could produce in a day.
use crate::city::{BuildingStock, BuildingTypeID, City};
use crate::model::{Model, ModelParameters};
use crate::units::{Energy, Hours, Irradiance};
use anyhow::Result;
use indexmap::IndexMap;

/// Daily solar production for a city, broken down by building type
#[derive(Debug, Clone, PartialEq)]
pub struct CityProduction {
    /// Total energy produced per day across all building types (Wh)
    pub total: Energy,
    /// Energy produced per day by each building type (Wh), in inventory order
    pub contributions: IndexMap<BuildingTypeID, Energy>,
}

/// Calculate the daily energy produced by panels on one type of building.
///
/// Both the building type's roof coverage and the global rooftop suitability are applied to the
/// floor area.
pub fn building_energy(
    stock: &BuildingStock,
    parameters: &ModelParameters,
    irradiance: Irradiance,
    sun_hours: Hours,
) -> Energy {
    stock.usable_area()
        * parameters.rooftop_suitability
        * irradiance
        * parameters.panel_efficiency
        * sun_hours
        * parameters.system_loss_factor
}

/// Calculate the daily energy produced across all of a city's building types.
///
/// The total is the sum of the per-type contributions, taken in inventory order.
pub fn city_production(
    city: &City,
    parameters: &ModelParameters,
    irradiance: Irradiance,
    sun_hours: Hours,
) -> CityProduction {
    let contributions: IndexMap<_, _> = city
        .buildings
        .iter()
        .map(|(building_type, stock)| {
            let energy = building_energy(stock, parameters, irradiance, sun_hours);
            (building_type.clone(), energy)
        })
        .collect();
    let total = contributions.values().copied().sum();

    CityProduction {
        total,
        contributions,
    }
}

/// Calculate the daily energy produced by the named city's rooftops.
///
/// # Arguments
///
/// * `model` - The model containing the city's reference data
/// * `city_id` - The city to calculate production for
/// * `irradiance` - Effective solar irradiance
/// * `sun_hours` - Effective hours of full sunlight per day
///
/// # Returns
///
/// The city's total production and its breakdown by building type, or an error if the city is
/// unknown.
pub fn total_energy(
    model: &Model,
    city_id: &str,
    irradiance: Irradiance,
    sun_hours: Hours,
) -> Result<CityProduction> {
    let city = model.get_city(city_id)?;
    Ok(city_production(city, &model.parameters, irradiance, sun_hours))
}
