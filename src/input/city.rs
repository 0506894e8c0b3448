//! Code for reading city reference data from CSV files.
use super::*;
use super::building::read_buildings;
use crate::city::{City, CityID, CityMap};
use crate::units::Energy;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

const CITIES_FILE_NAME: &str = "cities.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct CityRaw {
    id: String,
    latitude: f64,
    daily_consumption: Energy,
}

/// Read cities, along with their building inventories, from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of cities keyed by ID, in the order they appear in the cities file.
pub fn read_cities(model_dir: &Path) -> Result<CityMap> {
    let file_path = model_dir.join(CITIES_FILE_NAME);
    let cities_csv = read_csv(&file_path)?;
    let raw_cities =
        read_cities_from_iter(cities_csv).with_context(|| input_err_msg(&file_path))?;

    let city_ids: IndexSet<CityID> = raw_cities.keys().cloned().collect();
    let mut inventories = read_buildings(model_dir, &city_ids)?;

    raw_cities
        .into_iter()
        .map(|(id, raw)| {
            let buildings = inventories
                .shift_remove(&id)
                .with_context(|| format!("No buildings specified for city {id}"))?;
            let city = City {
                id: id.clone(),
                latitude: raw.latitude,
                daily_consumption: raw.daily_consumption,
                buildings,
            };
            Ok((id, city))
        })
        .collect()
}

/// Check city records and key them by ID
fn read_cities_from_iter<I>(iter: I) -> Result<IndexMap<CityID, CityRaw>>
where
    I: Iterator<Item = CityRaw>,
{
    let mut map = IndexMap::new();
    for city in iter {
        let id = CityID::new(city.id.trim());
        ensure!(!id.as_str().is_empty(), "City ID cannot be empty");
        ensure!(
            (-90.0..=90.0).contains(&city.latitude),
            "Invalid latitude for city {id}: must be between -90 and 90"
        );
        ensure!(
            city.daily_consumption.is_finite() && city.daily_consumption > Energy(0.0),
            "Invalid daily consumption for city {id}: must be a finite number greater than zero"
        );
        ensure!(
            map.insert(id.clone(), city).is_none(),
            "Duplicate city ID found: {id}"
        );
    }

    Ok(map)
}
