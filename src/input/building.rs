//! Code for reading building inventories from a CSV file.
use super::*;
use crate::city::{BuildingInventory, BuildingStock, BuildingTypeID, CityID};
use crate::id::IDCollection;
use crate::units::Area;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

const BUILDINGS_FILE_NAME: &str = "buildings.csv";

/// Building inventories grouped by city
pub type BuildingInventoryMap = IndexMap<CityID, BuildingInventory>;

#[derive(Debug, Deserialize, PartialEq)]
struct BuildingStockRaw {
    city_id: String,
    building_type: String,
    average_area: Area,
    count: u32,
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    roof_coverage: Dimensionless,
}

/// Read building inventories from the buildings CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `city_ids` - All possible city IDs
///
/// # Returns
///
/// Building inventories grouped by city ID. Every city in `city_ids` has an entry.
pub fn read_buildings(
    model_dir: &Path,
    city_ids: &IndexSet<CityID>,
) -> Result<BuildingInventoryMap> {
    let file_path = model_dir.join(BUILDINGS_FILE_NAME);
    let buildings_csv = read_csv(&file_path)?;
    read_buildings_from_iter(buildings_csv, city_ids).with_context(|| input_err_msg(&file_path))
}

/// Group building records by city, checking values and that every city has at least one record
fn read_buildings_from_iter<I>(
    iter: I,
    city_ids: &IndexSet<CityID>,
) -> Result<BuildingInventoryMap>
where
    I: Iterator<Item = BuildingStockRaw>,
{
    let mut map = BuildingInventoryMap::new();
    for raw in iter {
        let city_id = city_ids.get_id_by_str(&raw.city_id)?;
        ensure!(
            raw.average_area.is_finite() && raw.average_area > Area(0.0),
            "Invalid average area for building type {} in city {}: must be greater than zero",
            raw.building_type,
            city_id
        );
        ensure!(
            raw.count > 0,
            "Building count for building type {} in city {} cannot be zero",
            raw.building_type,
            city_id
        );

        let building_type = BuildingTypeID::from(raw.building_type);
        let stock = BuildingStock {
            average_area: raw.average_area,
            count: raw.count,
            roof_coverage: raw.roof_coverage,
        };

        let inventory = map.entry(city_id.clone()).or_default();
        ensure!(
            inventory.insert(building_type.clone(), stock).is_none(),
            "Building type {building_type} specified more than once for city {city_id}"
        );
    }

    for city_id in city_ids {
        ensure!(
            map.contains_key(city_id),
            "No buildings specified for city {city_id}"
        );
    }

    Ok(map)
}
