//! Functionality for running the simulation.
use crate::city::{City, CityID};
use crate::consumption::{YearlySummary, daily_percentages, seasonal_outputs, yearly_summary};
use crate::irradiance::irradiance;
use crate::model::{Model, ModelParameters};
use crate::output::DataWriter;
use crate::production::{CityProduction, total_energy};
use crate::units::{Dimensionless, Energy, Hours, Irradiance};
use anyhow::Result;
use log::{info, warn};
use std::path::Path;

pub mod cloud_cover;
pub use cloud_cover::{CloudCoverSource, FixedCloudCover, UniformCloudCover};

/// The outcome of simulating a single city
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// The city simulated
    pub city_id: CityID,
    /// The cloud cover used (%)
    pub cloud_cover: f64,
    /// Irradiance resulting from the cloud cover
    pub irradiance: Irradiance,
    /// Sun-hours per day for the city
    pub sun_hours: Hours,
    /// Production on an average day, with its breakdown by building type
    pub production: CityProduction,
    /// Solar output for each day of the year
    pub daily_solar_output: Vec<Energy>,
    /// Percentage of consumption met for each day of the year
    pub daily_percentages: Vec<Dimensionless>,
    /// Totals over the year
    pub yearly: YearlySummary,
}

/// Select the daily sun-hours for a city from its latitude.
///
/// This is a coarse proxy: cities strictly above the latitude threshold get one value, all others
/// get another.
pub fn sun_hours(latitude: f64, parameters: &ModelParameters) -> Hours {
    if latitude > parameters.latitude_threshold {
        parameters.sun_hours_above_threshold
    } else {
        parameters.sun_hours_at_or_below_threshold
    }
}

/// Simulate a single city.
///
/// # Arguments
///
/// * `model` - The model to run
/// * `city_id` - The city to simulate
/// * `source` - Supplies the cloud cover for the city
///
/// # Returns
///
/// The [`SimulationResult`] for the city, or an error if the city is not in the model.
pub fn run_city_simulation<S: CloudCoverSource + ?Sized>(
    model: &Model,
    city_id: &str,
    source: &mut S,
) -> Result<SimulationResult> {
    let city = model.get_city(city_id)?;
    let parameters = &model.parameters;

    let cloud_cover = source.sample();
    if !(0.0..=100.0).contains(&cloud_cover) {
        warn!(
            "Cloud cover of {cloud_cover}% for {city_id} is outside the range 0-100%. Irradiance \
            will not be clamped."
        );
    }
    let irradiance = irradiance(cloud_cover, parameters.clear_sky_irradiance);
    let sun_hours = sun_hours(city.latitude, parameters);

    let production = total_energy(model, city_id, irradiance, sun_hours)?;
    let amplitude = parameters.seasonal_amplitude;
    let yearly = yearly_summary(production.total, city.daily_consumption, amplitude);
    let daily_percentages = daily_percentages(production.total, city.daily_consumption, amplitude);
    let daily_solar_output = seasonal_outputs(production.total, amplitude).collect();

    Ok(SimulationResult {
        city_id: city.id.clone(),
        cloud_cover,
        irradiance,
        sun_hours,
        production,
        daily_solar_output,
        daily_percentages,
        yearly,
    })
}

/// Log a one-line summary of a city's result
fn log_result(city: &City, result: &SimulationResult) {
    info!(
        "{}: cloud cover {:.1}%, irradiance {:.1} W/m², {} sun-hours, rooftop solar could meet \
        {:.2}% of yearly consumption",
        city.id,
        result.cloud_cover,
        result.irradiance.value(),
        result.sun_hours.value(),
        result.yearly.percentage.value()
    );
}

/// Run the simulation for every city in the model.
///
/// Cities are processed in order. An error for any city aborts the whole run.
///
/// # Arguments
///
/// * `model` - The model to run
/// * `source` - Supplies the cloud cover for each city
/// * `output_path` - The folder to which output files will be written
pub fn run(
    model: &Model,
    source: &mut dyn CloudCoverSource,
    output_path: &Path,
) -> Result<Vec<SimulationResult>> {
    let mut writer = DataWriter::create(output_path)?;

    let mut results = Vec::with_capacity(model.cities.len());
    for city in model.iter_cities() {
        let result = run_city_simulation(model, city.id.as_str(), source)?;
        log_result(city, &result);
        writer.write_result(&result)?;
        results.push(result);
    }
    writer.flush()?;

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumption::DAYS_IN_YEAR;
    use crate::fixture::{assert_error, model};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case(32.78, 5.5)]
    #[case(30.0, 4.5)] // Threshold is exclusive
    #[case(25.76, 4.5)]
    #[case(-33.87, 4.5)]
    fn test_sun_hours(#[case] latitude: f64, #[case] expected: f64) {
        assert_eq!(
            sun_hours(latitude, &ModelParameters::default()),
            Hours(expected)
        );
    }

    #[rstest]
    fn test_run_city_simulation_dallas(model: Model) {
        let result = run_city_simulation(&model, "Dallas", &mut FixedCloudCover(40.0)).unwrap();

        assert_eq!(result.city_id, CityID::new("Dallas"));
        assert_eq!(result.cloud_cover, 40.0);
        assert_approx_eq!(f64, result.irradiance.value(), 600.0, epsilon = 1e-9);
        assert_eq!(result.sun_hours, Hours(5.5));
        assert_approx_eq!(
            f64,
            result.production.total.value(),
            22_078_267_200.0,
            epsilon = 1e-3
        );
        assert_eq!(result.daily_percentages.len(), DAYS_IN_YEAR as usize);
        assert_eq!(result.daily_solar_output.len(), DAYS_IN_YEAR as usize);
        assert_eq!(result.daily_solar_output[0], result.production.total);
        assert_approx_eq!(
            f64,
            result.yearly.percentage.value(),
            50.17788,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_run_city_simulation_low_latitude(model: Model) {
        let result = run_city_simulation(&model, "Miami", &mut FixedCloudCover(40.0)).unwrap();
        assert_eq!(result.sun_hours, Hours(4.5));
    }

    #[rstest]
    fn test_run_city_simulation_unknown_city(model: Model) {
        assert_error!(
            run_city_simulation(&model, "Atlantis", &mut FixedCloudCover(40.0)),
            "Unknown city: Atlantis"
        );
    }

    #[rstest]
    fn test_run_city_simulation_cloud_cover_out_of_range(model: Model) {
        let result = run_city_simulation(&model, "Dallas", &mut FixedCloudCover(150.0)).unwrap();
        assert_approx_eq!(f64, result.irradiance.value(), -500.0, epsilon = 1e-9);
        assert!(result.production.total < Energy(0.0));
        assert!(result.yearly.percentage < Dimensionless(0.0));
    }

    #[rstest]
    fn test_run_city_simulation_seeded_is_reproducible(model: Model) {
        let mut source1 = UniformCloudCover::new([30.0, 50.0], Some(3));
        let mut source2 = UniformCloudCover::new([30.0, 50.0], Some(3));
        let result1 = run_city_simulation(&model, "Dallas", &mut source1).unwrap();
        let result2 = run_city_simulation(&model, "Dallas", &mut source2).unwrap();
        assert_eq!(result1, result2);
        assert!((30.0..=50.0).contains(&result1.cloud_cover));
    }

    #[rstest]
    fn test_run(model: Model) {
        let dir = tempdir().unwrap();
        let results = run(&model, &mut FixedCloudCover(40.0), dir.path()).unwrap();

        assert!(
            results
                .iter()
                .map(|result| result.city_id.as_str())
                .eq(["Dallas", "Miami"])
        );
        assert!(dir.path().join("yearly_summary.csv").is_file());
    }
}
