//! The module responsible for writing output data to disk.
//!
//! These files are the handoff to whatever presents the results (e.g. a plotting script).
use crate::city::{BuildingTypeID, CityID};
use crate::simulation::SimulationResult;
use crate::units::{Dimensionless, Energy, Hours, Irradiance};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "rooftop_solar_results";

/// The output file name for daily percentages
const DAILY_PERCENTAGES_FILE_NAME: &str = "daily_percentages.csv";

/// The output file name for contributions by building type
const BUILDING_CONTRIBUTIONS_FILE_NAME: &str = "building_contributions.csv";

/// The output file name for yearly summaries
const YEARLY_SUMMARY_FILE_NAME: &str = "yearly_summary.csv";

/// Get the default output directory for the model specified at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path, canonicalising in case the user has specified "."
    let model_dir = model_dir
        .canonicalize()
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory, optionally replacing an existing one.
///
/// # Arguments
///
/// * `output_dir` - The folder to create
/// * `allow_overwrite` - Whether to delete and recreate the folder if it already contains files
///
/// # Returns
///
/// `true` if an existing non-empty folder was replaced, `false` otherwise, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace it."
        );
        fs::remove_dir_all(output_dir)?;
        fs::create_dir_all(output_dir)?;
        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents a row in the daily percentages CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DailyPercentageRow {
    city_id: CityID,
    day: u32,
    solar_output: Energy,
    percentage: Dimensionless,
}

/// Represents a row in the building contributions CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct BuildingContributionRow {
    city_id: CityID,
    building_type: BuildingTypeID,
    energy: Energy,
}

/// Represents a row in the yearly summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct YearlySummaryRow {
    city_id: CityID,
    cloud_cover: f64,
    irradiance: Irradiance,
    sun_hours: Hours,
    daily_solar_output: Energy,
    yearly_solar_output: Energy,
    yearly_consumption: Energy,
    yearly_percentage: Dimensionless,
}

impl YearlySummaryRow {
    /// Create a new [`YearlySummaryRow`]
    fn new(result: &SimulationResult) -> Self {
        Self {
            city_id: result.city_id.clone(),
            cloud_cover: result.cloud_cover,
            irradiance: result.irradiance,
            sun_hours: result.sun_hours,
            daily_solar_output: result.production.total,
            yearly_solar_output: result.yearly.solar_output,
            yearly_consumption: result.yearly.consumption,
            yearly_percentage: result.yearly.percentage,
        }
    }
}

/// An object for writing simulation results to file
pub struct DataWriter {
    daily_writer: csv::Writer<File>,
    contributions_writer: csv::Writer<File>,
    yearly_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(&file_path)
                .with_context(|| format!("Failed to create {}", file_path.display()))
        };

        Ok(Self {
            daily_writer: new_writer(DAILY_PERCENTAGES_FILE_NAME)?,
            contributions_writer: new_writer(BUILDING_CONTRIBUTIONS_FILE_NAME)?,
            yearly_writer: new_writer(YEARLY_SUMMARY_FILE_NAME)?,
        })
    }

    /// Write all output for one city
    pub fn write_result(&mut self, result: &SimulationResult) -> Result<()> {
        self.write_daily_percentages(result)?;
        self.write_building_contributions(result)?;
        self.yearly_writer
            .serialize(YearlySummaryRow::new(result))?;

        Ok(())
    }

    /// Write daily solar output and percentages to a CSV file
    fn write_daily_percentages(&mut self, result: &SimulationResult) -> Result<()> {
        let days = result
            .daily_solar_output
            .iter()
            .zip(&result.daily_percentages);
        for (day, (solar_output, percentage)) in (0..).zip(days) {
            let row = DailyPercentageRow {
                city_id: result.city_id.clone(),
                day,
                solar_output: *solar_output,
                percentage: *percentage,
            };
            self.daily_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write contributions by building type to a CSV file
    fn write_building_contributions(&mut self, result: &SimulationResult) -> Result<()> {
        for (building_type, energy) in &result.production.contributions {
            let row = BuildingContributionRow {
                city_id: result.city_id.clone(),
                building_type: building_type.clone(),
                energy: *energy,
            };
            self.contributions_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.daily_writer.flush()?;
        self.contributions_writer.flush()?;
        self.yearly_writer.flush()?;

        Ok(())
    }
}
