//! Model-wide physical and behavioural parameters.
use crate::input::{deserialise_proportion_nonzero, input_err_msg, read_toml};
use crate::units::{Dimensionless, Hours, Irradiance};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

/// The maximum number of sun-hours that make physical sense in a day
const MAX_SUN_HOURS: f64 = 24.0;

/// Define a function giving the default value of a parameter, for use with `#[serde(default)]`
macro_rules! param_default {
    ($name:ident: $type:ty = $value:expr) => {
        fn $name() -> $type {
            <$type>::from($value)
        }
    };
}

param_default!(default_panel_efficiency: Dimensionless = 0.16);
param_default!(default_clear_sky_irradiance: Irradiance = 1000.0);
param_default!(default_system_loss_factor: Dimensionless = 0.85);
param_default!(default_rooftop_suitability: Dimensionless = 0.30);
param_default!(default_sun_hours_above_threshold: Hours = 5.5);
param_default!(default_sun_hours_at_or_below_threshold: Hours = 4.5);
param_default!(default_seasonal_amplitude: Dimensionless = 0.2);
param_default!(default_cloud_cover_range: [f64; 2] = [30.0, 50.0]);
param_default!(default_latitude_threshold: f64 = 30.0);

/// Global model parameters, read from `model.toml`.
///
/// Every parameter is optional and any which are missing take their default value, so an empty
/// file is a valid model file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ModelParameters {
    /// Fraction of incident solar energy that panels convert to electricity
    #[serde(default = "default_panel_efficiency")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub panel_efficiency: Dimensionless,
    /// Irradiance on a cloudless day (W/m²)
    #[serde(default = "default_clear_sky_irradiance")]
    pub clear_sky_irradiance: Irradiance,
    /// Fraction of generated energy remaining after inverter, wiring and other system losses
    #[serde(default = "default_system_loss_factor")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub system_loss_factor: Dimensionless,
    /// Fraction of all rooftops suitable for panels.
    ///
    /// This is applied on top of the per-building-type roof coverage.
    #[serde(default = "default_rooftop_suitability")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub rooftop_suitability: Dimensionless,
    /// Lower and upper bound (%) of the uniform distribution cloud cover is drawn from
    #[serde(default = "default_cloud_cover_range")]
    pub cloud_cover_range: [f64; 2],
    /// Cities with a latitude above this (degrees) get more sun-hours
    #[serde(default = "default_latitude_threshold")]
    pub latitude_threshold: f64,
    /// Daily sun-hours for cities with a latitude above the threshold
    #[serde(default = "default_sun_hours_above_threshold")]
    pub sun_hours_above_threshold: Hours,
    /// Daily sun-hours for cities with a latitude at or below the threshold
    #[serde(default = "default_sun_hours_at_or_below_threshold")]
    pub sun_hours_at_or_below_threshold: Hours,
    /// Amplitude of the sinusoidal seasonal variation in solar output
    #[serde(default = "default_seasonal_amplitude")]
    pub seasonal_amplitude: Dimensionless,
    /// Seed for the cloud cover random number generator.
    ///
    /// If absent, a different seed is used for every run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            panel_efficiency: default_panel_efficiency(),
            clear_sky_irradiance: default_clear_sky_irradiance(),
            system_loss_factor: default_system_loss_factor(),
            rooftop_suitability: default_rooftop_suitability(),
            cloud_cover_range: default_cloud_cover_range(),
            latitude_threshold: default_latitude_threshold(),
            sun_hours_above_threshold: default_sun_hours_above_threshold(),
            sun_hours_at_or_below_threshold: default_sun_hours_at_or_below_threshold(),
            seasonal_amplitude: default_seasonal_amplitude(),
            seed: None,
        }
    }
}

/// Check that the `clear_sky_irradiance` parameter is valid
fn check_clear_sky_irradiance(value: Irradiance) -> Result<()> {
    ensure!(
        value.is_finite() && value > Irradiance(0.0),
        "clear_sky_irradiance must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that the `cloud_cover_range` parameter is valid
fn check_cloud_cover_range([lower, upper]: [f64; 2]) -> Result<()> {
    ensure!(
        (0.0..=100.0).contains(&lower) && (0.0..=100.0).contains(&upper),
        "cloud_cover_range must be between 0 and 100"
    );
    ensure!(
        lower <= upper,
        "The lower bound of cloud_cover_range cannot exceed the upper bound"
    );

    Ok(())
}

/// Check that the `latitude_threshold` parameter is valid
fn check_latitude_threshold(value: f64) -> Result<()> {
    ensure!(
        (-90.0..=90.0).contains(&value),
        "latitude_threshold must be between -90 and 90"
    );

    Ok(())
}

/// Check that a sun-hours parameter is valid
fn check_sun_hours(name: &str, value: Hours) -> Result<()> {
    ensure!(
        value > Hours(0.0) && value <= Hours(MAX_SUN_HOURS),
        "{name} must be greater than zero and no more than {MAX_SUN_HOURS}"
    );

    Ok(())
}

/// Check that the `seasonal_amplitude` parameter is valid
fn check_seasonal_amplitude(value: Dimensionless) -> Result<()> {
    ensure!(
        value >= Dimensionless(0.0) && value < Dimensionless(1.0),
        "seasonal_amplitude must be at least zero and less than one"
    );

    Ok(())
}

impl ModelParameters {
    /// Load and check the `model.toml` file in `model_dir`
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let params: ModelParameters = read_toml(&file_path)?;
        params
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(params)
    }

    /// Check the parameters which serde does not already check while deserialising
    fn validate(&self) -> Result<()> {

        check_clear_sky_irradiance(self.clear_sky_irradiance)?;
        check_cloud_cover_range(self.cloud_cover_range)?;
        check_latitude_threshold(self.latitude_threshold)?;
        check_sun_hours("sun_hours_above_threshold", self.sun_hours_above_threshold)?;
        check_sun_hours(
            "sun_hours_at_or_below_threshold",
            self.sun_hours_at_or_below_threshold,
        )?;
        check_seasonal_amplitude(self.seasonal_amplitude)?;

        if self.sun_hours_above_threshold < self.sun_hours_at_or_below_threshold {
            warn!(
                "Cities above the latitude threshold are given fewer sun-hours ({}) than those \
                below it ({})",
                self.sun_hours_above_threshold.value(),
                self.sun_hours_at_or_below_threshold.value()
            );
        }

        Ok(())
    }
}
