//! Estimates how much of a city's electricity consumption could be met by solar panels on its
//! rooftops.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod city;
pub mod cli;
pub mod consumption;
pub mod id;
pub mod input;
pub mod irradiance;
pub mod log;
pub mod model;
pub mod output;
pub mod production;
pub mod settings;
pub mod simulation;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which program settings are stored.
///
/// Falls back on the current directory if the platform has no standard config folder.
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("rooftop_solar");

    path
}
