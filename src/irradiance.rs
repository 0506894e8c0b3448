//! Converting cloud cover into the solar irradiance reaching a rooftop.
use crate::units::{Dimensionless, Irradiance};

/// Calculate the effective irradiance for the given cloud cover.
///
/// Irradiance falls linearly from `clear_sky` at 0% cloud cover to zero at 100%. Values outside
/// 0-100% are not clamped, so cloud cover above 100% gives a negative irradiance.
///
/// # Arguments
///
/// * `cloud_cover` - Cloud cover as a percentage
/// * `clear_sky` - Irradiance on a cloudless day
pub fn irradiance(cloud_cover: f64, clear_sky: Irradiance) -> Irradiance {
    clear_sky * Dimensionless(1.0 - cloud_cover / 100.0)
}
