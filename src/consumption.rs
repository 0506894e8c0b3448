//! Expressing solar production as a share of a city's electricity consumption, day by day and over
//! a whole year.
//!
//! Daily production varies over the year with a sinusoidal seasonal factor centred on 1. The yearly
//! share is a ratio of sums (total output over total consumption), not the mean of the daily
//! shares.
use crate::units::{Dimensionless, Energy};
use std::f64::consts::PI;

/// The number of days in a simulated year (leap years are ignored)
pub const DAYS_IN_YEAR: u32 = 365;

/// Solar output and consumption totals over a year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearlySummary {
    /// Percentage of yearly consumption met by solar output
    pub percentage: Dimensionless,
    /// Total solar output over the year (Wh)
    pub solar_output: Energy,
    /// Total consumption over the year (Wh)
    pub consumption: Energy,
}

/// The seasonal multiplier for solar output on the given day of the year (starting at day 0).
///
/// This is `1 + amplitude * sin(2π * day / 365)`, so it is exactly 1 on day 0.
pub fn seasonal_factor(day: u32, amplitude: Dimensionless) -> Dimensionless {
    let angle = 2.0 * PI * f64::from(day) / f64::from(DAYS_IN_YEAR);
    Dimensionless(1.0 + amplitude.value() * angle.sin())
}

/// Solar output for each day of the year, given the output of an average day.
pub fn seasonal_outputs(
    daily_output: Energy,
    amplitude: Dimensionless,
) -> impl Iterator<Item = Energy> {
    (0..DAYS_IN_YEAR).map(move |day| daily_output * seasonal_factor(day, amplitude))
}

/// Express `part` as a percentage of `whole`
fn percentage(part: Energy, whole: Energy) -> Dimensionless {
    part / whole * Dimensionless(100.0)
}

/// The percentage of consumption met by solar output for each day of the year.
///
/// # Arguments
///
/// * `daily_output` - Solar output on an average day
/// * `daily_consumption` - The city's consumption per day
/// * `amplitude` - Amplitude of the seasonal variation
///
/// # Returns
///
/// One percentage per day, indexed from day 0 to day 364.
pub fn daily_percentages(
    daily_output: Energy,
    daily_consumption: Energy,
    amplitude: Dimensionless,
) -> Vec<Dimensionless> {
    seasonal_outputs(daily_output, amplitude)
        .map(|output| percentage(output, daily_consumption))
        .collect()
}

/// Total solar output and consumption over a year and the percentage of consumption met.
pub fn yearly_summary(
    daily_output: Energy,
    daily_consumption: Energy,
    amplitude: Dimensionless,
) -> YearlySummary {
    let solar_output: Energy = seasonal_outputs(daily_output, amplitude).sum();
    let consumption = daily_consumption * Dimensionless(f64::from(DAYS_IN_YEAR));

    YearlySummary {
        percentage: percentage(solar_output, consumption),
        solar_output,
        consumption,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::{approx_eq, assert_approx_eq};
    use rstest::rstest;

    const AMPLITUDE: Dimensionless = Dimensionless(0.2);
    const DALLAS_OUTPUT: Energy = Energy(22_078_267_200.0);
    const DALLAS_CONSUMPTION: Energy = Energy(44_000_000_000.0);

    #[test]
    fn test_seasonal_factor_day_zero() {
        assert_eq!(seasonal_factor(0, AMPLITUDE), Dimensionless(1.0));
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.2)]
    #[case(0.5)]
    fn test_seasonal_factor_bounds(#[case] amplitude: f64) {
        let amplitude = Dimensionless(amplitude);
        for day in 0..DAYS_IN_YEAR {
            let factor = seasonal_factor(day, amplitude).value();
            assert!(factor >= 1.0 - amplitude.value() - 1e-12);
            assert!(factor <= 1.0 + amplitude.value() + 1e-12);
        }
    }

    #[test]
    fn test_seasonal_factor_symmetric_about_one() {
        // Over a full period the deviations from 1 cancel out
        let mean = (0..DAYS_IN_YEAR)
            .map(|day| seasonal_factor(day, AMPLITUDE).value())
            .sum::<f64>()
            / f64::from(DAYS_IN_YEAR);
        assert_approx_eq!(f64, mean, 1.0, epsilon = 1e-12);

        // Peak a quarter of the way through the year, trough three quarters of the way through
        let max = (0..DAYS_IN_YEAR)
            .map(|day| seasonal_factor(day, AMPLITUDE).value())
            .fold(f64::MIN, f64::max);
        let min = (0..DAYS_IN_YEAR)
            .map(|day| seasonal_factor(day, AMPLITUDE).value())
            .fold(f64::MAX, f64::min);
        assert_approx_eq!(f64, max - 1.0, 1.0 - min, epsilon = 1e-12);
        assert!(approx_eq!(f64, max, 1.2, epsilon = 1e-5));
    }

    #[test]
    fn test_daily_percentages_length_and_start() {
        let percentages = daily_percentages(DALLAS_OUTPUT, DALLAS_CONSUMPTION, AMPLITUDE);
        assert_eq!(percentages.len(), DAYS_IN_YEAR as usize);
        assert_approx_eq!(f64, percentages[0].value(), 50.17788, epsilon = 1e-9);
    }

    #[test]
    fn test_yearly_summary_dallas() {
        let summary = yearly_summary(DALLAS_OUTPUT, DALLAS_CONSUMPTION, AMPLITUDE);
        assert_approx_eq!(f64, summary.percentage.value(), 50.17788, epsilon = 1e-9);
        assert_approx_eq!(
            f64,
            summary.consumption.value(),
            44_000_000_000.0 * 365.0,
            ulps = 2
        );
        assert_approx_eq!(
            f64,
            summary.solar_output.value(),
            8_058_567_528_000.0,
            epsilon = 1.0
        );
    }

    #[rstest]
    #[case(DALLAS_OUTPUT, DALLAS_CONSUMPTION)]
    #[case(Energy(1.0), Energy(3.0))]
    #[case(Energy(-5.0e8), Energy(1.0e9))]
    fn test_yearly_summary_agrees_with_daily_series(
        #[case] daily_output: Energy,
        #[case] daily_consumption: Energy,
    ) {
        let summary = yearly_summary(daily_output, daily_consumption, AMPLITUDE);

        // Recover each day's output from its percentage and take the ratio of sums
        let total_output: f64 = daily_percentages(daily_output, daily_consumption, AMPLITUDE)
            .into_iter()
            .map(|pct| pct.value() / 100.0 * daily_consumption.value())
            .sum();
        let expected =
            total_output / (daily_consumption.value() * f64::from(DAYS_IN_YEAR)) * 100.0;

        assert_approx_eq!(
            f64,
            summary.percentage.value(),
            expected,
            epsilon = 1e-9 * expected.abs().max(1.0)
        );
    }

    #[test]
    fn test_yearly_percentage_is_ratio_of_sums() {
        // With no seasonal variation every day has the same share, which is also the yearly share
        let flat = Dimensionless(0.0);
        let summary = yearly_summary(Energy(10.0), Energy(40.0), flat);
        assert_approx_eq!(f64, summary.percentage.value(), 25.0, ulps = 4);
        assert!(
            daily_percentages(Energy(10.0), Energy(40.0), flat)
                .iter()
                .all(|pct| approx_eq!(f64, pct.value(), 25.0, ulps = 4))
        );
    }
}
