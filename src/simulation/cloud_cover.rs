//! Sources of cloud cover values for the simulation.
//!
//! Cloud cover is a placeholder for real weather data. By default it is drawn at random, but a
//! fixed value can be supplied instead so that results are reproducible.
use crate::model::ModelParameters;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Something that supplies a cloud cover percentage for each simulated city
pub trait CloudCoverSource {
    /// Get the cloud cover (%) to use for the next city
    fn sample(&mut self) -> f64;
}

/// Always returns the same cloud cover
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCloudCover(pub f64);

impl CloudCoverSource for FixedCloudCover {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Draws cloud cover uniformly from a range
#[derive(Debug, Clone)]
pub struct UniformCloudCover<R: Rng = StdRng> {
    lower: f64,
    upper: f64,
    rng: R,
}

impl UniformCloudCover<StdRng> {
    /// Create a new source drawing from `[lower, upper]`.
    ///
    /// If `seed` is `None`, the generator is seeded from system entropy.
    pub fn new([lower, upper]: [f64; 2], seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::with_rng([lower, upper], rng)
    }
}

impl<R: Rng> UniformCloudCover<R> {
    /// Create a new source drawing from `[lower, upper]` with the given generator
    pub fn with_rng([lower, upper]: [f64; 2], rng: R) -> Self {
        Self { lower, upper, rng }
    }
}

impl<R: Rng> CloudCoverSource for UniformCloudCover<R> {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(self.lower..=self.upper)
    }
}

/// Choose the cloud cover source for a run.
///
/// # Arguments
///
/// * `parameters` - Model parameters, giving the range to draw from and an optional seed
/// * `fixed` - If provided, use this cloud cover for every city instead of drawing at random
/// * `seed` - Overrides the seed in the model parameters
pub fn create_cloud_cover_source(
    parameters: &ModelParameters,
    fixed: Option<f64>,
    seed: Option<u64>,
) -> Box<dyn CloudCoverSource> {
    if let Some(cloud_cover) = fixed {
        debug!("Using fixed cloud cover of {cloud_cover}%");
        return Box::new(FixedCloudCover(cloud_cover));
    }

    let seed = seed.or(parameters.seed);
    let [lower, upper] = parameters.cloud_cover_range;
    match seed {
        Some(seed) => debug!("Drawing cloud cover from [{lower}, {upper}]% with seed {seed}"),
        None => debug!("Drawing cloud cover from [{lower}, {upper}]% with a random seed"),
    }

    Box::new(UniformCloudCover::new(parameters.cloud_cover_range, seed))
}
