//! Synthetic training corpus generation.
//!
//! A deterministic placeholder for a real historical dataset: feature
//! distributions and target formulas are fixed so training is reproducible
//! across runs and in tests. The statistical realism of this corpus is
//! explicitly not a contract.

use crate::primitives::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used for the reference corpus.
pub const CORPUS_SEED: u64 = 42;

/// Number of samples in the reference corpus.
pub const CORPUS_SIZE: usize = 1000;

/// A generated training corpus: one feature matrix and the four target
/// vectors the regressors are fit against.
#[derive(Debug, Clone)]
pub struct TrainingCorpus {
    /// Feature rows: [temperature °C, humidity %, pressure hPa, wind km/h]
    pub features: Matrix<f32>,
    /// Next-day temperature target
    pub next_day_temperature: Vector<f32>,
    /// Humidity target
    pub humidity: Vector<f32>,
    /// Rainfall target (non-negative by construction)
    pub rainfall: Vector<f32>,
    /// Air quality index target, clipped to [0, 500]
    pub air_quality: Vector<f32>,
}

/// Standard normal deviate via Box-Muller over the seeded uniform stream.
fn sample_standard_normal(rng: &mut impl Rng) -> f32 {
    let u1: f32 = rng.gen::<f32>().max(1e-10);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

fn sample_normal(rng: &mut impl Rng, mean: f32, std: f32) -> f32 {
    mean + std * sample_standard_normal(rng)
}

/// Exponential deviate with the given mean, via inverse CDF.
fn sample_exponential(rng: &mut impl Rng, mean: f32) -> f32 {
    let u: f32 = rng.gen::<f32>().min(1.0 - 1e-10);
    -mean * (1.0 - u).ln()
}

/// Generates a corpus of `n_samples` weather observations with targets.
///
/// Feature draws: temperature ~ N(28, 5), humidity ~ N(75, 15), pressure ~
/// N(1013, 10), wind ~ Exp(mean 10). Targets follow the documented
/// placeholder formulas: next-day temperature adds N(0, 1.5) noise,
/// humidity adds N(0, 3), rainfall is `max(0, (100 - humidity)/10 +
/// Exp(2))`, and AQI is `50 + (temp - 25)*2 + N(0, 10)` clipped to
/// [0, 500].
#[must_use]
pub fn generate_corpus(n_samples: usize, seed: u64) -> TrainingCorpus {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut feature_data = Vec::with_capacity(n_samples * 4);
    let mut temp = Vec::with_capacity(n_samples);
    let mut humidity = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let t = sample_normal(&mut rng, 28.0, 5.0);
        let h = sample_normal(&mut rng, 75.0, 15.0);
        let p = sample_normal(&mut rng, 1013.0, 10.0);
        let w = sample_exponential(&mut rng, 10.0);

        feature_data.extend_from_slice(&[t, h, p, w]);
        temp.push(t);
        humidity.push(h);
    }

    let mut y_temp = Vec::with_capacity(n_samples);
    let mut y_humidity = Vec::with_capacity(n_samples);
    let mut y_rainfall = Vec::with_capacity(n_samples);
    let mut y_aqi = Vec::with_capacity(n_samples);

    for i in 0..n_samples {
        y_temp.push(temp[i] + sample_normal(&mut rng, 0.0, 1.5));
        y_humidity.push(humidity[i] + sample_normal(&mut rng, 0.0, 3.0));
        y_rainfall.push(
            ((100.0 - humidity[i]) / 10.0 + sample_exponential(&mut rng, 2.0)).max(0.0),
        );
        y_aqi.push(
            (50.0 + (temp[i] - 25.0) * 2.0 + sample_normal(&mut rng, 0.0, 10.0)).clamp(0.0, 500.0),
        );
    }

    let features = Matrix::from_vec(n_samples, 4, feature_data)
        .expect("corpus dimensions are consistent by construction");

    TrainingCorpus {
        features,
        next_day_temperature: Vector::from_vec(y_temp),
        humidity: Vector::from_vec(y_humidity),
        rainfall: Vector::from_vec(y_rainfall),
        air_quality: Vector::from_vec(y_aqi),
    }
}
