//! Seeded synthetic datasets for examples and tests.
//!
//! Every generator takes an explicit seed and is fully deterministic; there
//! is no ambient RNG state anywhere.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// One-feature regression data with a non-linear link:
/// `y = x^3 - 0.5 x^2 + noise`, x uniform on [-1.4, 1.4].
pub fn make_cubic_regression(n_samples: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let x: f64 = rng.gen_range(-1.4..1.4);
        let noise: f64 = rng.sample::<f64, _>(StandardNormal) * 0.3;
        data.push(vec![x]);
        labels.push(x * x * x - 0.5 * x * x + noise);
    }
    (data, labels)
}

/// Two-feature binary classification data: two Gaussian blobs centered at
/// (-1, -1) and (1, 1), labels alternating 0/1.
pub fn make_classification(n_samples: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = (i % 2) as f64;
        let center = if class == 0.0 { -1.0 } else { 1.0 };
        let x1: f64 = center + rng.sample::<f64, _>(StandardNormal) * 0.8;
        let x2: f64 = center + rng.sample::<f64, _>(StandardNormal) * 0.8;
        data.push(vec![x1, x2]);
        labels.push(class);
    }
    (data, labels)
}

/// Two-feature XOR data: the label is 1 when the features have opposite
/// signs. Samples keep a 0.1 margin from the axes, so the four quadrants are
/// cleanly separated.
pub fn make_xor(n_samples: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let x1 = signed_coordinate(&mut rng);
        let x2 = signed_coordinate(&mut rng);
        let label = if (x1 > 0.0) != (x2 > 0.0) { 1.0 } else { 0.0 };
        data.push(vec![x1, x2]);
        labels.push(label);
    }
    (data, labels)
}

fn signed_coordinate(rng: &mut ChaCha8Rng) -> f64 {
    let magnitude: f64 = rng.gen_range(0.1..1.0);
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
