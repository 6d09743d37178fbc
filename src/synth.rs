use nalgebra::{DMatrix, DVector};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::geometry::SensorArray;

/// Array response of a single point source, the same Gaussian kernel the
/// steering matrix uses. The spectrum peaks where a steering column aligns
/// with the span of these vectors.
pub fn point_source_response(sensors: &SensorArray, source: [f64; 2], sig: f64) -> DVector<f64> {
    let scale = -0.5 / (sig * sig);
    DVector::from_iterator(
        sensors.len(),
        sensors.positions().iter().map(|pos| {
            let dx = pos[0] - source[0];
            let dy = pos[1] - source[1];
            (scale * (dx * dx + dy * dy)).exp()
        }),
    )
}

/// Noise-free sample covariance of the given point sources plus a uniform
/// noise floor on the diagonal: `Σ a·aᵀ + noise_floor·I`. Deterministic,
/// which keeps spectrum tests reproducible bit for bit.
pub fn covariance(
    sensors: &SensorArray,
    sources: &[[f64; 2]],
    sig: f64,
    noise_floor: f64,
) -> DMatrix<f64> {
    let m = sensors.len();
    let mut cov = DMatrix::identity(m, m) * noise_floor;
    for &source in sources {
        let response = point_source_response(sensors, source, sig);
        cov += &response * response.transpose();
    }
    cov
}

/// Seeded snapshot matrix, one column per time sample: each source gets a
/// random amplitude per snapshot, plus additive sensor noise of amplitude
/// `noise_amp`.
pub fn snapshots(
    sensors: &SensorArray,
    sources: &[[f64; 2]],
    sig: f64,
    noise_amp: f64,
    count: usize,
    seed: u64,
) -> DMatrix<f64> {
    let m = sensors.len();
    let responses: Vec<DVector<f64>> = sources
        .iter()
        .map(|&source| point_source_response(sensors, source, sig))
        .collect();

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut data = DMatrix::zeros(m, count);
    for t in 0..count {
        let mut column = data.column_mut(t);
        for response in &responses {
            let amplitude = rng.gen_range(0.5..1.5);
            column.axpy(amplitude, response, 1.0);
        }
        for entry in column.iter_mut() {
            *entry += rng.gen_range(-noise_amp..noise_amp);
        }
    }
    data
}
