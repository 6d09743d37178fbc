use std::cmp::Ordering;

use nalgebra::{ComplexField, DMatrix, SymmetricEigen};

use crate::error::{MusicError, Result};

/// Orthonormal basis of the noise subspace of a sensor data matrix.
///
/// The left singular subspace of the data is recovered from the Hermitian
/// eigendecomposition of the sample Gram matrix `X · Xᴴ`: its eigenvectors
/// are the left singular vectors of `X` and its eigenvalues the squared
/// singular values. Unlike a thin SVD this yields a full orthonormal basis
/// for any snapshot count, and the sign/phase ambiguity of the vectors is
/// irrelevant downstream where only magnitude-squared projections are used.
#[derive(Debug, Clone)]
pub struct NoiseSubspace<T: ComplexField<RealField = f64>> {
    basis: DMatrix<T>,
    eigenvalues: Vec<f64>,
}

impl<T: ComplexField<RealField = f64>> NoiseSubspace<T> {
    /// Estimate the noise subspace of `data`, keeping the trailing
    /// `rows - source_count` basis vectors (smallest singular values).
    ///
    /// `source_count == rows` leaves an empty basis and fails with
    /// [`MusicError::DegenerateSpectrum`]; larger values are
    /// [`MusicError::InvalidParameter`].
    pub fn estimate(data: &DMatrix<T>, source_count: usize) -> Result<Self> {
        let rows = data.nrows();
        if rows == 0 {
            return Err(MusicError::InvalidShape { rows });
        }
        if data.ncols() == 0 {
            return Err(MusicError::InvalidParameter(
                "data matrix has no snapshot columns".to_string(),
            ));
        }
        match source_count.cmp(&rows) {
            Ordering::Equal => return Err(MusicError::DegenerateSpectrum),
            Ordering::Greater => {
                return Err(MusicError::InvalidParameter(format!(
                    "source count {source_count} exceeds sensor count {rows}"
                )));
            }
            Ordering::Less => {}
        }

        let gram = data * data.adjoint();
        let eigen = SymmetricEigen::new(gram);

        // Descending eigenvalue order matches the descending singular-value
        // convention; the noise subspace is the tail.
        let mut order: Vec<usize> = (0..rows).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(Ordering::Equal)
        });

        let eigenvalues: Vec<f64> = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
        let sorted = eigen.eigenvectors.select_columns(order.iter());
        let basis = sorted.columns(source_count, rows - source_count).into_owned();

        Ok(Self { basis, eigenvalues })
    }

    /// Basis vectors as matrix columns, `rows × (rows - source_count)`.
    pub fn basis(&self) -> &DMatrix<T> {
        &self.basis
    }

    /// Number of noise-subspace dimensions.
    pub fn dimension(&self) -> usize {
        self.basis.ncols()
    }

    /// Squared singular values of the data matrix, descending. Feed these
    /// to [`mdl_source_count`] or [`aic_source_count`] when the source
    /// count is unknown.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }
}

/// Estimate the number of sources with the Minimum Description Length
/// criterion of Wax and Kailath.
///
/// `eigenvalues`: spectrum of the sample covariance (or Gram) matrix in
/// descending order — the arithmetic/geometric mean ratio the criterion
/// tests is scale invariant, so the Gram matrix spectrum works unchanged.
/// `snapshots`: number of data columns K.
pub fn mdl_source_count(eigenvalues: &[f64], snapshots: usize) -> usize {
    information_criterion(eigenvalues, snapshots, |d, m, k| {
        0.5 * d as f64 * (2.0 * m as f64 - d as f64) * k.ln()
    })
}

/// Akaike Information Criterion variant of [`mdl_source_count`]. AIC tends
/// to overestimate the model order at high snapshot counts but is less
/// likely to miss weak sources.
pub fn aic_source_count(eigenvalues: &[f64], snapshots: usize) -> usize {
    information_criterion(eigenvalues, snapshots, |d, m, _| {
        d as f64 * (2.0 * m as f64 - d as f64)
    })
}

fn information_criterion(
    eigenvalues: &[f64],
    snapshots: usize,
    penalty: impl Fn(usize, usize, f64) -> f64,
) -> usize {
    let m = eigenvalues.len();
    if m < 2 {
        return 0;
    }
    let k = snapshots as f64;

    let mut best_d = 0;
    let mut best_score = f64::MAX;

    for d in 0..m {
        let noise = &eigenvalues[d..];
        let noise_dim = noise.len() as f64;
        if noise.iter().any(|&v| v <= 0.0) {
            continue;
        }

        let arith_mean = noise.iter().sum::<f64>() / noise_dim;
        let geo_mean = (noise.iter().map(|v| v.ln()).sum::<f64>() / noise_dim).exp();
        if arith_mean <= 0.0 || geo_mean <= 0.0 {
            continue;
        }

        let score = k * noise_dim * (arith_mean / geo_mean).ln() + penalty(d, m, k);
        if score < best_score {
            best_score = score;
            best_d = d;
        }
    }

    best_d
}
