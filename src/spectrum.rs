use log::debug;
use nalgebra::{ComplexField, DMatrix};
use serde::{Deserialize, Serialize};

use crate::error::{MusicError, Result};
use crate::geometry::{ScanGrid, SensorArray};
use crate::steering::SteeringMatrix;
use crate::subspace::NoiseSubspace;

/// Parameters of a spectrum computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicConfig {
    /// Expected number of signal sources, strictly less than the sensor
    /// count.
    pub source_count: usize,
    /// Half-extent of both the physical array and the search grid.
    pub width: f64,
    /// Gaussian kernel bandwidth of the steering matrix.
    pub sig: f64,
    /// Candidate points per axis of the high-resolution grid.
    pub grid_resolution: usize,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            source_count: 1,
            width: 1.0,
            sig: 0.5,
            grid_resolution: 32,
        }
    }
}

impl MusicConfig {
    /// Fail-fast validation against a data matrix with `sensor_count`
    /// rows. Runs before any decomposition or matrix assembly.
    pub fn validate(&self, sensor_count: usize) -> Result<()> {
        if self.width <= 0.0 {
            return Err(MusicError::InvalidParameter(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if self.sig == 0.0 {
            return Err(MusicError::InvalidParameter(
                "kernel bandwidth sig must be non-zero".to_string(),
            ));
        }
        if self.grid_resolution == 0 {
            return Err(MusicError::InvalidParameter(
                "grid resolution must be at least 1".to_string(),
            ));
        }
        if self.source_count == sensor_count {
            return Err(MusicError::DegenerateSpectrum);
        }
        if self.source_count > sensor_count {
            return Err(MusicError::InvalidParameter(format!(
                "source count {} exceeds sensor count {}",
                self.source_count, sensor_count
            )));
        }
        Ok(())
    }
}

/// MUSIC spectrum over a [`ScanGrid`], one non-negative value per candidate
/// point in grid order. Isolated `+inf` entries are meaningful: they mark a
/// candidate whose steering column lies entirely inside the signal
/// subspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialSpectrum {
    values: Vec<f64>,
    grid: ScanGrid,
}

impl SpatialSpectrum {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn grid(&self) -> &ScanGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spectrum values grouped per first-axis coordinate, one row per grid
    /// line.
    pub fn as_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.grid.resolution())
    }
}

/// Compute the 2D MUSIC spatial spectrum of `data`.
///
/// `data` is the sensor measurement matrix, shape (M, K) with M a perfect
/// square; it may be real (`f64`) or complex (`nalgebra::Complex<f64>`) —
/// the noise-subspace projection uses the Hermitian transpose, which
/// degenerates to the plain transpose for real input.
///
/// The stages run strictly in sequence: sensor geometry, noise-subspace
/// estimation, steering-matrix assembly, projection. The result holds
/// `grid_resolution²` values, `1 / ‖Uₙᴴ a_j‖²` for each candidate `j`.
pub fn spatial_spectrum<T: ComplexField<RealField = f64>>(
    data: &DMatrix<T>,
    config: &MusicConfig,
) -> Result<SpatialSpectrum> {
    config.validate(data.nrows())?;

    let sensors = SensorArray::from_sensor_count(data.nrows(), config.width)?;
    let grid = ScanGrid::new(config.width, config.grid_resolution)?;
    debug!(
        "sensor grid {}x{}, scan grid {}x{}",
        sensors.side(),
        sensors.side(),
        grid.resolution(),
        grid.resolution()
    );

    let noise = NoiseSubspace::estimate(data, config.source_count)?;
    debug!("noise subspace dimension {}", noise.dimension());

    let steering = SteeringMatrix::build(&sensors, &grid, config.sig)?;
    let values = project_residuals(&noise, &steering);

    Ok(SpatialSpectrum { values, grid })
}

/// Inverse residual projection energy per steering column.
fn project_residuals<T: ComplexField<RealField = f64>>(
    noise: &NoiseSubspace<T>,
    steering: &SteeringMatrix,
) -> Vec<f64> {
    let steering_t = steering.as_matrix().map(|v| T::from_real(v));
    let projected = noise.basis().adjoint() * steering_t;
    (0..projected.ncols())
        .map(|j| 1.0 / projected.column(j).norm_squared())
        .collect()
}
