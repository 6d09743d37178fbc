use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::error::{MusicError, Result};
use crate::geometry::{ScanGrid, SensorArray};

/// Gaussian-kernel steering matrix linking physical sensors to candidate
/// grid points.
///
/// Entry (i, j) is `exp(-0.5 · d²(sensor_i, grid_j) / sig²)` where `d` is
/// the Euclidean distance. The kernel keeps no phase information: this is
/// an intentional real-valued approximation of the array response, not the
/// classical complex-exponential steering vector.
#[derive(Debug, Clone)]
pub struct SteeringMatrix {
    matrix: DMatrix<f64>,
    sig: f64,
}

impl SteeringMatrix {
    pub fn build(sensors: &SensorArray, grid: &ScanGrid, sig: f64) -> Result<Self> {
        if sig == 0.0 {
            return Err(MusicError::InvalidParameter(
                "kernel bandwidth sig must be non-zero".to_string(),
            ));
        }

        let sensor_pos = sensors.positions();
        let scale = -0.5 / (sig * sig);

        // Column-major storage: each chunk of `len` entries is the response
        // column of one candidate grid point.
        let mut matrix = DMatrix::zeros(sensors.len(), grid.len());
        matrix
            .as_mut_slice()
            .par_chunks_mut(sensor_pos.len())
            .zip(grid.points().par_iter())
            .for_each(|(column, point)| {
                for (entry, sensor) in column.iter_mut().zip(sensor_pos) {
                    let dx = sensor[0] - point[0];
                    let dy = sensor[1] - point[1];
                    *entry = (scale * (dx * dx + dy * dy)).exp();
                }
            });

        Ok(Self { matrix, sig })
    }

    pub fn sig(&self) -> f64 {
        self.sig
    }

    /// Sensors × grid-points kernel matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Squared 2-norm of each response column, in grid order.
    pub fn column_energies(&self) -> Vec<f64> {
        (0..self.matrix.ncols())
            .map(|j| self.matrix.column(j).norm_squared())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_one_at_zero_distance_and_decays() {
        let sensors = SensorArray::from_sensor_count(4, 1.0).unwrap();
        // Resolution 2 makes grid points coincide with the sensors.
        let grid = ScanGrid::new(1.0, 2).unwrap();
        let steering = SteeringMatrix::build(&sensors, &grid, 0.5).unwrap();

        let matrix = steering.as_matrix();
        assert_eq!(matrix.nrows(), 4);
        assert_eq!(matrix.ncols(), 4);
        for i in 0..4 {
            assert!((matrix[(i, i)] - 1.0).abs() < 1e-12);
            for j in 0..4 {
                assert!(matrix[(i, j)] > 0.0);
                assert!(matrix[(i, j)] <= 1.0 + 1e-12);
                if i != j {
                    assert!(matrix[(i, j)] < matrix[(i, i)]);
                }
            }
        }
    }

    #[test]
    fn zero_bandwidth_is_rejected() {
        let sensors = SensorArray::from_sensor_count(4, 1.0).unwrap();
        let grid = ScanGrid::new(1.0, 3).unwrap();
        let err = SteeringMatrix::build(&sensors, &grid, 0.0).unwrap_err();
        assert!(matches!(err, MusicError::InvalidParameter(_)));
    }

    #[test]
    fn negative_bandwidth_matches_positive() {
        // Only sig² enters the kernel.
        let sensors = SensorArray::from_sensor_count(4, 1.0).unwrap();
        let grid = ScanGrid::new(1.0, 3).unwrap();
        let pos = SteeringMatrix::build(&sensors, &grid, 0.5).unwrap();
        let neg = SteeringMatrix::build(&sensors, &grid, -0.5).unwrap();
        assert_eq!(pos.as_matrix(), neg.as_matrix());
    }
}
