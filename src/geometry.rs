use serde::{Deserialize, Serialize};

use crate::error::{MusicError, Result};

/// Physical layout of the low-resolution sensor array, reconstructed from
/// the data matrix row count under the square-grid assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorArray {
    side: usize,
    width: f64,
    positions: Vec<[f64; 2]>,
}

impl SensorArray {
    /// Rebuild the assumed sensor layout for a data matrix with
    /// `sensor_count` rows: a `sqrt(sensor_count)`-per-axis uniform grid
    /// spanning `[-width, width]` on both axes.
    ///
    /// Fails with [`MusicError::InvalidShape`] when `sensor_count` has no
    /// exact integer square root. The reference recipe silently truncated
    /// the root instead, which mis-sizes the grid; that behavior is
    /// rejected here on purpose.
    pub fn from_sensor_count(sensor_count: usize, width: f64) -> Result<Self> {
        if width <= 0.0 {
            return Err(MusicError::InvalidParameter(format!(
                "width must be positive, got {width}"
            )));
        }
        let side = exact_sqrt(sensor_count)
            .ok_or(MusicError::InvalidShape { rows: sensor_count })?;

        let axis = linspace(-width, width, side);
        Ok(Self {
            side,
            width,
            positions: product_grid(&axis),
        })
    }

    /// Number of sensors per axis.
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sensor coordinates in the row order of the data matrix.
    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }
}

/// High-resolution candidate-location grid the spectrum is evaluated on.
///
/// Uses the same span and flattening convention as [`SensorArray`], with
/// `resolution` points per axis instead of the sensor count's square root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanGrid {
    resolution: usize,
    width: f64,
    points: Vec<[f64; 2]>,
}

impl ScanGrid {
    pub fn new(width: f64, resolution: usize) -> Result<Self> {
        if width <= 0.0 {
            return Err(MusicError::InvalidParameter(format!(
                "width must be positive, got {width}"
            )));
        }
        if resolution == 0 {
            return Err(MusicError::InvalidParameter(
                "grid resolution must be at least 1".to_string(),
            ));
        }

        let axis = linspace(-width, width, resolution);
        Ok(Self {
            resolution,
            width,
            points: product_grid(&axis),
        })
    }

    /// Points per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Total candidate count, `resolution * resolution`.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Candidate coordinates in spectrum order.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }
}

/// `count` evenly spaced values over `[low, high]`, endpoints included.
/// A single-point axis collapses to `low`.
fn linspace(low: f64, high: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![low];
    }
    let step = (high - low) / (count - 1) as f64;
    (0..count).map(|i| low + step * i as f64).collect()
}

/// Row-major Cartesian product of `axis` with itself: index `i * n + j`
/// holds `(axis[i], axis[j])`, second coordinate varying fastest. Sensor
/// rows and spectrum entries both follow this order, so it must match
/// between [`SensorArray`] and [`ScanGrid`].
fn product_grid(axis: &[f64]) -> Vec<[f64; 2]> {
    let mut points = Vec::with_capacity(axis.len() * axis.len());
    for &a in axis {
        for &b in axis {
            points.push([a, b]);
        }
    }
    points
}

fn exact_sqrt(value: usize) -> Option<usize> {
    if value == 0 {
        return None;
    }
    let root = (value as f64).sqrt().round() as usize;
    (root * root == value).then_some(root)
}
