//! 2D MUSIC spatial-spectrum estimation over square planar sensor grids:
//! noise-subspace decomposition of a sensor data matrix, a Gaussian-kernel
//! steering matrix over a high-resolution candidate grid, and the inverse
//! projection-energy spectrum used for source localization.

pub mod error;
pub mod geometry;
pub mod spectrum;
pub mod steering;
pub mod subspace;
pub mod synth;

pub use error::MusicError;
pub use geometry::{ScanGrid, SensorArray};
pub use spectrum::{spatial_spectrum, MusicConfig, SpatialSpectrum};
pub use steering::SteeringMatrix;
pub use subspace::{aic_source_count, mdl_source_count, NoiseSubspace};
