use thiserror::Error;

/// Failure modes of the spectrum pipeline.
///
/// Every variant is raised during up-front validation, before the
/// eigendecomposition or the steering-matrix assembly run.
#[derive(Debug, Error)]
pub enum MusicError {
    /// The data matrix row count admits no exact integer square root, so it
    /// cannot describe a square sensor grid.
    #[error("data matrix has {rows} rows, which is not a perfect square sensor count")]
    InvalidShape { rows: usize },

    /// A scalar parameter is outside its admissible range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The noise subspace has no columns, so every spectrum value would be
    /// an undefined division by zero.
    #[error("noise subspace is empty; spectrum is undefined at every grid point")]
    DegenerateSpectrum,
}

pub type Result<T> = std::result::Result<T, MusicError>;
