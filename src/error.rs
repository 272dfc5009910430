//! Error types for the coordinate-system fit.

use thiserror::Error;

/// Errors produced while fitting a show coordinate system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// The fitting problem is structurally unusable (empty or misaligned inputs).
    #[error("invalid fitting problem: {0}")]
    Input(String),

    /// A transformer was requested around a coordinate that cannot serve as an origin.
    #[error("invalid coordinate-system origin: longitude={lon}, latitude={lat}")]
    InvalidOrigin { lon: f64, lat: f64 },

    /// The assignment solver found no UAV/takeoff pair within the distance threshold.
    ///
    /// This is a correspondence failure, not a numeric one: the fleet is too far
    /// from any placement of the planned takeoff layout.
    #[error("no sufficiently close matching between UAV positions and takeoff positions")]
    NoMatch,

    /// The SVD of the cross-covariance matrix produced no singular vectors.
    #[error("SVD decomposition failed to produce U or V^T matrices")]
    SvdFailed,
}

pub type Result<T> = std::result::Result<T, FitError>;
