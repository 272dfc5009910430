//! Plain data types exchanged with the embedding application.

use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

/// A geographic coordinate in degrees (WGS84 longitude and latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees, [-180, 180]
    pub lon: f64,
    /// Latitude in degrees, [-90, 90]
    pub lat: f64,
}

impl GeoPoint {
    /// Create a new geographic coordinate.
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether this coordinate can serve as a flat-earth origin.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && self.lon.abs() <= 180.0
            && self.lat.abs() <= 90.0
    }
}

/// A point of the show-local frame, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPoint {
    /// X coordinate in meters
    pub x: f64,
    /// Y coordinate in meters
    pub y: f64,
}

impl LocalPoint {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &LocalPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &LocalPoint) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Rotate this point clockwise (compass sense) around the local origin.
    #[inline]
    pub fn rotated_clockwise(&self, angle_deg: f64) -> LocalPoint {
        let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
        LocalPoint::new(
            self.x * cos_a + self.y * sin_a,
            self.y * cos_a - self.x * sin_a,
        )
    }
}

impl Default for LocalPoint {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Axis convention of the show-local frame.
///
/// At zero orientation the +Y axis points towards geographic north; the +X
/// axis points east for `NorthEastUp` and west for `NorthWestUp`. The Z axis
/// always points up and plays no role in the planar fit. Both conventions
/// appear in show files, so this is a parameter everywhere, never a default
/// baked into the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisConvention {
    #[default]
    #[serde(rename = "neu")]
    NorthEastUp,
    #[serde(rename = "nwu")]
    NorthWestUp,
}

impl AxisConvention {
    /// Sign of the +X axis relative to east at zero orientation.
    #[inline]
    pub(crate) fn x_sign(&self) -> f64 {
        match self {
            AxisConvention::NorthEastUp => 1.0,
            AxisConvention::NorthWestUp => -1.0,
        }
    }

    /// Sign relating an in-plane counterclockwise rotation to a compass
    /// bearing change. The mirrored (left-handed) NWU frame flips the sense.
    #[inline]
    pub(crate) fn bearing_sign(&self) -> f64 {
        match self {
            AxisConvention::NorthEastUp => 1.0,
            AxisConvention::NorthWestUp => -1.0,
        }
    }
}

/// Geographic placement of the show coordinate system.
///
/// Produced fresh by every fit and every refinement iteration; never mutated
/// in place. `orientation_deg` is always finite and `origin` always a valid
/// coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystemEstimate {
    /// Geographic position of the show-local origin (0, 0).
    pub origin: GeoPoint,
    /// Compass bearing of the show frame's +Y axis, degrees in [0, 360).
    ///
    /// Drones parked on the pad face +Y, so a fleet of north-facing drones
    /// corresponds to orientation 0.
    pub orientation_deg: f64,
    /// Axis convention of the local frame.
    pub axis_convention: AxisConvention,
}

/// Inputs of one fit: live UAV samples and the planned takeoff layout.
///
/// The three UAV-indexed vectors are index-aligned and of equal length; use
/// [`FittingProblem::from_samples`] to build a problem from raw telemetry
/// where some UAVs may lack a GPS fix. The takeoff list length is independent
/// of the UAV count. The fit only reads the problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingProblem {
    /// Identifiers of the UAVs, index-aligned with positions and headings.
    pub uav_ids: Vec<String>,
    /// Current GPS positions of the UAVs.
    pub uav_positions: Vec<GeoPoint>,
    /// Compass headings in degrees [0, 360); `None` for compass-less UAVs.
    pub uav_headings: Vec<Option<f64>>,
    /// Planned takeoff positions in the show-local frame.
    pub takeoff_positions: Vec<LocalPoint>,
    /// Axis convention of the show-local frame.
    pub axis_convention: AxisConvention,
}

impl FittingProblem {
    /// Build a problem from raw telemetry, dropping every UAV without a GPS
    /// fix together with its id and heading so the index alignment holds.
    pub fn from_samples(
        uav_ids: Vec<String>,
        uav_positions: Vec<Option<GeoPoint>>,
        uav_headings: Vec<Option<f64>>,
        takeoff_positions: Vec<LocalPoint>,
        axis_convention: AxisConvention,
    ) -> Self {
        let mut ids = Vec::with_capacity(uav_ids.len());
        let mut positions = Vec::with_capacity(uav_ids.len());
        let mut headings = Vec::with_capacity(uav_ids.len());

        for ((id, position), heading) in uav_ids
            .into_iter()
            .zip(uav_positions)
            .zip(uav_headings)
        {
            if let Some(position) = position {
                ids.push(id);
                positions.push(position);
                headings.push(heading);
            }
        }

        Self {
            uav_ids: ids,
            uav_positions: positions,
            uav_headings: headings,
            takeoff_positions,
            axis_convention,
        }
    }

    /// Check the structural invariants before fitting.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.takeoff_positions.is_empty() {
            return Err(FitError::Input(
                "at least one takeoff position is required".into(),
            ));
        }
        if self.uav_positions.is_empty() {
            return Err(FitError::Input(
                "no UAV has a usable GPS position".into(),
            ));
        }
        if self.uav_ids.len() != self.uav_positions.len()
            || self.uav_headings.len() != self.uav_positions.len()
        {
            return Err(FitError::Input(format!(
                "UAV arrays are not index-aligned: {} ids, {} positions, {} headings",
                self.uav_ids.len(),
                self.uav_positions.len(),
                self.uav_headings.len()
            )));
        }
        Ok(())
    }
}
