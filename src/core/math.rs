//! Angular math primitives for compass bearings.
//!
//! Bearings are degrees clockwise from geographic north, kept in [0, 360).

/// Normalize a bearing to [0, 360).
///
/// # Example
/// ```
/// use showfit::core::math::normalize_bearing;
///
/// assert!((normalize_bearing(725.0) - 5.0).abs() < 1e-9);
/// assert!((normalize_bearing(-10.0) - 350.0).abs() < 1e-9);
/// ```
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let mut b = deg % 360.0;
    if b < 0.0 {
        b += 360.0;
    }
    if b >= 360.0 {
        b = 0.0;
    }
    b
}

/// Shortest angular distance between two bearings, in degrees within [0, 180].
///
/// # Example
/// ```
/// use showfit::core::math::bearing_distance;
///
/// assert!((bearing_distance(350.0, 10.0) - 20.0).abs() < 1e-9);
/// ```
#[inline]
pub fn bearing_distance(a_deg: f64, b_deg: f64) -> f64 {
    let d = (normalize_bearing(a_deg) - normalize_bearing(b_deg)).abs();
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Circular mean of a set of bearings, or `None` for an empty set.
///
/// Uses `atan2(Σsin, Σcos)` so the 0/360 wraparound is handled correctly;
/// an arithmetic mean would average 350° and 10° to 180° instead of 0°.
pub fn circular_mean_deg(bearings_deg: &[f64]) -> Option<f64> {
    if bearings_deg.is_empty() {
        return None;
    }
    let (sin_sum, cos_sum) = bearings_deg.iter().fold((0.0, 0.0), |(s, c), deg| {
        let rad = deg.to_radians();
        (s + rad.sin(), c + rad.cos())
    });
    Some(normalize_bearing(sin_sum.atan2(cos_sum).to_degrees()))
}
