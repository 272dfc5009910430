//! Iterative refinement of the show coordinate system.
//!
//! The fit alternates, ICP-style, between two sub-problems:
//!
//! 1. Correspondence: project the UAV GPS positions into the current local
//!    frame and match them greedily against the takeoff layout within a
//!    distance threshold.
//! 2. Alignment: re-estimate the frame's origin and orientation from the
//!    matched pairs with the Procrustes step.
//!
//! The loop converges when the matching repeats between two consecutive
//! iterations. An assignment-free seed built from centroids and the circular
//! mean of the compass headings makes the first correspondence meaningful.

use crate::alignment::align_pairs;
use crate::core::math::{circular_mean_deg, normalize_bearing};
use crate::core::types::{CoordinateSystemEstimate, FittingProblem, GeoPoint, LocalPoint};
use crate::error::{FitError, Result};
use crate::geo::FlatEarthTransformer;
use crate::matching::{distance_matrix, greedy_assignment, Matching};

/// Tunable parameters of the fit.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Maximum projected distance (meters) for a UAV/takeoff pair to count
    /// as a correspondence.
    pub distance_threshold_m: f64,

    /// Iteration budget before the fit gives up on a stable matching.
    pub max_iterations: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            distance_threshold_m: 3.0,
            max_iterations: 20,
        }
    }
}

/// Outcome of a fit that produced an estimate.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// The fitted coordinate system.
    pub estimate: CoordinateSystemEstimate,

    /// Final UAV-to-takeoff correspondence, sorted by takeoff index.
    pub matching: Matching,

    /// Number of iterations performed.
    pub iterations: u32,

    /// False when the iteration budget ran out before the matching
    /// stabilized. The estimate is still the last one computed; callers
    /// should surface it as approximate.
    pub converged: bool,
}

/// Assignment-free seed for the refinement loop.
///
/// Centroid of the UAV GPS positions, projected through a temporary
/// zero-rotation transformer, pinned against the centroid of the takeoff
/// layout; orientation from the circular mean of the known compass headings.
/// A fleet without any compass seeds a north-oriented frame.
pub fn initial_estimate(problem: &FittingProblem) -> Result<CoordinateSystemEstimate> {
    problem.validate()?;

    let n = problem.uav_positions.len() as f64;
    let (lon_sum, lat_sum) = problem
        .uav_positions
        .iter()
        .fold((0.0, 0.0), |(lo, la), p| (lo + p.lon, la + p.lat));
    let geo_centroid = GeoPoint::new(lon_sum / n, lat_sum / n);

    let transformer =
        FlatEarthTransformer::new(geo_centroid, 0.0, problem.axis_convention)?;

    let uav_centroid = local_centroid(
        problem
            .uav_positions
            .iter()
            .map(|p| transformer.to_local(p)),
        n,
    );
    let takeoff_centroid = local_centroid(
        problem.takeoff_positions.iter().copied(),
        problem.takeoff_positions.len() as f64,
    );

    let headings: Vec<f64> = problem.uav_headings.iter().copied().flatten().collect();
    let orientation_deg = circular_mean_deg(&headings).unwrap_or(0.0);

    let diff = LocalPoint::new(
        uav_centroid.x - takeoff_centroid.x,
        uav_centroid.y - takeoff_centroid.y,
    );
    let origin_offset =
        diff.rotated_clockwise(problem.axis_convention.bearing_sign() * orientation_deg);

    Ok(CoordinateSystemEstimate {
        origin: transformer.to_geo(&origin_offset),
        orientation_deg,
        axis_convention: problem.axis_convention,
    })
}

/// Fit the show coordinate system to the observed UAV positions.
///
/// Runs the refinement loop described in the module docs, starting from
/// [`initial_estimate`]. Fails fast on unusable input and fails with
/// [`FitError::NoMatch`] when no UAV comes within
/// `options.distance_threshold_m` of any takeoff slot at some iteration.
/// A fit that exhausts `options.max_iterations` without a stable matching
/// still returns its last estimate with `converged == false` and logs a
/// warning.
pub fn estimate(problem: &FittingProblem, options: &FitOptions) -> Result<FitResult> {
    let mut current = initial_estimate(problem)?;
    let mut previous: Option<Matching> = None;
    let mut iterations = 0;

    for iteration in 0..options.max_iterations {
        iterations = iteration + 1;

        let transformer = FlatEarthTransformer::new(
            current.origin,
            current.orientation_deg,
            current.axis_convention,
        )?;
        let projected: Vec<LocalPoint> = problem
            .uav_positions
            .iter()
            .map(|p| transformer.to_local(p))
            .collect();

        let matrix = distance_matrix(&projected, &problem.takeoff_positions, |a, b| {
            a.distance(b)
        });
        let mut matching = greedy_assignment(&matrix, options.distance_threshold_m);
        matching.canonicalize();

        if matching.is_empty() {
            return Err(FitError::NoMatch);
        }

        if previous.as_ref() == Some(&matching) {
            log::debug!(
                "Matching stable after {} iterations; orientation {:.3}°",
                iterations,
                current.orientation_deg
            );
            return Ok(FitResult {
                estimate: current,
                matching,
                iterations,
                converged: true,
            });
        }

        let observed: Vec<LocalPoint> = matching
            .pairs()
            .iter()
            .map(|&(uav, _)| projected[uav])
            .collect();
        let planned: Vec<LocalPoint> = matching
            .pairs()
            .iter()
            .map(|&(_, takeoff)| problem.takeoff_positions[takeoff])
            .collect();
        let delta = align_pairs(&observed, &planned)?;

        current = CoordinateSystemEstimate {
            origin: transformer.to_geo(&delta.translation),
            orientation_deg: normalize_bearing(
                current.orientation_deg
                    + current.axis_convention.bearing_sign() * delta.rotation_deg,
            ),
            axis_convention: current.axis_convention,
        };
        previous = Some(matching);
    }

    log::warn!(
        "Coordinate-system fit did not stabilize within {} iterations; returning last estimate",
        options.max_iterations
    );
    Ok(FitResult {
        estimate: current,
        matching: previous.unwrap_or_default(),
        iterations,
        converged: false,
    })
}

fn local_centroid(points: impl Iterator<Item = LocalPoint>, n: f64) -> LocalPoint {
    let (sum_x, sum_y) = points.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    LocalPoint::new(sum_x / n, sum_y / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AxisConvention;
    use approx::assert_relative_eq;

    fn problem_with(
        positions: Vec<GeoPoint>,
        headings: Vec<Option<f64>>,
        takeoffs: Vec<LocalPoint>,
    ) -> FittingProblem {
        let ids = (0..positions.len()).map(|i| format!("uav-{i}")).collect();
        FittingProblem {
            uav_ids: ids,
            uav_positions: positions,
            uav_headings: headings,
            takeoff_positions: takeoffs,
            axis_convention: AxisConvention::NorthEastUp,
        }
    }

    #[test]
    fn test_estimate_rejects_empty_takeoffs() {
        let problem = problem_with(
            vec![GeoPoint::new(19.06, 47.47)],
            vec![None],
            vec![],
        );
        assert!(matches!(
            estimate(&problem, &FitOptions::default()),
            Err(FitError::Input(_))
        ));
    }

    #[test]
    fn test_estimate_rejects_empty_uav_list() {
        let problem = problem_with(vec![], vec![], vec![LocalPoint::new(0.0, 0.0)]);
        assert!(matches!(
            estimate(&problem, &FitOptions::default()),
            Err(FitError::Input(_))
        ));
    }

    #[test]
    fn test_initial_estimate_uses_circular_mean_of_headings() {
        let problem = problem_with(
            vec![
                GeoPoint::new(19.0613, 47.4740),
                GeoPoint::new(19.0617, 47.4740),
            ],
            vec![Some(350.0), Some(10.0)],
            vec![LocalPoint::new(0.0, 0.0), LocalPoint::new(10.0, 0.0)],
        );

        let seed = initial_estimate(&problem).unwrap();
        assert_relative_eq!(seed.orientation_deg, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_initial_estimate_without_headings_faces_north() {
        let problem = problem_with(
            vec![
                GeoPoint::new(19.0613, 47.4740),
                GeoPoint::new(19.0617, 47.4740),
            ],
            vec![None, None],
            vec![LocalPoint::new(0.0, 0.0), LocalPoint::new(10.0, 0.0)],
        );

        let seed = initial_estimate(&problem).unwrap();
        assert_relative_eq!(seed.orientation_deg, 0.0);
    }

    #[test]
    fn test_initial_estimate_matches_centroids() {
        // Takeoff layout centered on the origin: the seeded origin must land
        // on the UAV geo centroid regardless of the heading seed.
        let problem = problem_with(
            vec![
                GeoPoint::new(19.0613, 47.4740),
                GeoPoint::new(19.0617, 47.4740),
            ],
            vec![Some(77.0), Some(77.0)],
            vec![LocalPoint::new(-5.0, 0.0), LocalPoint::new(5.0, 0.0)],
        );

        let seed = initial_estimate(&problem).unwrap();
        assert_relative_eq!(seed.origin.lon, 19.0615, epsilon = 1e-9);
        assert_relative_eq!(seed.origin.lat, 47.4740, epsilon = 1e-9);
    }

    #[test]
    fn test_no_match_when_shapes_are_incompatible() {
        // Two UAVs ~200 m apart cannot fit a 2 m takeoff pitch: after the
        // centroid seed every residual is ~100 m, far over the threshold.
        let problem = problem_with(
            vec![
                GeoPoint::new(19.0600, 47.4740),
                GeoPoint::new(19.0627, 47.4740),
            ],
            vec![Some(0.0), Some(0.0)],
            vec![LocalPoint::new(0.0, 0.0), LocalPoint::new(2.0, 0.0)],
        );

        assert!(matches!(
            estimate(&problem, &FitOptions::default()),
            Err(FitError::NoMatch)
        ));
    }

    #[test]
    fn test_iteration_cap_returns_last_estimate_with_warning_flag() {
        // The first iteration can never observe a repeated matching, so a
        // budget of one always exhausts without convergence.
        let problem = problem_with(
            vec![
                GeoPoint::new(19.0613, 47.4740),
                GeoPoint::new(19.06143, 47.4740),
            ],
            vec![Some(0.0), Some(0.0)],
            vec![LocalPoint::new(0.0, 0.0), LocalPoint::new(10.0, 0.0)],
        );

        let options = FitOptions {
            max_iterations: 1,
            ..FitOptions::default()
        };
        let result = estimate(&problem, &options).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.matching.len(), 2);
        assert!(result.estimate.orientation_deg.is_finite());
        assert!(result.estimate.origin.is_valid());
    }
}
